// src/bin/bracket_dev_cli.rs

use std::env;
use std::fs;
use std::process;

use bracket_engine::domain::{
    BattleRoyaleConfig, Bracket, BracketConfig, BracketId, DoubleEliminationConfig,
    GenerateRequest, Match, MatchStatus, Participant, ParticipantId, Score, SwissConfig,
};
use bracket_engine::engine::{self, BracketError, ResultSubmission};
use bracket_engine::stats::count_stats;
use bracket_engine::tournament::BracketLobby;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Запуск:
///   bracket_dev_cli                 – демо-прогон трёх сеток
///   bracket_dev_cli request.json    – сгенерировать и доиграть сетку из JSON
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let lobby = BracketLobby::new();

    let requests = match env::args().nth(1) {
        Some(path) => match load_request(&path) {
            Ok(request) => vec![request],
            Err(err) => {
                error!(path = %path, error = %err, "cannot read generate request");
                process::exit(1);
            }
        },
        None => demo_requests(),
    };

    for request in requests {
        println!("=== {} ===", request.name);

        let bracket_id = match lobby.create_bracket(&request) {
            Ok(id) => id,
            Err(err) => {
                println!("  Сетка не создана: {}", err);
                continue;
            }
        };

        match simulate(&lobby, bracket_id) {
            Ok(played) => info!(bracket_id, played, "simulation finished"),
            Err(err) => println!("  Симуляция прервана: {}", err),
        }

        match lobby.snapshot(bracket_id) {
            Ok(bracket) => print_summary(&bracket),
            Err(err) => println!("  Сетка недоступна: {}", err),
        }
        println!();
    }
}

fn load_request(path: &str) -> Result<GenerateRequest, String> {
    let raw = fs::read_to_string(path).map_err(|e| e.to_string())?;
    serde_json::from_str(&raw).map_err(|e| e.to_string())
}

fn roster(count: u64) -> Vec<Participant> {
    (1..=count)
        .map(|id| Participant::seeded(id, format!("Team {}", id), id as u32))
        .collect()
}

fn demo_requests() -> Vec<GenerateRequest> {
    vec![
        GenerateRequest::new(
            1,
            "Double Elimination, 6 teams",
            roster(6),
            BracketConfig::DoubleElimination(DoubleEliminationConfig::with_reset()),
        ),
        GenerateRequest::new(
            2,
            "Swiss, 8 teams",
            roster(8),
            BracketConfig::Swiss(SwissConfig::best_of_three_thresholds()),
        ),
        GenerateRequest::new(
            3,
            "Battle Royale, 12 teams",
            roster(12),
            BracketConfig::BattleRoyale(BattleRoyaleConfig {
                teams_per_lobby: 4,
                total_rounds: 3,
                advance_per_lobby: Some(2),
            }),
        ),
    ]
}

/// Доиграть сетку до конца: в каждом матче побеждает лучший посев.
/// Возвращает число сыгранных матчей.
fn simulate(lobby: &BracketLobby, bracket_id: BracketId) -> Result<usize, BracketError> {
    let mut played = 0;

    loop {
        let bracket = lobby.snapshot(bracket_id)?;
        if bracket.is_completed() {
            return Ok(played);
        }

        let ready = bracket
            .matches()
            .find(|m| m.status == MatchStatus::Scheduled)
            .cloned();

        match ready {
            Some(game) => {
                lobby.start_match(bracket_id, game.id)?;
                lobby.submit_result(bracket_id, favourite_wins(&bracket, &game))?;
                played += 1;
            }
            None => {
                let round = lobby.generate_next_round(bracket_id)?;
                println!("  {}: {} матчей", round.name, round.matches.len());
            }
        }
    }
}

fn favourite_wins(bracket: &Bracket, game: &Match) -> ResultSubmission {
    let mut order: Vec<ParticipantId> = game.participants();
    order.sort_by_key(|id| {
        bracket
            .participant(*id)
            .map(Participant::seed_or_max)
            .unwrap_or(u32::MAX)
    });

    if game.slots.len() > 2 {
        return ResultSubmission::placements(game.id, order);
    }

    match order.as_slice() {
        [winner, loser] => ResultSubmission::played(
            game.id,
            *winner,
            vec![Score::new(*winner, 2), Score::new(*loser, 1)],
        ),
        _ => ResultSubmission::double_forfeit(game.id),
    }
}

fn print_summary(bracket: &Bracket) {
    let stats = count_stats(bracket);
    println!(
        "  Матчей: {} (сыграно {}, bye {}, пропущено {})",
        stats.total_matches, stats.completed_matches, stats.bye_matches, stats.skipped_matches
    );

    println!("  Таблица:");
    for row in engine::standings(bracket) {
        let name = bracket
            .participant(row.participant)
            .map(|p| p.name.as_str())
            .unwrap_or("?");
        println!(
            "    {:>2}. {:<10} W{} L{} pts {}",
            row.rank, name, row.wins, row.losses, row.points
        );
    }
}
