// tests/battle_royale_tests.rs
//
// Battle royale:
//  1) лобби "змейкой" по посеву
//  2) места → очки, первые N проходят дальше
//  3) полный прогон 12 команд, 3 раунда
//  4) лобби из одного участника закрывается как bye
//  5) проверки порядка мест

use std::collections::HashSet;

use bracket_engine::domain::{
    BattleRoyaleConfig, Bracket, BracketBody, BracketConfig, GenerateRequest, MatchStatus,
    Participant, ParticipantId, Round, Score, SectionKind, Slot,
};
use bracket_engine::engine::{self, BracketError, ResultSubmission, TransitionError};
use bracket_engine::topology::battle_royale::{lobby_count, split_lobbies};
use bracket_engine::topology::generate;

// -----------------------------
// ВСПОМОГАТЕЛЬНЫЕ КОНСТРУКТОРЫ
// -----------------------------

fn roster(count: u64) -> Vec<Participant> {
    (1..=count)
        .map(|id| Participant::seeded(id, format!("Squad {}", id), id as u32))
        .collect()
}

fn battle_royale(count: u64, cfg: BattleRoyaleConfig) -> Bracket {
    let request = GenerateRequest::new(
        5,
        "Royale",
        roster(count),
        BracketConfig::BattleRoyale(cfg),
    );
    generate(&request, 1).expect("bracket")
}

fn twelve_squads() -> Bracket {
    battle_royale(
        12,
        BattleRoyaleConfig {
            teams_per_lobby: 4,
            total_rounds: 3,
            advance_per_lobby: Some(2),
        },
    )
}

fn rounds(bracket: &Bracket) -> &[Round] {
    match &bracket.body {
        BracketBody::BattleRoyale { rounds } => rounds,
        other => panic!("unexpected body: {:?}", other),
    }
}

/// Закрыть все открытые лобби: места по посеву.
fn play_lobbies(bracket: &mut Bracket) {
    loop {
        let next = bracket
            .matches()
            .find(|m| m.status == MatchStatus::Scheduled)
            .cloned();
        let Some(game) = next else {
            break;
        };

        let mut order = game.participants();
        order.sort_unstable();
        engine::submit_result(bracket, ResultSubmission::placements(game.id, order))
            .expect("placements accepted");
    }
}

fn lobby_members(round: &Round) -> Vec<Vec<ParticipantId>> {
    round.matches.iter().map(|m| m.participants()).collect()
}

// TEST 1 — разбиение на лобби
#[test]
fn lobbies_are_snake_seeded() {
    assert_eq!(lobby_count(12, 4), 3);
    assert_eq!(lobby_count(13, 4), 4);
    assert_eq!(lobby_count(2, 4), 1);

    let ids: Vec<ParticipantId> = (1..=12).collect();
    assert_eq!(
        split_lobbies(&ids, 4),
        vec![vec![1, 6, 7, 12], vec![2, 5, 8, 11], vec![3, 4, 9, 10]]
    );

    let bracket = twelve_squads();
    let first = &rounds(&bracket)[0];
    assert_eq!(first.matches.len(), 3);
    assert!(first.matches.iter().all(|m| m.section == SectionKind::Lobby));
    assert!(first.matches.iter().all(|m| m.slots.len() == 4));
}

// TEST 2 — после первого раунда проходят по двое из лобби
#[test]
fn top_two_per_lobby_advance() {
    let mut bracket = twelve_squads();
    play_lobbies(&mut bracket);

    let table = engine::standings(&bracket);
    let alive: HashSet<ParticipantId> = table
        .iter()
        .filter(|s| !s.eliminated)
        .map(|s| s.participant)
        .collect();
    assert_eq!(alive, HashSet::from([1, 2, 3, 4, 5, 6]));

    // Первое место в лобби из 4 – 4 очка, второе – 3.
    let one = table.iter().find(|s| s.participant == 1).expect("row");
    let six = table.iter().find(|s| s.participant == 6).expect("row");
    assert_eq!(one.points, 4);
    assert_eq!(six.points, 3);

    let round = engine::generate_next_round(&mut bracket).expect("round 2");
    assert_eq!(lobby_members(&round), vec![vec![1, 4, 5], vec![2, 3, 6]]);
}

// TEST 3 — полный прогон
#[test]
fn twelve_squads_full_run() {
    let mut bracket = twelve_squads();

    for _ in 0..5 {
        play_lobbies(&mut bracket);
        if bracket.is_completed() {
            break;
        }
        engine::generate_next_round(&mut bracket).expect("next round");
    }

    assert!(bracket.is_completed());
    assert_eq!(rounds(&bracket).len(), 3);
    assert_eq!(lobby_members(&rounds(&bracket)[2]), vec![vec![1, 2, 3, 4]]);

    let table = engine::standings(&bracket);
    assert_eq!(table[0].participant, 1);
    assert_eq!(table[0].points, 4 + 3 + 4);
    assert_eq!(table[1].participant, 2);
}

// TEST 4 — лобби из одного участника
#[test]
fn single_member_lobby_is_a_bye() {
    let bracket = battle_royale(
        3,
        BattleRoyaleConfig {
            teams_per_lobby: 2,
            total_rounds: 1,
            advance_per_lobby: None,
        },
    );

    let first = &rounds(&bracket)[0];
    assert_eq!(first.matches.len(), 2);

    let lone = &first.matches[0];
    assert_eq!(lone.slots, vec![Slot::Participant(1), Slot::Bye]);
    assert!(lone.is_bye());
    assert_eq!(
        lone.result.as_ref().map(|r| r.placements.clone()),
        Some(vec![1])
    );

    assert_eq!(first.matches[1].participants(), vec![2, 3]);
    assert_eq!(first.matches[1].status, MatchStatus::Scheduled);
}

// TEST 5 — неверный порядок мест и дуэльный результат для лобби
#[test]
fn placements_are_validated() {
    let mut bracket = twelve_squads();
    let lobby = rounds(&bracket)[0].matches[0].clone();
    let before = bracket.clone();

    // Не хватает участника.
    let err = engine::submit_result(
        &mut bracket,
        ResultSubmission::placements(lobby.id, vec![1, 6, 7]),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        BracketError::InvalidTransition(TransitionError::InvalidPlacements { .. })
    ));

    // Чужой участник.
    let err = engine::submit_result(
        &mut bracket,
        ResultSubmission::placements(lobby.id, vec![1, 6, 7, 2]),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        BracketError::InvalidTransition(TransitionError::InvalidPlacements { .. })
    ));

    // Счёт вместо мест.
    let err = engine::submit_result(
        &mut bracket,
        ResultSubmission::played(lobby.id, 1, vec![Score::new(1, 10)]),
    )
    .unwrap_err();
    assert_eq!(
        err,
        BracketError::InvalidTransition(TransitionError::InvalidPlacements {
            match_id: lobby.id,
            reason: "lobby matches take a placement order",
        })
    );

    assert_eq!(bracket, before);
}
