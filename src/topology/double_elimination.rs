// src/topology/double_elimination.rs

use crate::domain::{
    BracketBody, DoubleEliminationConfig, Match, Participant, Round, Section, SectionKind, Slot,
    SlotRef,
};
use crate::engine::errors::BracketError;
use crate::topology::seeding::round_count;
use crate::topology::single_elimination::build_elimination_section;
use crate::topology::GenContext;

/// Количество раундов сетки проигравших: max(1, 2 * (W - 1)).
pub fn losers_round_count(winners_rounds: u32) -> u32 {
    (2 * winners_rounds.saturating_sub(1)).max(1)
}

/// Матчей в раунде `k` сетки проигравших: max(1, 2^floor((L - k) / 2)).
///
/// Нечётные раунды – "консолидация" внутри нижней сетки,
/// чётные – "drop-in", куда падают проигравшие верхней сетки.
pub fn losers_round_matches(losers_rounds: u32, k: u32) -> usize {
    1usize << (losers_rounds.saturating_sub(k) / 2)
}

/// Раунд нижней сетки, куда падает проигравший раунда `r` верхней.
pub fn losers_drop_round(winners_round: u32) -> u32 {
    if winners_round <= 1 {
        1
    } else {
        2 * (winners_round - 1)
    }
}

pub fn winners_round_name(round: u32, total: u32) -> String {
    if round == total {
        "Winners Finals".to_string()
    } else if round + 1 == total {
        "Winners Semi-Finals".to_string()
    } else {
        format!("Winners Round {}", round)
    }
}

pub fn losers_round_name(round: u32, total: u32) -> String {
    if round == total {
        "Losers Finals".to_string()
    } else {
        format!("Losers Round {}", round)
    }
}

pub fn generate(
    participants: &[Participant],
    cfg: &DoubleEliminationConfig,
    ctx: &mut GenContext<'_>,
) -> Result<BracketBody, BracketError> {
    let mut winners =
        build_elimination_section(participants, SectionKind::Winners, winners_round_name, ctx)?;

    let w = round_count(participants.len());
    let l = losers_round_count(w);

    // 1. Нижняя сетка: только матчи, ссылки ниже.
    let mut losers = Section::new(SectionKind::Losers);
    for k in 1..=l {
        let mut round = Round::new(k, losers_round_name(k, l));
        for j in 0..losers_round_matches(l, k) {
            let id = ctx.next_id();
            // При двух участниках верхняя сетка даёт одного проигравшего:
            // второй слот единственного матча нижней сетки – bye.
            let b = if w == 1 { Slot::Bye } else { Slot::Tbd };
            round.matches.push(Match::head_to_head(
                id,
                SectionKind::Losers,
                k,
                j as u32,
                Slot::Tbd,
                b,
                ctx.best_of(k),
            ));
        }
        losers.rounds.push(round);
    }

    // 2. Гранд-финал (+ опциональный ресет).
    let mut grand_finals = Section::new(SectionKind::GrandFinals);
    let gf_rounds = if cfg.grand_finals_reset { 2 } else { 1 };
    for r in 1..=gf_rounds {
        let name = if r == 1 { "Grand Finals" } else { "Grand Finals Reset" };
        let mut round = Round::new(r, name);
        let id = ctx.next_id();
        round.matches.push(Match::head_to_head(
            id,
            SectionKind::GrandFinals,
            r,
            0,
            Slot::Tbd,
            Slot::Tbd,
            ctx.best_of(r),
        ));
        grand_finals.rounds.push(round);
    }
    let gf_id = grand_finals.rounds[0].matches[0].id;

    link_losers_drops(&mut winners, &losers, w);
    link_losers_internal(&mut losers, gf_id);

    // Чемпион верхней сетки – слот 0 гранд-финала.
    if let Some(last) = winners.rounds.last_mut() {
        for game in last.matches.iter_mut() {
            game.winner_to = Some(SlotRef::new(gf_id, 0));
        }
    }

    Ok(BracketBody::DoubleElimination {
        winners,
        losers,
        grand_finals,
    })
}

/// Ссылки проигравших верхней сетки в нижнюю.
///
/// Раунд 1: проигравшие матчей 2j и 2j+1 встречаются в матче j раунда 1 нижней сетки.
/// Раунд r>1: проигравший падает в слот 1 раунда 2(r-1); на чётных r порядок
/// разворачивается, чтобы отложить повторные встречи.
fn link_losers_drops(winners: &mut Section, losers: &Section, w: u32) {
    let losers_ids = |k: u32| -> Vec<u64> {
        losers
            .round(k)
            .map(|r| r.matches.iter().map(|m| m.id).collect())
            .unwrap_or_default()
    };

    for round in winners.rounds.iter_mut() {
        let r = round.number;
        let target = losers_ids(losers_drop_round(r));
        if target.is_empty() {
            continue;
        }

        for (m, game) in round.matches.iter_mut().enumerate() {
            game.loser_to = Some(if w == 1 {
                SlotRef::new(target[0], 0)
            } else if r == 1 {
                SlotRef::new(target[m / 2], m % 2)
            } else {
                let count = target.len();
                let idx = if r % 2 == 0 { count - 1 - m } else { m };
                SlotRef::new(target[idx.min(count - 1)], 1)
            });
        }
    }
}

/// Ссылки победителей внутри нижней сетки и финалиста в гранд-финал.
fn link_losers_internal(losers: &mut Section, gf_id: u64) {
    let total = losers.rounds.len();

    for k in 0..total {
        if k + 1 == total {
            for game in losers.rounds[k].matches.iter_mut() {
                game.winner_to = Some(SlotRef::new(gf_id, 1));
            }
            continue;
        }

        let next_ids: Vec<u64> = losers.rounds[k + 1].matches.iter().map(|m| m.id).collect();
        let same_size = next_ids.len() == losers.rounds[k].matches.len();

        for (j, game) in losers.rounds[k].matches.iter_mut().enumerate() {
            game.winner_to = Some(if same_size {
                // Следующий раунд – drop-in: слот 0 держит победитель нижней сетки.
                SlotRef::new(next_ids[j], 0)
            } else {
                SlotRef::new(next_ids[j / 2], j % 2)
            });
        }
    }
}
