// src/topology/single_elimination.rs

use crate::domain::{BracketBody, Match, Participant, Round, Section, SectionKind, Slot, SlotRef};
use crate::engine::errors::BracketError;
use crate::topology::seeding::{bracket_size, pair_seeds, round_count};
use crate::topology::{elimination_round_name, GenContext};

/// Single elimination: одна секция, победитель идёт дальше, проигравший выбывает.
pub fn generate(
    participants: &[Participant],
    ctx: &mut GenContext<'_>,
) -> Result<BracketBody, BracketError> {
    let winners = build_elimination_section(
        participants,
        SectionKind::Winners,
        elimination_round_name,
        ctx,
    )?;

    Ok(BracketBody::SingleElimination { winners })
}

/// Секция на выбывание (используется и как сетка победителей double elimination).
///
/// Раунд 1 – пары посева (пары с bye закроются при settle),
/// раунд r>1 – 2^(rounds-r) матчей с `Tbd` слотами.
/// Матч m раунда r отправляет победителя в слот `m % 2` матча `m / 2` раунда r+1.
pub(crate) fn build_elimination_section(
    participants: &[Participant],
    kind: SectionKind,
    round_name: fn(u32, u32) -> String,
    ctx: &mut GenContext<'_>,
) -> Result<Section, BracketError> {
    let pairs = pair_seeds(participants.len())?;
    let size = bracket_size(participants.len());
    let total_rounds = round_count(participants.len());

    let by_seed = |seed: u32| -> Slot {
        participants
            .get(seed as usize - 1)
            .map(|p| Slot::Participant(p.id))
            .unwrap_or(Slot::Bye)
    };

    let mut section = Section::new(kind);

    for r in 1..=total_rounds {
        let mut round = Round::new(r, round_name(r, total_rounds));
        let count = size >> r;

        for m in 0..count {
            let (a, b) = if r == 1 {
                let pair = pairs[m];
                (by_seed(pair.high), pair.low.map(by_seed).unwrap_or(Slot::Bye))
            } else {
                (Slot::Tbd, Slot::Tbd)
            };

            let id = ctx.next_id();
            round
                .matches
                .push(Match::head_to_head(id, kind, r, m as u32, a, b, ctx.best_of(r)));
        }

        section.rounds.push(round);
    }

    link_winners(&mut section);
    Ok(section)
}

/// Проставить winner_to между соседними раундами секции.
fn link_winners(section: &mut Section) {
    for r in 0..section.rounds.len().saturating_sub(1) {
        let next_ids: Vec<u64> = section.rounds[r + 1].matches.iter().map(|m| m.id).collect();

        for (m, game) in section.rounds[r].matches.iter_mut().enumerate() {
            game.winner_to = Some(SlotRef::new(next_ids[m / 2], m % 2));
        }
    }
}
