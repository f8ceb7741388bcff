// src/engine/next_round.rs

use std::collections::HashSet;

use tracing::{info, warn};

use crate::domain::{
    BestOfPolicy, Bracket, BracketBody, BracketConfig, MatchIdAllocator, Participant,
    ParticipantId, Round, Stage,
};
use crate::engine::errors::{BracketError, TransitionError};
use crate::engine::progression::settle;
use crate::engine::standings::active_participants;
use crate::topology::swiss::{pair_by_standing, pair_key};
use crate::topology::{battle_royale, swiss, GenContext};

/// Сгенерировать следующий раунд швейцарки или battle royale.
///
/// Работает и для текущей стадии multi-stage сетки.
/// Текущий раунд должен быть полностью сыгран, а раунды – оставаться.
pub fn generate_next_round(bracket: &mut Bracket) -> Result<Round, BracketError> {
    if bracket.is_completed() {
        return Err(TransitionError::BracketCompleted.into());
    }

    let mut next = bracket.clone();
    let (stage, number) = {
        let Bracket {
            body,
            config,
            participants,
            best_of,
            next_match_id,
            ..
        } = &mut next;

        let (body, config, participants, stage) = match body {
            BracketBody::MultiStage { stages } => {
                let Stage {
                    index,
                    config,
                    participants,
                    body,
                    ..
                } = stages
                    .iter_mut()
                    .find(|s| s.is_generated() && !s.completed)
                    .ok_or(TransitionError::NoMoreRounds)?;
                let body = body
                    .as_mut()
                    .ok_or(BracketError::Internal("active stage is not generated"))?;
                (body, &*config, participants.as_slice(), *index)
            }
            other => (other, &*config, participants.as_slice(), 0),
        };

        let mut ids = MatchIdAllocator::new(*next_match_id);
        let number = push_round(body, config, participants, best_of, stage, &mut ids)?;
        *next_match_id = ids.peek();
        (stage, number)
    };

    settle(&mut next)?;

    let round = lazy_rounds(&next.body, stage)
        .and_then(|rounds| rounds.iter().find(|r| r.number == number))
        .cloned()
        .ok_or(BracketError::Internal("generated round is missing"))?;

    info!(
        bracket_id = next.id,
        stage,
        round = number,
        matches = round.matches.len(),
        byes = round.byes.len(),
        "round generated"
    );

    *bracket = next;
    Ok(round)
}

fn push_round(
    body: &mut BracketBody,
    config: &BracketConfig,
    participants: &[Participant],
    best_of: &BestOfPolicy,
    stage: u32,
    ids: &mut MatchIdAllocator,
) -> Result<u32, BracketError> {
    let ranked = active_participants(body, config, participants);

    match (body, config) {
        (BracketBody::Swiss { rounds }, BracketConfig::Swiss(cfg)) => {
            let number = check_rounds(rounds, cfg.total_rounds, ranked.len())?;

            let played: HashSet<(ParticipantId, ParticipantId)> = rounds
                .iter()
                .flat_map(|r| r.matches.iter())
                .filter_map(|m| match m.participants().as_slice() {
                    [a, b] => Some(pair_key(*a, *b)),
                    _ => None,
                })
                .collect();
            let had_bye: HashSet<ParticipantId> = rounds
                .iter()
                .flat_map(|r| r.byes.iter().copied())
                .collect();

            let pairing = pair_by_standing(&ranked, &played, &had_bye);
            if pairing.rematch_fallback {
                warn!(
                    round = number,
                    "no rematch-free pairing, falling back to adjacent standings"
                );
            }

            let mut ctx = GenContext::new(ids, best_of, stage);
            rounds.push(swiss::build_round(number, pairing, &mut ctx));
            Ok(number)
        }
        (BracketBody::BattleRoyale { rounds }, BracketConfig::BattleRoyale(cfg)) => {
            let number = check_rounds(rounds, cfg.total_rounds, ranked.len())?;

            let mut ctx = GenContext::new(ids, best_of, stage);
            rounds.push(battle_royale::build_round(number, &ranked, cfg, &mut ctx));
            Ok(number)
        }
        _ => Err(TransitionError::NotLazilyGenerated.into()),
    }
}

/// Номер следующего раунда, если его можно генерировать.
fn check_rounds(rounds: &[Round], total_rounds: u32, active: usize) -> Result<u32, BracketError> {
    if let Some(last) = rounds.last() {
        if !last.is_finished() {
            return Err(TransitionError::RoundInProgress { round: last.number }.into());
        }
    }
    if rounds.len() as u32 >= total_rounds || active < 2 {
        return Err(TransitionError::NoMoreRounds.into());
    }
    Ok(rounds.len() as u32 + 1)
}

fn lazy_rounds(body: &BracketBody, stage: u32) -> Option<&[Round]> {
    match body {
        BracketBody::Swiss { rounds } | BracketBody::BattleRoyale { rounds } => {
            Some(rounds.as_slice())
        }
        BracketBody::MultiStage { stages } => stages
            .iter()
            .find(|s| s.index == stage)
            .and_then(|s| s.body.as_ref())
            .and_then(|b| lazy_rounds(b, stage)),
        _ => None,
    }
}
