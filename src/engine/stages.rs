// src/engine/stages.rs

use tracing::info;

use crate::domain::{
    AdvanceRule, Bracket, BracketBody, BracketConfig, MatchIdAllocator, Participant, Stage,
};
use crate::engine::errors::BracketError;
use crate::engine::progression::resolve_byes;
use crate::engine::standings::{active_participants, standings_for, Standing};
use crate::topology::multi_stage::generate_stage;

/// Структура сыграна до конца.
///
/// Для швейцарки и battle royale мало закрыть все матчи: нужно ещё
/// сыграть все раунды (или остаться без пар для следующего).
pub fn body_finished(body: &BracketBody, config: &BracketConfig, participants: &[Participant]) -> bool {
    match (body, config) {
        (BracketBody::MultiStage { stages }, _) => {
            !stages.is_empty() && stages.iter().all(|s| s.completed)
        }
        (BracketBody::Swiss { rounds }, BracketConfig::Swiss(cfg)) => {
            body.all_matches_terminal()
                && (rounds.len() as u32 >= cfg.total_rounds
                    || active_participants(body, config, participants).len() < 2)
        }
        (BracketBody::BattleRoyale { rounds }, BracketConfig::BattleRoyale(cfg)) => {
            body.all_matches_terminal()
                && (rounds.len() as u32 >= cfg.total_rounds
                    || active_participants(body, config, participants).len() < 2)
        }
        _ => body.all_matches_terminal(),
    }
}

/// Текущая стадия: сгенерирована, но не завершена.
pub fn active_stage(stages: &[Stage]) -> Option<&Stage> {
    stages.iter().find(|s| s.is_generated() && !s.completed)
}

/// Закрыть сыгранные стадии и сгенерировать следующие.
///
/// Посев следующей стадии берётся из таблицы предыдущей по её `AdvanceRule`.
/// id матчей продолжают нумерацию сетки.
pub fn advance_stages(bracket: &mut Bracket) -> Result<(), BracketError> {
    let Bracket {
        id,
        body,
        best_of,
        next_match_id,
        ..
    } = bracket;

    let BracketBody::MultiStage { stages } = body else {
        return Ok(());
    };

    for i in 0..stages.len() {
        let finished = match &stages[i].body {
            Some(b) if !stages[i].completed => {
                body_finished(b, &stages[i].config, &stages[i].participants)
            }
            _ => false,
        };
        if !finished {
            continue;
        }

        stages[i].completed = true;
        info!(
            bracket_id = *id,
            stage = i,
            name = %stages[i].name,
            "stage completed"
        );

        let advance = match stages.get(i + 1) {
            Some(next) if !next.is_generated() => next.advance,
            _ => continue,
        };

        let seeds = derive_seeds(&stages[i], advance)?;
        let mut ids = MatchIdAllocator::new(*next_match_id);

        let next = &mut stages[i + 1];
        generate_stage(next, seeds, best_of, &mut ids)?;
        *next_match_id = ids.peek();

        if let Some(b) = next.body.as_mut() {
            resolve_byes(b)?;
        }
    }

    Ok(())
}

/// Участники следующей стадии в порядке посева.
pub fn derive_seeds(stage: &Stage, rule: AdvanceRule) -> Result<Vec<Participant>, BracketError> {
    let body = stage
        .body
        .as_ref()
        .ok_or(BracketError::Internal("stage is not generated"))?;
    let table = standings_for(body, &stage.config, &stage.participants);

    let picked: Vec<&Standing> = match rule {
        AdvanceRule::All => table.iter().collect(),
        AdvanceRule::Top { count } => table.iter().take(count as usize).collect(),
        AdvanceRule::TopPerGroup { count } => {
            if table.iter().any(|s| s.group.is_some()) {
                table.iter().filter(|s| s.rank <= count).collect()
            } else {
                table.iter().take(count as usize).collect()
            }
        }
    };

    picked
        .into_iter()
        .map(|s| {
            stage
                .participants
                .iter()
                .find(|p| p.id == s.participant)
                .cloned()
                .ok_or(BracketError::Internal("standing for an unknown participant"))
        })
        .collect()
}
