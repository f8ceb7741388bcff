// src/engine/progression.rs

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::domain::{
    Bracket, BracketBody, BracketStatus, Match, MatchId, MatchResult, MatchStatus, Outcome,
    ParticipantId, Score, SectionKind, Slot, SlotRef,
};
use crate::engine::errors::{BracketError, TransitionError};
use crate::engine::stages;

/// Что клиент сообщает о матче.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum SubmittedOutcome {
    /// Обычный сыгранный матч.
    Played {
        scores: Vec<Score>,
        winner: ParticipantId,
    },
    /// Участник снялся, побеждает соперник.
    Forfeit { forfeiting: ParticipantId },
    /// Снялись оба: дальше по обеим ссылкам уходит `Bye`.
    DoubleForfeit,
    /// Итог лобби battle royale: порядок мест, [0] – победитель.
    Placements { order: Vec<ParticipantId> },
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResultSubmission {
    pub match_id: MatchId,
    pub outcome: SubmittedOutcome,
}

impl ResultSubmission {
    pub fn played(match_id: MatchId, winner: ParticipantId, scores: Vec<Score>) -> Self {
        Self {
            match_id,
            outcome: SubmittedOutcome::Played { scores, winner },
        }
    }

    pub fn forfeit(match_id: MatchId, forfeiting: ParticipantId) -> Self {
        Self {
            match_id,
            outcome: SubmittedOutcome::Forfeit { forfeiting },
        }
    }

    pub fn double_forfeit(match_id: MatchId) -> Self {
        Self {
            match_id,
            outcome: SubmittedOutcome::DoubleForfeit,
        }
    }

    pub fn placements(match_id: MatchId, order: Vec<ParticipantId>) -> Self {
        Self {
            match_id,
            outcome: SubmittedOutcome::Placements { order },
        }
    }
}

fn ensure_writable(bracket: &Bracket) -> Result<(), BracketError> {
    if bracket.is_completed() {
        return Err(TransitionError::BracketCompleted.into());
    }
    Ok(())
}

/// Scheduled → Live.
pub fn start_match(bracket: &mut Bracket, match_id: MatchId) -> Result<(), BracketError> {
    ensure_writable(bracket)?;

    let game = bracket
        .body
        .find_match_mut(match_id)
        .ok_or(TransitionError::UnknownMatch(match_id))?;

    match game.status {
        MatchStatus::Scheduled => {
            game.status = MatchStatus::Live;
            debug!(bracket_id = bracket.id, match_id, "match is live");
            Ok(())
        }
        MatchStatus::Pending => Err(TransitionError::NotReady(match_id).into()),
        status if status.is_terminal() => {
            Err(TransitionError::AlreadyTerminal { match_id, status }.into())
        }
        status => Err(TransitionError::NotStarted { match_id, status }.into()),
    }
}

/// Результат дуэльного матча: победитель + счёт.
pub fn set_match_result(
    bracket: &mut Bracket,
    match_id: MatchId,
    scores: Vec<Score>,
    winner: ParticipantId,
) -> Result<(), BracketError> {
    submit_result(bracket, ResultSubmission::played(match_id, winner, scores))
}

/// Применить результат матча и продвинуть сетку.
///
/// Порядок:
///   1. проверка (матч существует, готов, не завершён, результат корректен);
///   2. на копии: матч → Completed, победитель/проигравший по ссылкам;
///   3. каскад bye, завершение стадий и сетки;
///   4. копия заменяет оригинал.
pub fn submit_result(
    bracket: &mut Bracket,
    submission: ResultSubmission,
) -> Result<(), BracketError> {
    let result = match check_submission(bracket, &submission) {
        Ok(result) => result,
        Err(err) => {
            warn!(
                bracket_id = bracket.id,
                match_id = submission.match_id,
                error = %err,
                "result rejected"
            );
            return Err(err);
        }
    };

    let mut next = bracket.clone();
    apply_result(&mut next, submission.match_id, result)?;
    settle(&mut next)?;

    *bracket = next;
    Ok(())
}

fn check_submission(
    bracket: &Bracket,
    submission: &ResultSubmission,
) -> Result<MatchResult, BracketError> {
    ensure_writable(bracket)?;

    let match_id = submission.match_id;
    let game = bracket
        .find_match(match_id)
        .ok_or(TransitionError::UnknownMatch(match_id))?;

    if game.is_terminal() {
        return Err(TransitionError::AlreadyTerminal {
            match_id,
            status: game.status,
        }
        .into());
    }
    if !game.is_ready() {
        return Err(TransitionError::NotReady(match_id).into());
    }

    let is_lobby = game.section == SectionKind::Lobby;
    let lobby_only = TransitionError::InvalidPlacements {
        match_id,
        reason: "lobby matches take a placement order",
    };

    let result = match &submission.outcome {
        SubmittedOutcome::Played { scores, winner } => {
            if is_lobby {
                return Err(lobby_only.into());
            }
            if !game.contains(*winner) {
                return Err(TransitionError::WinnerNotInMatch {
                    match_id,
                    participant: *winner,
                }
                .into());
            }
            check_scores(game, scores, *winner)?;

            MatchResult {
                outcome: Outcome::Played,
                winner: Some(*winner),
                scores: scores.clone(),
                placements: Vec::new(),
            }
        }
        SubmittedOutcome::Forfeit { forfeiting } => {
            if is_lobby {
                return Err(lobby_only.into());
            }
            if !game.contains(*forfeiting) {
                return Err(TransitionError::WinnerNotInMatch {
                    match_id,
                    participant: *forfeiting,
                }
                .into());
            }

            MatchResult {
                outcome: Outcome::Forfeit,
                winner: game.participants().into_iter().find(|p| p != forfeiting),
                scores: Vec::new(),
                placements: Vec::new(),
            }
        }
        SubmittedOutcome::DoubleForfeit => {
            if is_lobby {
                return Err(lobby_only.into());
            }

            MatchResult {
                outcome: Outcome::DoubleForfeit,
                winner: None,
                scores: Vec::new(),
                placements: Vec::new(),
            }
        }
        SubmittedOutcome::Placements { order } => {
            if !is_lobby {
                return Err(TransitionError::InvalidPlacements {
                    match_id,
                    reason: "placements are only accepted for lobby matches",
                }
                .into());
            }

            let mut expected = game.participants();
            expected.sort_unstable();
            let mut given = order.clone();
            given.sort_unstable();
            if expected != given {
                return Err(TransitionError::InvalidPlacements {
                    match_id,
                    reason: "placement order must list every lobby participant exactly once",
                }
                .into());
            }

            MatchResult {
                outcome: Outcome::Played,
                winner: order.first().copied(),
                scores: Vec::new(),
                placements: order.clone(),
            }
        }
    };

    Ok(result)
}

/// Счёт можно не присылать. Если прислан: только участники матча, без повторов,
/// у победителя строго максимальный счёт.
fn check_scores(game: &Match, scores: &[Score], winner: ParticipantId) -> Result<(), TransitionError> {
    let invalid = |reason: &'static str| TransitionError::InvalidScores {
        match_id: game.id,
        reason,
    };

    for (i, score) in scores.iter().enumerate() {
        if !game.contains(score.participant) {
            return Err(invalid("score for a participant outside the match"));
        }
        if scores[..i].iter().any(|s| s.participant == score.participant) {
            return Err(invalid("duplicate score entry"));
        }
    }

    if scores.is_empty() {
        return Ok(());
    }

    let top = scores
        .iter()
        .find(|s| s.participant == winner)
        .map(|s| s.score)
        .ok_or_else(|| invalid("winner has no score entry"))?;

    if scores
        .iter()
        .any(|s| s.participant != winner && s.score >= top)
    {
        return Err(invalid("winner must have the strictly highest score"));
    }

    Ok(())
}

fn apply_result(
    bracket: &mut Bracket,
    match_id: MatchId,
    result: MatchResult,
) -> Result<(), BracketError> {
    let game = bracket
        .body
        .find_match_mut(match_id)
        .ok_or(TransitionError::UnknownMatch(match_id))?;

    debug!(
        bracket_id = bracket.id,
        match_id,
        outcome = ?result.outcome,
        winner = ?result.winner,
        "result applied"
    );
    game.status = MatchStatus::Completed;
    game.result = Some(result);

    propagate(&mut bracket.body, match_id)
}

/// Разнести итог завершённого матча по ссылкам.
fn propagate(body: &mut BracketBody, match_id: MatchId) -> Result<(), BracketError> {
    let game = body
        .find_match(match_id)
        .ok_or(BracketError::Internal("completed match is missing"))?;

    let winner_to = game.winner_to;
    let loser_to = game.loser_to;
    let winner = Slot::from(game.winner());
    let loser = Slot::from(game.loser());
    let opens_grand_finals = game.section == SectionKind::GrandFinals && game.round == 1;

    if let Some(target) = winner_to {
        fill_slot(body, target, winner)?;
    }
    if let Some(target) = loser_to {
        fill_slot(body, target, loser)?;
    }
    if opens_grand_finals {
        resolve_grand_finals_reset(body, match_id)?;
    }

    Ok(())
}

fn fill_slot(body: &mut BracketBody, target: SlotRef, value: Slot) -> Result<(), BracketError> {
    let game = body
        .find_match_mut(target.match_id)
        .ok_or(BracketError::Internal("link points to a missing match"))?;

    let slot = game
        .slots
        .get_mut(target.slot)
        .ok_or(BracketError::Internal("link points to a missing slot"))?;
    if *slot != Slot::Tbd {
        return Err(BracketError::Internal("link target slot is already filled"));
    }
    *slot = value;

    if game.status == MatchStatus::Pending && game.is_ready() {
        game.status = MatchStatus::Scheduled;
    }

    debug!(
        match_id = target.match_id,
        slot = target.slot,
        value = ?value,
        "slot filled"
    );
    Ok(())
}

/// Ресет гранд-финала.
///
/// Не нужен, если первый матч выиграл чемпион верхней сетки (слот 0)
/// или матч решился без игры (bye, неявка).
fn resolve_grand_finals_reset(body: &mut BracketBody, opener: MatchId) -> Result<(), BracketError> {
    let Some(BracketBody::DoubleElimination { grand_finals, .. }) = body_of_match_mut(body, opener)
    else {
        return Ok(());
    };

    let Some(first) = grand_finals.rounds.first().and_then(|r| r.matches.first()) else {
        return Ok(());
    };
    let Some(result) = &first.result else {
        return Ok(());
    };

    let champion = first.slots.first().and_then(Slot::participant);
    let challenger = first.slots.get(1).and_then(Slot::participant);
    let decided = result.winner == champion
        || matches!(
            result.outcome,
            Outcome::Bye | Outcome::Forfeit | Outcome::DoubleForfeit
        );

    let Some(reset) = grand_finals
        .rounds
        .get_mut(1)
        .and_then(|r| r.matches.first_mut())
    else {
        return Ok(());
    };

    if decided {
        reset.status = MatchStatus::Skipped;
        debug!(match_id = reset.id, "grand finals reset skipped");
    } else {
        reset.slots = vec![Slot::from(champion), Slot::from(challenger)];
        reset.status = MatchStatus::Scheduled;
        debug!(match_id = reset.id, "grand finals reset scheduled");
    }

    Ok(())
}

/// Структура (без учёта обёртки multi-stage), которой принадлежит матч.
fn body_of_match_mut(body: &mut BracketBody, match_id: MatchId) -> Option<&mut BracketBody> {
    match body {
        BracketBody::MultiStage { stages } => stages
            .iter_mut()
            .filter_map(|s| s.body.as_mut())
            .find_map(|b| body_of_match_mut(b, match_id)),
        other => {
            if other.find_match(match_id).is_some() {
                Some(other)
            } else {
                None
            }
        }
    }
}

/// Закрыть все матчи, которые решаются без игры (слот `Bye`), и протолкнуть
/// их итог дальше по ссылкам, пока есть что закрывать.
pub(crate) fn resolve_byes(body: &mut BracketBody) -> Result<(), BracketError> {
    loop {
        let next = body
            .matches()
            .find(|m| {
                !m.is_terminal()
                    && m.is_ready()
                    && m.slots.iter().any(Slot::is_bye)
                    && m.participants().len() <= 1
            })
            .map(|m| (m.id, m.participants().first().copied()));

        let Some((match_id, winner)) = next else {
            break;
        };

        if let Some(game) = body.find_match_mut(match_id) {
            let mut result = MatchResult::bye(winner);
            if game.section == SectionKind::Lobby {
                result.placements = winner.into_iter().collect();
            }
            game.status = MatchStatus::Completed;
            game.result = Some(result);
        }
        debug!(match_id, winner = ?winner, "bye resolved");

        propagate(body, match_id)?;
    }

    for game in body.matches_mut() {
        if game.status == MatchStatus::Pending && game.is_ready() {
            game.status = MatchStatus::Scheduled;
        }
    }

    Ok(())
}

/// Довести сетку до устойчивого состояния: bye, стадии, статус сетки.
///
/// Вызывается после генерации и после каждого применённого результата.
pub fn settle(bracket: &mut Bracket) -> Result<(), BracketError> {
    resolve_byes(&mut bracket.body)?;
    stages::advance_stages(bracket)?;

    if bracket.status == BracketStatus::InProgress
        && stages::body_finished(&bracket.body, &bracket.config, &bracket.participants)
    {
        bracket.status = BracketStatus::Completed;
        info!(
            bracket_id = bracket.id,
            tournament_id = bracket.tournament_id,
            "bracket completed"
        );
    }

    Ok(())
}
