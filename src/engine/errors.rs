use thiserror::Error;

use crate::domain::{BracketId, MatchId, MatchStatus, ParticipantId, TournamentId};
use crate::validation::ValidationReport;

/// Ошибки движка сеток.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BracketError {
    #[error("Not enough participants: required {required}, found {found}")]
    InsufficientParticipants { required: usize, found: usize },

    #[error("Invalid bracket configuration: {0}")]
    InvalidConfiguration(ValidationReport),

    #[error(
        "Participant {participant_id} is assigned to group {first_group} and group {second_group}"
    )]
    DuplicateAssignment {
        participant_id: ParticipantId,
        first_group: u32,
        second_group: u32,
    },

    #[error("Bracket already exists for tournament {tournament_id}")]
    BracketAlreadyExists { tournament_id: TournamentId },

    #[error("Invalid transition: {0}")]
    InvalidTransition(TransitionError),

    #[error("Not found: {0}")]
    NotFound(NotFound),

    #[error("Internal error: {0}")]
    Internal(&'static str),
}

impl From<TransitionError> for BracketError {
    fn from(err: TransitionError) -> Self {
        BracketError::InvalidTransition(err)
    }
}

impl From<NotFound> for BracketError {
    fn from(err: NotFound) -> Self {
        BracketError::NotFound(err)
    }
}

/// Почему переход состояния матча/сетки отклонён.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransitionError {
    #[error("match {0} does not exist in this bracket")]
    UnknownMatch(MatchId),

    #[error("match {0} is not ready: waiting for feeder matches")]
    NotReady(MatchId),

    #[error("match {match_id} is already terminal ({status:?})")]
    AlreadyTerminal {
        match_id: MatchId,
        status: MatchStatus,
    },

    #[error("match {match_id} cannot go live from {status:?}")]
    NotStarted {
        match_id: MatchId,
        status: MatchStatus,
    },

    #[error("participant {participant} does not play in match {match_id}")]
    WinnerNotInMatch {
        match_id: MatchId,
        participant: ParticipantId,
    },

    #[error("invalid scores for match {match_id}: {reason}")]
    InvalidScores {
        match_id: MatchId,
        reason: &'static str,
    },

    #[error("invalid placements for match {match_id}: {reason}")]
    InvalidPlacements {
        match_id: MatchId,
        reason: &'static str,
    },

    #[error("round {round} still has unfinished matches")]
    RoundInProgress { round: u32 },

    #[error("all configured rounds are already generated")]
    NoMoreRounds,

    #[error("bracket rounds are generated up front, not lazily")]
    NotLazilyGenerated,

    #[error("bracket is completed and read-only")]
    BracketCompleted,
}

/// Отсутствующая сущность.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum NotFound {
    #[error("bracket {0}")]
    Bracket(BracketId),

    #[error("bracket for tournament {0}")]
    Tournament(TournamentId),

    #[error("match {0}")]
    Match(MatchId),

    #[error("participant {0}")]
    Participant(ParticipantId),
}
