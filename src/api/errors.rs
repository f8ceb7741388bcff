use serde::{Deserialize, Serialize};

use crate::domain::{BracketId, MatchId, TournamentId};
use crate::engine::{BracketError, NotFound};
use crate::validation::ErrorReport;

/// Ошибки внешнего API (то, что отдаём фронту / клиенту).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ApiError {
    /// Неправильные входные данные (например, битый JSON).
    BadRequest(String),

    /// Сетка не найдена.
    BracketNotFound(BracketId),

    /// У турнира нет сетки.
    TournamentNotFound(TournamentId),

    /// Матч не найден в сетке.
    MatchNotFound(MatchId),

    /// У турнира уже есть сетка.
    Conflict(String),

    /// Команда не может быть выполнена в текущем состоянии сетки.
    InvalidCommand(String),

    /// Конфигурация отклонена: сообщение, ошибки по полям, подсказки.
    Rejected(ErrorReport),

    /// Внутренняя ошибка сервера.
    Internal(String),
}

impl From<BracketError> for ApiError {
    fn from(err: BracketError) -> Self {
        match err {
            BracketError::NotFound(NotFound::Bracket(id)) => ApiError::BracketNotFound(id),
            BracketError::NotFound(NotFound::Tournament(id)) => ApiError::TournamentNotFound(id),
            BracketError::NotFound(NotFound::Match(id)) => ApiError::MatchNotFound(id),
            BracketError::NotFound(other) => ApiError::BadRequest(other.to_string()),
            BracketError::BracketAlreadyExists { .. } => ApiError::Conflict(err.to_string()),
            BracketError::InvalidTransition(_) => ApiError::InvalidCommand(err.to_string()),
            BracketError::Internal(_) => ApiError::Internal(err.to_string()),
            BracketError::InsufficientParticipants { .. }
            | BracketError::InvalidConfiguration(_)
            | BracketError::DuplicateAssignment { .. } => ApiError::Rejected(err.to_report()),
        }
    }
}
