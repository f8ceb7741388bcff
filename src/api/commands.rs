use serde::{Deserialize, Serialize};

use crate::domain::{BracketId, GenerateRequest, MatchId};
use crate::engine::ResultSubmission;

/// Команда верхнего уровня.
///
/// Эти команды превращаются в операции (`BracketOperation`),
/// которые Linera экспонирует наружу.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Command {
    /// Сгенерировать сетку для турнира (одна сетка на турнир).
    GenerateBracket(GenerateBracketCommand),

    /// Перевести матч в Live.
    StartMatch(StartMatchCommand),

    /// Сообщить результат матча.
    ///
    /// Движок сам продвигает победителя/проигравшего, закрывает bye,
    /// решает судьбу ресета гранд-финала и запускает следующую стадию.
    SubmitResult(SubmitResultCommand),

    /// Следующий раунд швейцарки / battle royale.
    GenerateNextRound(GenerateNextRoundCommand),

    /// Удалить сетку (перегенерация = удалить и создать заново).
    DeleteBracket(DeleteBracketCommand),
}

/// Создание сетки.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GenerateBracketCommand {
    /// Участники, топология, длина матчей.
    pub request: GenerateRequest,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StartMatchCommand {
    pub bracket_id: BracketId,
    pub match_id: MatchId,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SubmitResultCommand {
    pub bracket_id: BracketId,
    pub submission: ResultSubmission,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GenerateNextRoundCommand {
    pub bracket_id: BracketId,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeleteBracketCommand {
    pub bracket_id: BracketId,
}
