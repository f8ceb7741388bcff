use serde::{Deserialize, Serialize};

use crate::domain::{
    BracketId, MatchId, MatchStatus, ParticipantId, Score, SectionKind, TournamentId,
};

/// DTO участника сетки.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParticipantDto {
    pub participant_id: ParticipantId,
    pub display_name: String,
    pub seed: Option<u32>,
}

/// DTO слота матча.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SlotDto {
    /// `None` для TBD и BYE.
    pub participant_id: Option<ParticipantId>,
    /// Имя участника, "TBD" или "BYE".
    pub label: String,
}

/// DTO матча.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchDto {
    pub match_id: MatchId,
    pub section: SectionKind,
    pub round: u32,
    pub position: u32,
    pub slots: Vec<SlotDto>,
    pub best_of: Option<u32>,
    pub status: MatchStatus,
    pub winner_id: Option<ParticipantId>,
    pub scores: Vec<Score>,
    /// Только для лобби battle royale.
    pub placements: Vec<ParticipantId>,
    /// Матч закрыт через bye.
    pub is_bye: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoundDto {
    pub number: u32,
    pub name: String,
    pub matches: Vec<MatchDto>,
    pub byes: Vec<ParticipantId>,
}

/// Секция: сетка победителей, группа, лобби и т.п.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SectionDto {
    pub label: String,
    pub rounds: Vec<RoundDto>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StageDto {
    pub index: u32,
    pub name: String,
    /// Тип сетки стадии: "single_elimination", "swiss", …
    pub kind: String,
    pub generated: bool,
    pub completed: bool,
    pub sections: Vec<SectionDto>,
}

/// Счётчики сетки для фронта.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatsDto {
    pub total_matches: usize,
    pub completed_matches: usize,
    pub remaining_matches: usize,
    pub bye_matches: usize,
    pub skipped_matches: usize,
    /// Матчи без bye.
    pub contested_matches: usize,
    /// Подпись текущего раунда: "Semi-Finals", "Losers Round 2", …
    pub current_round: Option<String>,
    pub current_stage: Option<u32>,
}

/// Строка таблицы.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StandingDto {
    pub rank: u32,
    pub participant_id: ParticipantId,
    pub display_name: String,
    pub seed: u32,
    pub group: Option<u32>,
    pub wins: u32,
    pub losses: u32,
    pub points: u32,
    pub score_diff: i64,
    pub qualified: bool,
    pub eliminated: bool,
}

/// DTO сетки целиком.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BracketViewDto {
    pub bracket_id: BracketId,
    pub tournament_id: TournamentId,
    pub name: String,
    pub kind: String,
    /// "InProgress" / "Completed".
    pub status: String,
    pub participants: Vec<ParticipantDto>,
    /// Пусто для multi-stage: секции лежат в `stages`.
    pub sections: Vec<SectionDto>,
    pub stages: Vec<StageDto>,
    pub stats: StatsDto,
}

/// Краткая строка для списка сеток.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BracketSummaryDto {
    pub bracket_id: BracketId,
    pub tournament_id: TournamentId,
    pub name: String,
    pub kind: String,
    pub status: String,
}

/// Ответ API на команду.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum CommandResponse {
    /// Успешный результат без доп.данных.
    Ok,

    /// Создана новая сетка.
    BracketCreated(BracketViewDto),

    /// Состояние сетки после команды.
    BracketState(BracketViewDto),

    /// Сгенерирован новый раунд.
    RoundGenerated {
        bracket_id: BracketId,
        round: RoundDto,
    },

    /// Сетка удалена.
    BracketDeleted(BracketId),
}
