use serde::{Deserialize, Serialize};

use crate::domain::{Bracket, BracketConfig, BracketId, MatchId, TournamentId};
use crate::engine::standings;
use crate::infra::mapping::{map_standing_to_dto, map_stats_to_dto};
use crate::stats::count_stats;
use crate::topology::BracketPreview;

use super::dto::{BracketSummaryDto, BracketViewDto, MatchDto, StandingDto, StatsDto};

/// Запросы "только чтение".
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Query {
    /// Получить сетку целиком.
    GetBracket { bracket_id: BracketId },

    /// Сетка турнира.
    GetTournamentBracket { tournament_id: TournamentId },

    /// Один матч.
    GetMatch {
        bracket_id: BracketId,
        match_id: MatchId,
    },

    /// Счётчики матчей.
    GetStats { bracket_id: BracketId },

    /// Текущая таблица.
    GetStandings { bracket_id: BracketId },

    /// Список сеток (для лобби).
    ListBrackets,

    /// Структура сетки без участников (до регистрации).
    Preview {
        participant_count: usize,
        config: BracketConfig,
    },
}

/// Результат запроса "только чтение".
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum QueryResponse {
    Bracket(BracketViewDto),
    Brackets(Vec<BracketSummaryDto>),
    Match(MatchDto),
    Stats(StatsDto),
    Standings(Vec<StandingDto>),
    Preview(BracketPreview),
}

/// Счётчики сетки в виде DTO.
pub fn build_stats_view(bracket: &Bracket) -> StatsDto {
    map_stats_to_dto(&count_stats(bracket))
}

/// Таблица сетки в виде DTO. Имена берутся из сетки.
pub fn build_standings_view(bracket: &Bracket) -> Vec<StandingDto> {
    standings(bracket)
        .iter()
        .map(|s| map_standing_to_dto(s, bracket))
        .collect()
}
