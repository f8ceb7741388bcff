// src/domain/config.rs

use serde::{Deserialize, Serialize};

use crate::domain::best_of::BestOfPolicy;
use crate::domain::participant::Participant;
use crate::domain::slot::{Slot, SlotRef};
use crate::domain::{MatchId, ParticipantId, TournamentId};

/// Тип сетки (тег без данных – для DTO, логов и сообщений об ошибках).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum BracketKind {
    SingleElimination,
    DoubleElimination,
    RoundRobin,
    Swiss,
    BattleRoyale,
    Custom,
    MultiStage,
}

impl BracketKind {
    pub fn as_str(self) -> &'static str {
        match self {
            BracketKind::SingleElimination => "single_elimination",
            BracketKind::DoubleElimination => "double_elimination",
            BracketKind::RoundRobin => "round_robin",
            BracketKind::Swiss => "swiss",
            BracketKind::BattleRoyale => "battle_royale",
            BracketKind::Custom => "custom",
            BracketKind::MultiStage => "multi_stage",
        }
    }
}

/// Конфигурация сетки: закрытый набор топологий.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum BracketConfig {
    SingleElimination(EliminationConfig),
    DoubleElimination(DoubleEliminationConfig),
    RoundRobin(RoundRobinConfig),
    Swiss(SwissConfig),
    BattleRoyale(BattleRoyaleConfig),
    Custom(CustomConfig),
    MultiStage(MultiStageConfig),
}

impl BracketConfig {
    pub fn kind(&self) -> BracketKind {
        match self {
            BracketConfig::SingleElimination(_) => BracketKind::SingleElimination,
            BracketConfig::DoubleElimination(_) => BracketKind::DoubleElimination,
            BracketConfig::RoundRobin(_) => BracketKind::RoundRobin,
            BracketConfig::Swiss(_) => BracketKind::Swiss,
            BracketConfig::BattleRoyale(_) => BracketKind::BattleRoyale,
            BracketConfig::Custom(_) => BracketKind::Custom,
            BracketConfig::MultiStage(_) => BracketKind::MultiStage,
        }
    }
}

/// Single elimination: дополнительных настроек нет.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EliminationConfig {}

/// Double elimination.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DoubleEliminationConfig {
    /// Играть ли второй матч гранд-финала, если выиграл финалист сетки проигравших.
    pub grand_finals_reset: bool,
}

impl DoubleEliminationConfig {
    pub fn with_reset() -> Self {
        Self {
            grand_finals_reset: true,
        }
    }
}

/// Состав групп round robin.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum GroupLayout {
    /// Явный список групп с участниками.
    Explicit(Vec<GroupConfig>),
    /// Только количество групп – участники раскладываются "змейкой" по посеву.
    /// Нужно для стадий, чей состав ещё неизвестен при создании сетки.
    Count(u32),
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GroupConfig {
    pub name: String,
    pub participants: Vec<ParticipantId>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoundRobinConfig {
    pub groups: GroupLayout,
}

impl RoundRobinConfig {
    /// Одна группа на всех участников.
    pub fn single_group() -> Self {
        Self {
            groups: GroupLayout::Count(1),
        }
    }
}

/// Швейцарская система.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SwissConfig {
    pub total_rounds: u32,
    /// После стольких побед участник выходит дальше и больше не играет.
    pub wins_to_qualify: Option<u32>,
    /// После стольких поражений участник выбывает.
    pub losses_to_eliminate: Option<u32>,
}

impl SwissConfig {
    /// Классический швейцар без порогов.
    pub fn standard(total_rounds: u32) -> Self {
        Self {
            total_rounds,
            wins_to_qualify: None,
            losses_to_eliminate: None,
        }
    }

    /// Формат "3 победы – проход, 3 поражения – вылет" (5 раундов).
    pub fn best_of_three_thresholds() -> Self {
        Self {
            total_rounds: 5,
            wins_to_qualify: Some(3),
            losses_to_eliminate: Some(3),
        }
    }
}

/// Battle royale: лобби по `teams_per_lobby` участников.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BattleRoyaleConfig {
    pub teams_per_lobby: u32,
    pub total_rounds: u32,
    /// Если задано – из каждого лобби дальше проходят только первые N мест.
    pub advance_per_lobby: Option<u32>,
}

/// Матч кастомной сетки в том виде, как его прислал клиент.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CustomMatchSpec {
    pub id: MatchId,
    pub round: u32,
    pub slots: Vec<Slot>,
    pub best_of: Option<u32>,
    pub winner_to: Option<SlotRef>,
    pub loser_to: Option<SlotRef>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CustomConfig {
    pub matches: Vec<CustomMatchSpec>,
}

/// Правило получения посева стадии из итогов предыдущей.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum AdvanceRule {
    /// Все участники в порядке итоговой таблицы.
    All,
    /// Первые `count` из общей таблицы.
    Top { count: u32 },
    /// Первые `count` из каждой группы (для не-групповых стадий = `Top`).
    TopPerGroup { count: u32 },
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StageConfig {
    pub name: String,
    pub config: BracketConfig,
    /// Как получить участников этой стадии из предыдущей.
    /// Для первой стадии игнорируется.
    pub advance: AdvanceRule,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MultiStageConfig {
    pub stages: Vec<StageConfig>,
}

/// Общие настройки генерации.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenerationSettings {
    pub best_of: BestOfPolicy,
    /// Перемешать участников без явного посева перед генерацией.
    pub shuffle_unseeded: bool,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            best_of: BestOfPolicy::default(),
            shuffle_unseeded: false,
        }
    }
}

/// Запрос на генерацию сетки – всё, что приходит от слоя управления турниром.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenerateRequest {
    pub tournament_id: TournamentId,
    pub name: String,
    pub participants: Vec<Participant>,
    pub config: BracketConfig,
    pub settings: GenerationSettings,
}

impl GenerateRequest {
    pub fn new(
        tournament_id: TournamentId,
        name: impl Into<String>,
        participants: Vec<Participant>,
        config: BracketConfig,
    ) -> Self {
        Self {
            tournament_id,
            name: name.into(),
            participants,
            config,
            settings: GenerationSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: GenerationSettings) -> Self {
        self.settings = settings;
        self
    }
}
