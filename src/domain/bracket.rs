// src/domain/bracket.rs

use serde::{Deserialize, Serialize};

use crate::domain::best_of::BestOfPolicy;
use crate::domain::config::{AdvanceRule, BracketConfig, BracketKind};
use crate::domain::game::Match;
use crate::domain::participant::Participant;
use crate::domain::round::{Group, Round, Section};
use crate::domain::{BracketId, MatchId, ParticipantId, TournamentId};

/// Статус сетки целиком.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum BracketStatus {
    InProgress,
    /// Терминальное состояние: сетка только для чтения.
    Completed,
}

/// Структура сетки. Вариант всегда совпадает с вариантом `BracketConfig`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum BracketBody {
    SingleElimination {
        winners: Section,
    },
    DoubleElimination {
        winners: Section,
        losers: Section,
        grand_finals: Section,
    },
    RoundRobin {
        groups: Vec<Group>,
    },
    Swiss {
        rounds: Vec<Round>,
    },
    BattleRoyale {
        rounds: Vec<Round>,
    },
    Custom {
        matches: Vec<Match>,
    },
    MultiStage {
        stages: Vec<Stage>,
    },
}

impl BracketBody {
    /// Все матчи структуры, включая вложенные стадии.
    pub fn matches(&self) -> Box<dyn Iterator<Item = &Match> + '_> {
        match self {
            BracketBody::SingleElimination { winners } => Box::new(winners.matches()),
            BracketBody::DoubleElimination {
                winners,
                losers,
                grand_finals,
            } => Box::new(
                winners
                    .matches()
                    .chain(losers.matches())
                    .chain(grand_finals.matches()),
            ),
            BracketBody::RoundRobin { groups } => {
                Box::new(groups.iter().flat_map(|g| g.matches()))
            }
            BracketBody::Swiss { rounds } | BracketBody::BattleRoyale { rounds } => {
                Box::new(rounds.iter().flat_map(|r| r.matches.iter()))
            }
            BracketBody::Custom { matches } => Box::new(matches.iter()),
            BracketBody::MultiStage { stages } => Box::new(
                stages
                    .iter()
                    .filter_map(|s| s.body.as_ref())
                    .flat_map(|b| b.matches()),
            ),
        }
    }

    pub fn matches_mut(&mut self) -> Box<dyn Iterator<Item = &mut Match> + '_> {
        match self {
            BracketBody::SingleElimination { winners } => Box::new(winners.matches_mut()),
            BracketBody::DoubleElimination {
                winners,
                losers,
                grand_finals,
            } => Box::new(
                winners
                    .matches_mut()
                    .chain(losers.matches_mut())
                    .chain(grand_finals.matches_mut()),
            ),
            BracketBody::RoundRobin { groups } => Box::new(
                groups
                    .iter_mut()
                    .flat_map(|g| g.rounds.iter_mut())
                    .flat_map(|r| r.matches.iter_mut()),
            ),
            BracketBody::Swiss { rounds } | BracketBody::BattleRoyale { rounds } => {
                Box::new(rounds.iter_mut().flat_map(|r| r.matches.iter_mut()))
            }
            BracketBody::Custom { matches } => Box::new(matches.iter_mut()),
            BracketBody::MultiStage { stages } => Box::new(
                stages
                    .iter_mut()
                    .filter_map(|s| s.body.as_mut())
                    .flat_map(|b| b.matches_mut()),
            ),
        }
    }

    pub fn find_match(&self, id: MatchId) -> Option<&Match> {
        self.matches().find(|m| m.id == id)
    }

    pub fn find_match_mut(&mut self, id: MatchId) -> Option<&mut Match> {
        self.matches_mut().find(|m| m.id == id)
    }

    /// Все ли матчи структуры в терминальном статусе.
    pub fn all_matches_terminal(&self) -> bool {
        self.matches().all(Match::is_terminal)
    }
}

/// Одна стадия multi-stage сетки.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Stage {
    pub index: u32,
    pub name: String,
    pub config: BracketConfig,
    pub advance: AdvanceRule,
    /// Посев стадии. Пустой, пока стадия не сгенерирована.
    pub participants: Vec<Participant>,
    /// `None`, пока предыдущая стадия не завершена.
    pub body: Option<BracketBody>,
    pub completed: bool,
}

impl Stage {
    pub fn is_generated(&self) -> bool {
        self.body.is_some()
    }
}

/// Корневой агрегат: сетка турнира.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Bracket {
    pub id: BracketId,
    pub tournament_id: TournamentId,
    pub name: String,
    pub config: BracketConfig,
    /// Участники в порядке посева (seed 1 первым).
    pub participants: Vec<Participant>,
    pub best_of: BestOfPolicy,
    pub body: BracketBody,
    pub status: BracketStatus,
    /// Следующий свободный MatchId (нужен для ленивых раундов и стадий).
    pub next_match_id: MatchId,
}

impl Bracket {
    pub fn kind(&self) -> BracketKind {
        self.config.kind()
    }

    pub fn is_completed(&self) -> bool {
        self.status == BracketStatus::Completed
    }

    pub fn matches(&self) -> Box<dyn Iterator<Item = &Match> + '_> {
        self.body.matches()
    }

    pub fn find_match(&self, id: MatchId) -> Option<&Match> {
        self.body.find_match(id)
    }

    pub fn participant(&self, id: ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    /// Длина матча для (stage, round) с учётом исключений.
    pub fn best_of_for(&self, stage: u32, round: u32) -> u32 {
        self.best_of.best_of_for(stage, round)
    }
}

/// Выдача MatchId при генерации. Монотонный счётчик внутри одной сетки.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MatchIdAllocator {
    next: MatchId,
}

impl MatchIdAllocator {
    pub fn new(start: MatchId) -> Self {
        Self { next: start }
    }

    #[inline]
    pub fn next_id(&mut self) -> MatchId {
        let id = self.next;
        self.next += 1;
        id
    }

    /// Следующий id, который будет выдан (сохраняется в `Bracket::next_match_id`).
    pub fn peek(&self) -> MatchId {
        self.next
    }

    /// Не выдавать id меньше `min` (кастомные сетки приходят со своими id).
    pub fn reserve_below(&mut self, min: MatchId) {
        if self.next < min {
            self.next = min;
        }
    }
}

impl Default for MatchIdAllocator {
    fn default() -> Self {
        Self::new(1)
    }
}
