// src/domain/round.rs

use serde::{Deserialize, Serialize};

use crate::domain::game::Match;
use crate::domain::ParticipantId;

/// Секция сетки, которой принадлежит матч.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Winners,
    Losers,
    GrandFinals,
    /// Группа round robin (индекс группы, 0-based).
    Group(u32),
    Swiss,
    Lobby,
    Custom,
}

/// Раунд: упорядоченная позиция внутри секции.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Round {
    /// Номер раунда (1-based).
    pub number: u32,
    /// Подпись для людей: "Quarterfinals", "Losers Round 3" и т.п.
    pub name: String,
    pub matches: Vec<Match>,
    /// Участники, получившие bye в этом раунде (swiss, round robin с нечётной группой).
    pub byes: Vec<ParticipantId>,
}

impl Round {
    pub fn new(number: u32, name: impl Into<String>) -> Self {
        Self {
            number,
            name: name.into(),
            matches: Vec::new(),
            byes: Vec::new(),
        }
    }

    /// Все матчи раунда завершены или пропущены.
    pub fn is_finished(&self) -> bool {
        self.matches.iter().all(Match::is_terminal)
    }
}

/// Секция: набор раундов одного вида.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Section {
    pub kind: SectionKind,
    pub rounds: Vec<Round>,
}

impl Section {
    pub fn new(kind: SectionKind) -> Self {
        Self {
            kind,
            rounds: Vec::new(),
        }
    }

    pub fn matches(&self) -> impl Iterator<Item = &Match> {
        self.rounds.iter().flat_map(|r| r.matches.iter())
    }

    pub fn matches_mut(&mut self) -> impl Iterator<Item = &mut Match> {
        self.rounds.iter_mut().flat_map(|r| r.matches.iter_mut())
    }

    pub fn round(&self, number: u32) -> Option<&Round> {
        self.rounds.iter().find(|r| r.number == number)
    }

    pub fn last_round(&self) -> Option<&Round> {
        self.rounds.last()
    }
}

/// Именованная группа round robin.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Group {
    pub index: u32,
    pub name: String,
    pub participants: Vec<ParticipantId>,
    pub rounds: Vec<Round>,
}

impl Group {
    pub fn matches(&self) -> impl Iterator<Item = &Match> {
        self.rounds.iter().flat_map(|r| r.matches.iter())
    }
}
