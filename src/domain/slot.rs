// src/domain/slot.rs

use serde::{Deserialize, Serialize};

use crate::domain::{MatchId, ParticipantId};

/// Слот матча.
///
/// Три взаимоисключающих состояния: конкретный участник, ожидание
/// победителя/проигравшего из матча-фидера (`Tbd`) или пустое место (`Bye`).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Slot {
    Participant(ParticipantId),
    Tbd,
    Bye,
}

impl Slot {
    pub fn participant(&self) -> Option<ParticipantId> {
        match self {
            Slot::Participant(id) => Some(*id),
            Slot::Tbd | Slot::Bye => None,
        }
    }

    /// Слот разрешён: либо участник, либо bye.
    pub fn is_resolved(&self) -> bool {
        !matches!(self, Slot::Tbd)
    }

    pub fn is_bye(&self) -> bool {
        matches!(self, Slot::Bye)
    }
}

impl From<Option<ParticipantId>> for Slot {
    fn from(value: Option<ParticipantId>) -> Self {
        match value {
            Some(id) => Slot::Participant(id),
            None => Slot::Bye,
        }
    }
}

/// Ссылка на конкретный слот конкретного матча.
///
/// Генератор проставляет такие ссылки для победителя/проигравшего,
/// движок прогрессии просто идёт по ним.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct SlotRef {
    pub match_id: MatchId,
    pub slot: usize,
}

impl SlotRef {
    pub fn new(match_id: MatchId, slot: usize) -> Self {
        Self { match_id, slot }
    }
}
