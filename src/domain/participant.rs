// src/domain/participant.rs

use serde::{Deserialize, Serialize};

use crate::domain::ParticipantId;

/// Участник сетки (команда или игрок).
///
/// `seed` – 1-based место в посеве. До генерации может быть `None`,
/// после генерации проставлен у всех и больше не меняется.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Participant {
    pub id: ParticipantId,
    /// Отображаемое имя.
    pub name: String,
    /// Место в посеве (1 = сильнейший).
    pub seed: Option<u32>,
}

impl Participant {
    pub fn new(id: ParticipantId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            seed: None,
        }
    }

    pub fn seeded(id: ParticipantId, name: impl Into<String>, seed: u32) -> Self {
        Self {
            id,
            name: name.into(),
            seed: Some(seed),
        }
    }

    /// Посев для сортировок: участники без посева уходят в конец.
    pub fn seed_or_max(&self) -> u32 {
        self.seed.unwrap_or(u32::MAX)
    }
}
