// src/domain/best_of.rs

use serde::{Deserialize, Serialize};

/// Исключение из длины матча по умолчанию для конкретного раунда стадии.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BestOfOverride {
    /// Индекс стадии (0 для обычной, не multi-stage, сетки).
    pub stage: u32,
    /// Номер раунда (1-based).
    pub round: u32,
    pub best_of: u32,
}

/// Длина матчей: значение по умолчанию + разреженный список исключений.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BestOfPolicy {
    pub default_best_of: u32,
    pub overrides: Vec<BestOfOverride>,
}

impl Default for BestOfPolicy {
    fn default() -> Self {
        Self {
            default_best_of: 1,
            overrides: Vec::new(),
        }
    }
}

impl BestOfPolicy {
    pub fn new(default_best_of: u32) -> Self {
        Self {
            default_best_of,
            overrides: Vec::new(),
        }
    }

    /// Добавить исключение (builder-стиль).
    pub fn with_override(mut self, stage: u32, round: u32, best_of: u32) -> Self {
        self.overrides.push(BestOfOverride {
            stage,
            round,
            best_of,
        });
        self
    }

    /// Длина матча для (stage, round). Без исключения – значение по умолчанию.
    pub fn best_of_for(&self, stage: u32, round: u32) -> u32 {
        self.overrides
            .iter()
            .rev()
            .find(|o| o.stage == stage && o.round == round)
            .map(|o| o.best_of)
            .unwrap_or(self.default_best_of)
    }
}
