// src/validation/report.rs

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::ParticipantId;
use crate::engine::errors::BracketError;

/// Машинно-читаемая причина ошибки поля.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ReasonCode {
    InsufficientParticipants { required: usize, found: usize },
    DuplicateParticipant,
    SeedOutOfRange,
    DuplicateSeed,
    MissingField,
    OutOfRange,
    TooManyRounds,
    BestOfInvalid,
    GroupsMissing,
    GroupTooSmall,
    DuplicateAssignment {
        participant_id: ParticipantId,
        first_group: u32,
        second_group: u32,
    },
    UnknownParticipant,
    UnassignedParticipant,
    DuplicateMatchId,
    InvalidSlotCount,
    InvalidLink,
    UnfedSlot,
    NestedMultiStage,
    StageTopologyUnsupported,
    AdvanceCountOutOfRange,
}

impl ReasonCode {
    /// Стабильный код причины (именно по нему работает маппер сообщений).
    pub fn as_str(&self) -> &'static str {
        match self {
            ReasonCode::InsufficientParticipants { .. } => "insufficient_participants",
            ReasonCode::DuplicateParticipant => "duplicate_participant",
            ReasonCode::SeedOutOfRange => "seed_out_of_range",
            ReasonCode::DuplicateSeed => "duplicate_seed",
            ReasonCode::MissingField => "missing_field",
            ReasonCode::OutOfRange => "out_of_range",
            ReasonCode::TooManyRounds => "too_many_rounds",
            ReasonCode::BestOfInvalid => "best_of_invalid",
            ReasonCode::GroupsMissing => "groups_missing",
            ReasonCode::GroupTooSmall => "group_too_small",
            ReasonCode::DuplicateAssignment { .. } => "duplicate_assignment",
            ReasonCode::UnknownParticipant => "unknown_participant",
            ReasonCode::UnassignedParticipant => "unassigned_participant",
            ReasonCode::DuplicateMatchId => "duplicate_match_id",
            ReasonCode::InvalidSlotCount => "invalid_slot_count",
            ReasonCode::InvalidLink => "invalid_link",
            ReasonCode::UnfedSlot => "unfed_slot",
            ReasonCode::NestedMultiStage => "nested_multi_stage",
            ReasonCode::StageTopologyUnsupported => "stage_topology_unsupported",
            ReasonCode::AdvanceCountOutOfRange => "advance_count_out_of_range",
        }
    }
}

/// Ошибка конкретного поля: путь вида `config.groups[1].participants`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub reason: ReasonCode,
    pub detail: String,
}

/// Результат валидации: все найденные ошибки за один проход.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationReport {
    pub errors: Vec<FieldError>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: impl Into<String>, reason: ReasonCode, detail: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.into(),
            reason,
            detail: detail.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Есть ли ошибка с таким кодом.
    pub fn has(&self, code: &str) -> bool {
        self.errors.iter().any(|e| e.reason.as_str() == code)
    }

    /// Ошибки для конкретного поля.
    pub fn for_field<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a FieldError> + 'a {
        self.errors.iter().filter(move |e| e.field == field)
    }

    /// Превратить отчёт в результат.
    ///
    /// Одиночная ошибка количества участников или двойного назначения
    /// отдаётся своим вариантом `BracketError`, всё остальное – целым отчётом.
    pub fn into_result(self) -> Result<(), BracketError> {
        if self.errors.is_empty() {
            return Ok(());
        }

        if self.errors.len() == 1 {
            match self.errors[0].reason {
                ReasonCode::InsufficientParticipants { required, found } => {
                    return Err(BracketError::InsufficientParticipants { required, found });
                }
                ReasonCode::DuplicateAssignment {
                    participant_id,
                    first_group,
                    second_group,
                } => {
                    return Err(BracketError::DuplicateAssignment {
                        participant_id,
                        first_group,
                        second_group,
                    });
                }
                _ => {}
            }
        }

        Err(BracketError::InvalidConfiguration(self))
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} field error(s)", self.errors.len())?;
        for (i, e) in self.errors.iter().enumerate() {
            let sep = if i == 0 { ": " } else { "; " };
            write!(f, "{}{}: {}", sep, e.field, e.reason.as_str())?;
        }
        Ok(())
    }
}
