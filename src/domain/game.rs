// src/domain/game.rs

use serde::{Deserialize, Serialize};

use crate::domain::round::SectionKind;
use crate::domain::slot::{Slot, SlotRef};
use crate::domain::{MatchId, ParticipantId};

/// Статус матча.
///
/// Переходы только вперёд:
///   Pending → Scheduled → Live → Completed
/// `Skipped` – терминальный статус для ресета гранд-финала, который не понадобился.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum MatchStatus {
    /// Есть хотя бы один `Tbd` слот.
    Pending,
    Scheduled,
    Live,
    Completed,
    Skipped,
}

impl MatchStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, MatchStatus::Completed | MatchStatus::Skipped)
    }
}

/// Как был решён матч.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Outcome {
    Played,
    Forfeit,
    /// Обе стороны снялись – победителя нет.
    DoubleForfeit,
    /// Авто-проход через bye (без счёта).
    Bye,
}

/// Счёт одного участника в матче.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Score {
    pub participant: ParticipantId,
    pub score: u32,
}

impl Score {
    pub fn new(participant: ParticipantId, score: u32) -> Self {
        Self { participant, score }
    }
}

/// Результат матча.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchResult {
    pub outcome: Outcome,
    pub winner: Option<ParticipantId>,
    pub scores: Vec<Score>,
    /// Порядок мест в лобби (только battle royale), [0] = первое место.
    pub placements: Vec<ParticipantId>,
}

impl MatchResult {
    pub fn bye(winner: Option<ParticipantId>) -> Self {
        Self {
            outcome: Outcome::Bye,
            winner,
            scores: Vec::new(),
            placements: Vec::new(),
        }
    }

    pub fn score_of(&self, participant: ParticipantId) -> Option<u32> {
        self.scores
            .iter()
            .find(|s| s.participant == participant)
            .map(|s| s.score)
    }
}

/// Матч сетки.
///
/// Для дуэльных топологий `slots.len() == 2`, для лобби battle royale – N.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Match {
    pub id: MatchId,
    pub section: SectionKind,
    /// Номер раунда внутри секции (1-based).
    pub round: u32,
    /// Позиция матча внутри раунда (0-based).
    pub position: u32,
    pub slots: Vec<Slot>,
    pub best_of: Option<u32>,
    pub status: MatchStatus,
    pub result: Option<MatchResult>,
    /// Куда уходит победитель.
    pub winner_to: Option<SlotRef>,
    /// Куда уходит проигравший (только double elimination).
    pub loser_to: Option<SlotRef>,
}

impl Match {
    /// Дуэльный матч. Статус выводится из слотов.
    pub fn head_to_head(
        id: MatchId,
        section: SectionKind,
        round: u32,
        position: u32,
        a: Slot,
        b: Slot,
        best_of: Option<u32>,
    ) -> Self {
        Self::with_slots(id, section, round, position, vec![a, b], best_of)
    }

    pub fn with_slots(
        id: MatchId,
        section: SectionKind,
        round: u32,
        position: u32,
        slots: Vec<Slot>,
        best_of: Option<u32>,
    ) -> Self {
        let status = if slots.iter().all(Slot::is_resolved) {
            MatchStatus::Scheduled
        } else {
            MatchStatus::Pending
        };

        Self {
            id,
            section,
            round,
            position,
            slots,
            best_of,
            status,
            result: None,
            winner_to: None,
            loser_to: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn is_completed(&self) -> bool {
        self.status == MatchStatus::Completed
    }

    /// Матч закрыт автоматически через bye.
    pub fn is_bye(&self) -> bool {
        matches!(&self.result, Some(r) if r.outcome == Outcome::Bye)
    }

    /// Все ли слоты разрешены (нет `Tbd`).
    pub fn is_ready(&self) -> bool {
        self.slots.iter().all(Slot::is_resolved)
    }

    /// Конкретные участники матча (без Tbd/Bye).
    pub fn participants(&self) -> Vec<ParticipantId> {
        self.slots.iter().filter_map(Slot::participant).collect()
    }

    pub fn contains(&self, participant: ParticipantId) -> bool {
        self.slots
            .iter()
            .any(|s| s.participant() == Some(participant))
    }

    pub fn winner(&self) -> Option<ParticipantId> {
        self.result.as_ref().and_then(|r| r.winner)
    }

    /// Проигравший дуэльного матча (если он был).
    pub fn loser(&self) -> Option<ParticipantId> {
        let winner = self.winner()?;
        self.participants().into_iter().find(|p| *p != winner)
    }
}
