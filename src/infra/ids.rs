use std::sync::atomic::{AtomicU64, Ordering};

use crate::domain::BracketId;

/// Монотонный счётчик BracketId для лобби.
///
/// MatchId сюда не входит: их выдаёт сама сетка (`Bracket::next_match_id`).
/// Id турниров и участников приходят от клиента.
#[derive(Debug)]
pub struct IdGenerator {
    bracket_counter: AtomicU64,
}

impl IdGenerator {
    /// Нумерация с 1.
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// Продолжить нумерацию сеток после восстановления из хранилища.
    pub fn starting_at(next_bracket_id: BracketId) -> Self {
        Self {
            bracket_counter: AtomicU64::new(next_bracket_id.max(1)),
        }
    }

    #[inline]
    pub fn next_bracket_id(&self) -> BracketId {
        self.bracket_counter.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
