//! Доменная модель турнирной сетки: участники, слоты, матчи, раунды, сетки, конфиги.

pub mod best_of;
pub mod bracket;
pub mod config;
pub mod game;
pub mod participant;
pub mod round;
pub mod slot;

// Базовые идентификаторы.
pub type ParticipantId = u64;
pub type MatchId = u64;
pub type BracketId = u64;
pub type TournamentId = u64;

// Удобные реэкспорты, чтобы в других модулях писать crate::domain::Match и т.п.
pub use best_of::*;
pub use bracket::*;
pub use config::*;
pub use game::*;
pub use participant::*;
pub use round::*;
pub use slot::*;
