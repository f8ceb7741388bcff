//! Движок прогрессии сеток: результаты матчей, ленивые раунды, стадии, таблицы.
//!
//! Основные операции:
//!   - `start_match` – перевести матч в Live
//!   - `set_match_result` / `submit_result` – применить результат и продвинуть сетку
//!   - `generate_next_round` – следующий раунд швейцарки / battle royale
//!   - `standings` – текущая таблица
//!
//! Все операции "всё или ничего": работа идёт на копии сетки,
//! которая заменяет оригинал только при успехе.

pub mod errors;
pub mod next_round;
pub mod progression;
pub mod stages;
pub mod standings;

pub use errors::{BracketError, NotFound, TransitionError};
pub use next_round::generate_next_round;
pub use progression::{
    set_match_result, settle, start_match, submit_result, ResultSubmission, SubmittedOutcome,
};
pub use standings::{standings, standings_for, Standing};

/// RNG интерфейс для engine.
/// Реализации – в infra (обёртка над `rand` и детерминированная для тестов).
pub trait RandomSource {
    fn shuffle<T>(&mut self, slice: &mut [T]);
}
