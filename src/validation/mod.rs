//! Валидация конфигурации сетки и маппинг причин отказа в сообщения.
//!
//! Две фазы:
//! - rules.rs – структурная проверка запроса, все ошибки полей за один проход;
//! - mapper.rs – перевод кодов причин в сообщения и подсказки для UI.

pub mod mapper;
pub mod report;
pub mod rules;

pub use mapper::{ErrorMapper, ErrorReport, FieldMessage, MessageLookup};
pub use report::{FieldError, ReasonCode, ValidationReport};
pub use rules::validate;
