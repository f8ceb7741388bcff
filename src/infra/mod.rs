//! Инфраструктурный слой вокруг движка сеток:
//! - генерация ID;
//! - RNG-реализации для перемешивания посева;
//! - абстракция хранения (off-chain / тесты);
//! - маппинги между domain и API.

pub mod ids;
pub mod mapping;
pub mod persistence;
pub mod rng;

pub use ids::*;
pub use mapping::*;
pub use persistence::*;
pub use rng::*;
