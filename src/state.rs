use linera_sdk::views::{linera_views, MapView, RegisterView, RootView, ViewStorageContext};

use crate::domain::{Bracket, BracketId, TournamentId};

/// Глобальное состояние приложения сеток на Linera.
///
/// Важное:
/// - НЕ вкладываем RegisterView внутрь MapView.
/// - Храним доменную структуру `Bracket` целиком: прогрессия работает
///   на копии и записывает её обратно одной вставкой.
#[derive(RootView)]
#[view(context = ViewStorageContext)]
pub struct BracketState {
    /// Все сетки.
    ///
    /// Ключ: BracketId,
    /// Значение: доменная структура Bracket (Serialize + Deserialize).
    #[view(map)]
    pub brackets: MapView<BracketId, Bracket>,

    /// Сетка каждого турнира (не больше одной).
    #[view(map)]
    pub tournament_brackets: MapView<TournamentId, BracketId>,

    /// Следующий свободный BracketId.
    #[view(register)]
    pub next_bracket_id: RegisterView<BracketId>,
}
