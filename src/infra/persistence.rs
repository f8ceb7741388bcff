use std::collections::HashMap;

use crate::domain::{Bracket, BracketId, TournamentId};

/// Абстракция хранилища сеток.
///
/// В Linera-режиме вместо этого используется `BracketState` и Views,
/// но эта абстракция удобна:
/// - для юнит- и интеграционных тестов движка,
/// - для оффчейн-сервисов (например, lobby-сервер).
pub trait BracketStorage {
    /// Загрузить сетку.
    fn load_bracket(&self, id: BracketId) -> Option<Bracket>;

    /// Сохранить сетку (создать или перезаписать).
    fn save_bracket(&mut self, bracket: &Bracket);

    /// Удалить сетку. Возвращает удалённую.
    fn delete_bracket(&mut self, id: BracketId) -> Option<Bracket>;

    /// Сетка турнира.
    fn bracket_for_tournament(&self, tournament_id: TournamentId) -> Option<BracketId>;

    /// Все сохранённые id (по возрастанию).
    fn bracket_ids(&self) -> Vec<BracketId>;
}

/// Простая in-memory реализация для тестов и локального запуска.
#[derive(Debug, Default)]
pub struct InMemoryBracketStorage {
    brackets: HashMap<BracketId, Bracket>,
    by_tournament: HashMap<TournamentId, BracketId>,
}

impl InMemoryBracketStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.brackets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.brackets.is_empty()
    }
}

impl BracketStorage for InMemoryBracketStorage {
    fn load_bracket(&self, id: BracketId) -> Option<Bracket> {
        self.brackets.get(&id).cloned()
    }

    fn save_bracket(&mut self, bracket: &Bracket) {
        self.by_tournament.insert(bracket.tournament_id, bracket.id);
        self.brackets.insert(bracket.id, bracket.clone());
    }

    fn delete_bracket(&mut self, id: BracketId) -> Option<Bracket> {
        let removed = self.brackets.remove(&id)?;
        if self.by_tournament.get(&removed.tournament_id) == Some(&id) {
            self.by_tournament.remove(&removed.tournament_id);
        }
        Some(removed)
    }

    fn bracket_for_tournament(&self, tournament_id: TournamentId) -> Option<BracketId> {
        self.by_tournament.get(&tournament_id).copied()
    }

    fn bracket_ids(&self) -> Vec<BracketId> {
        let mut ids: Vec<BracketId> = self.brackets.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}
