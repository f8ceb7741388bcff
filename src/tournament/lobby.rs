// src/tournament/lobby.rs

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use tracing::info;

use crate::api::queries::{build_standings_view, build_stats_view};
use crate::api::{ApiError, Command, CommandResponse, Query, QueryResponse};
use crate::domain::{Bracket, BracketId, GenerateRequest, MatchId, Round, TournamentId};
use crate::engine::{self, BracketError, NotFound, RandomSource, ResultSubmission};
use crate::infra::mapping::{
    map_bracket_to_dto, map_bracket_to_summary, map_match_to_dto, map_round_to_dto,
};
use crate::infra::persistence::BracketStorage;
use crate::infra::{IdGenerator, SystemRng};
use crate::topology;

type SharedBracket = Arc<RwLock<Bracket>>;

#[derive(Default)]
struct Registry {
    brackets: HashMap<BracketId, SharedBracket>,
    by_tournament: HashMap<TournamentId, BracketId>,
}

/// Лобби сеток:
/// - хранит сетки в памяти, каждую за своим `RwLock`;
/// - выдаёт новые BracketId;
/// - одна сетка на турнир;
/// - в каждую сетку одновременно пишет только один поток, читать можно параллельно.
pub struct BracketLobby<R: RandomSource = SystemRng> {
    registry: RwLock<Registry>,
    ids: IdGenerator,
    rng: Mutex<R>,
}

fn poisoned<T>(_: T) -> BracketError {
    BracketError::Internal("lobby lock poisoned")
}

impl BracketLobby<SystemRng> {
    /// Пустое лобби, без сеток.
    pub fn new() -> Self {
        Self::with_rng(SystemRng)
    }
}

impl Default for BracketLobby<SystemRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RandomSource> BracketLobby<R> {
    /// Лобби со своим RNG (для тестов – детерминированный).
    pub fn with_rng(rng: R) -> Self {
        Self {
            registry: RwLock::new(Registry::default()),
            ids: IdGenerator::new(),
            rng: Mutex::new(rng),
        }
    }

    /// Восстановить лобби из хранилища.
    pub fn restore(storage: &impl BracketStorage, rng: R) -> Self {
        let mut registry = Registry::default();
        let mut max_id = 0;

        for id in storage.bracket_ids() {
            if let Some(bracket) = storage.load_bracket(id) {
                max_id = max_id.max(id);
                registry.by_tournament.insert(bracket.tournament_id, id);
                registry
                    .brackets
                    .insert(id, Arc::new(RwLock::new(bracket)));
            }
        }

        Self {
            registry: RwLock::new(registry),
            ids: IdGenerator::starting_at(max_id + 1),
            rng: Mutex::new(rng),
        }
    }

    /// Сохранить снимок всех сеток.
    pub fn save_all(&self, storage: &mut impl BracketStorage) -> Result<usize, BracketError> {
        let registry = self.registry.read().map_err(poisoned)?;
        for shared in registry.brackets.values() {
            let bracket = shared.read().map_err(poisoned)?;
            storage.save_bracket(&bracket);
        }
        Ok(registry.brackets.len())
    }

    /// Сгенерировать сетку для турнира.
    ///
    /// Проверка "одна сетка на турнир" и вставка идут под одной блокировкой.
    pub fn create_bracket(&self, request: &GenerateRequest) -> Result<BracketId, BracketError> {
        let mut registry = self.registry.write().map_err(poisoned)?;

        if registry.by_tournament.contains_key(&request.tournament_id) {
            return Err(BracketError::BracketAlreadyExists {
                tournament_id: request.tournament_id,
            });
        }

        let id = self.ids.next_bracket_id();
        let bracket = {
            let mut rng = self.rng.lock().map_err(poisoned)?;
            topology::generate_with_rng(request, id, &mut *rng)?
        };

        registry.by_tournament.insert(request.tournament_id, id);
        registry.brackets.insert(id, Arc::new(RwLock::new(bracket)));
        Ok(id)
    }

    /// Удалить сетку (после этого турнир может получить новую).
    pub fn delete_bracket(&self, id: BracketId) -> Result<(), BracketError> {
        let mut registry = self.registry.write().map_err(poisoned)?;
        let shared = registry
            .brackets
            .remove(&id)
            .ok_or(NotFound::Bracket(id))?;

        let tournament_id = shared.read().map_err(poisoned)?.tournament_id;
        registry.by_tournament.remove(&tournament_id);

        info!(bracket_id = id, tournament_id, "bracket deleted");
        Ok(())
    }

    fn shared(&self, id: BracketId) -> Result<SharedBracket, BracketError> {
        let registry = self.registry.read().map_err(poisoned)?;
        registry
            .brackets
            .get(&id)
            .cloned()
            .ok_or(BracketError::NotFound(NotFound::Bracket(id)))
    }

    /// Сетка турнира.
    pub fn bracket_for_tournament(
        &self,
        tournament_id: TournamentId,
    ) -> Result<BracketId, BracketError> {
        let registry = self.registry.read().map_err(poisoned)?;
        registry
            .by_tournament
            .get(&tournament_id)
            .copied()
            .ok_or(BracketError::NotFound(NotFound::Tournament(tournament_id)))
    }

    /// Все id сеток (по возрастанию).
    pub fn bracket_ids(&self) -> Result<Vec<BracketId>, BracketError> {
        let registry = self.registry.read().map_err(poisoned)?;
        let mut ids: Vec<BracketId> = registry.brackets.keys().copied().collect();
        ids.sort_unstable();
        Ok(ids)
    }

    /// Чтение сетки под read-блокировкой.
    pub fn read<T>(&self, id: BracketId, f: impl FnOnce(&Bracket) -> T) -> Result<T, BracketError> {
        let shared = self.shared(id)?;
        let bracket = shared.read().map_err(poisoned)?;
        Ok(f(&bracket))
    }

    /// Копия сетки.
    pub fn snapshot(&self, id: BracketId) -> Result<Bracket, BracketError> {
        self.read(id, Bracket::clone)
    }

    /// Изменение сетки под write-блокировкой: один писатель на сетку.
    pub fn update<T>(
        &self,
        id: BracketId,
        f: impl FnOnce(&mut Bracket) -> Result<T, BracketError>,
    ) -> Result<T, BracketError> {
        let shared = self.shared(id)?;
        let mut bracket = shared.write().map_err(poisoned)?;
        f(&mut bracket)
    }

    pub fn start_match(&self, id: BracketId, match_id: MatchId) -> Result<(), BracketError> {
        self.update(id, |b| engine::start_match(b, match_id))
    }

    pub fn submit_result(
        &self,
        id: BracketId,
        submission: ResultSubmission,
    ) -> Result<(), BracketError> {
        self.update(id, |b| engine::submit_result(b, submission))
    }

    pub fn generate_next_round(&self, id: BracketId) -> Result<Round, BracketError> {
        self.update(id, engine::generate_next_round)
    }

    /// Выполнить команду API.
    pub fn handle_command(&self, command: Command) -> Result<CommandResponse, ApiError> {
        match command {
            Command::GenerateBracket(cmd) => {
                let id = self.create_bracket(&cmd.request)?;
                Ok(CommandResponse::BracketCreated(
                    self.read(id, map_bracket_to_dto)?,
                ))
            }
            Command::StartMatch(cmd) => {
                self.start_match(cmd.bracket_id, cmd.match_id)?;
                Ok(CommandResponse::Ok)
            }
            Command::SubmitResult(cmd) => {
                self.submit_result(cmd.bracket_id, cmd.submission)?;
                Ok(CommandResponse::BracketState(
                    self.read(cmd.bracket_id, map_bracket_to_dto)?,
                ))
            }
            Command::GenerateNextRound(cmd) => {
                let round = self.generate_next_round(cmd.bracket_id)?;
                let dto = self.read(cmd.bracket_id, |b| map_round_to_dto(&round, b))?;
                Ok(CommandResponse::RoundGenerated {
                    bracket_id: cmd.bracket_id,
                    round: dto,
                })
            }
            Command::DeleteBracket(cmd) => {
                self.delete_bracket(cmd.bracket_id)?;
                Ok(CommandResponse::BracketDeleted(cmd.bracket_id))
            }
        }
    }

    /// Выполнить запрос API.
    pub fn handle_query(&self, query: Query) -> Result<QueryResponse, ApiError> {
        match query {
            Query::GetBracket { bracket_id } => Ok(QueryResponse::Bracket(
                self.read(bracket_id, map_bracket_to_dto)?,
            )),
            Query::GetTournamentBracket { tournament_id } => {
                let id = self.bracket_for_tournament(tournament_id)?;
                Ok(QueryResponse::Bracket(self.read(id, map_bracket_to_dto)?))
            }
            Query::GetMatch {
                bracket_id,
                match_id,
            } => {
                let dto = self.read(bracket_id, |b| {
                    b.find_match(match_id).map(|m| map_match_to_dto(m, b))
                })?;
                dto.map(QueryResponse::Match)
                    .ok_or(ApiError::MatchNotFound(match_id))
            }
            Query::GetStats { bracket_id } => Ok(QueryResponse::Stats(
                self.read(bracket_id, build_stats_view)?,
            )),
            Query::GetStandings { bracket_id } => Ok(QueryResponse::Standings(
                self.read(bracket_id, build_standings_view)?,
            )),
            Query::ListBrackets => {
                let mut out = Vec::new();
                for id in self.bracket_ids()? {
                    out.push(self.read(id, map_bracket_to_summary)?);
                }
                Ok(QueryResponse::Brackets(out))
            }
            Query::Preview {
                participant_count,
                config,
            } => Ok(QueryResponse::Preview(topology::preview(
                participant_count,
                &config,
            )?)),
        }
    }
}
