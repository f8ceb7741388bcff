//! Генераторы топологий сеток.
//!
//! Каждый генератор – чистая функция (участники + конфиг) → структура.
//! Точка входа `generate` сначала валидирует запрос, потом выбирает генератор
//! по варианту `BracketConfig`.

pub mod battle_royale;
pub mod custom;
pub mod double_elimination;
pub mod multi_stage;
pub mod preview;
pub mod round_robin;
pub mod seeding;
pub mod single_elimination;
pub mod swiss;

use tracing::info;

use crate::domain::{
    BestOfPolicy, Bracket, BracketBody, BracketConfig, BracketId, BracketStatus,
    GenerateRequest, MatchIdAllocator, Participant,
};
use crate::engine::errors::BracketError;
use crate::engine::progression;
use crate::engine::RandomSource;
use crate::validation;

pub use preview::{preview, BracketPreview, RoundPreview, SectionPreview, StagePreview};
pub use seeding::{
    assign_seeds, bracket_size, pair_seeds, round_count, seed_order, shuffle_unseeded, SeedPair,
};

/// Контекст генерации: выдача id и длина матчей для текущей стадии.
pub struct GenContext<'a> {
    pub ids: &'a mut MatchIdAllocator,
    pub best_of: &'a BestOfPolicy,
    pub stage: u32,
}

impl<'a> GenContext<'a> {
    pub fn new(ids: &'a mut MatchIdAllocator, best_of: &'a BestOfPolicy, stage: u32) -> Self {
        Self {
            ids,
            best_of,
            stage,
        }
    }

    pub fn next_id(&mut self) -> u64 {
        self.ids.next_id()
    }

    pub fn best_of(&self, round: u32) -> Option<u32> {
        Some(self.best_of.best_of_for(self.stage, round))
    }
}

/// Сгенерировать сетку по запросу.
///
/// Ошибки конфигурации находятся до генерации, частичных структур не бывает.
pub fn generate(request: &GenerateRequest, bracket_id: BracketId) -> Result<Bracket, BracketError> {
    validation::validate(request).into_result()?;

    let participants = assign_seeds(&request.participants);
    let mut ids = MatchIdAllocator::default();

    let body = generate_body(
        &request.config,
        &participants,
        &request.settings.best_of,
        0,
        &mut ids,
    )?;

    let mut bracket = Bracket {
        id: bracket_id,
        tournament_id: request.tournament_id,
        name: request.name.clone(),
        config: request.config.clone(),
        participants,
        best_of: request.settings.best_of.clone(),
        body,
        status: BracketStatus::InProgress,
        next_match_id: ids.peek(),
    };

    // Bye-матчи закрываются сразу при генерации.
    progression::settle(&mut bracket)?;

    info!(
        bracket_id,
        tournament_id = request.tournament_id,
        kind = bracket.kind().as_str(),
        participants = bracket.participants.len(),
        matches = bracket.matches().count(),
        "bracket generated"
    );

    Ok(bracket)
}

/// То же, что `generate`, но с перемешиванием несеяных участников,
/// если это включено в настройках запроса.
pub fn generate_with_rng<R: RandomSource>(
    request: &GenerateRequest,
    bracket_id: BracketId,
    rng: &mut R,
) -> Result<Bracket, BracketError> {
    if !request.settings.shuffle_unseeded {
        return generate(request, bracket_id);
    }

    let mut shuffled = request.clone();
    shuffle_unseeded(&mut shuffled.participants, rng);
    generate(&shuffled, bracket_id)
}

/// Сгенерировать структуру для конкретного конфига (без валидации).
pub fn generate_body(
    config: &BracketConfig,
    participants: &[Participant],
    best_of: &BestOfPolicy,
    stage: u32,
    ids: &mut MatchIdAllocator,
) -> Result<BracketBody, BracketError> {
    let mut ctx = GenContext::new(ids, best_of, stage);

    match config {
        BracketConfig::SingleElimination(_) => single_elimination::generate(participants, &mut ctx),
        BracketConfig::DoubleElimination(cfg) => {
            double_elimination::generate(participants, cfg, &mut ctx)
        }
        BracketConfig::RoundRobin(cfg) => round_robin::generate(participants, cfg, &mut ctx),
        BracketConfig::Swiss(cfg) => swiss::generate(participants, cfg, &mut ctx),
        BracketConfig::BattleRoyale(cfg) => battle_royale::generate(participants, cfg, &mut ctx),
        BracketConfig::Custom(cfg) => custom::generate(participants, cfg, &mut ctx),
        BracketConfig::MultiStage(cfg) => multi_stage::generate(participants, cfg, &mut ctx),
    }
}

/// Имя раунда на выбывание: последний – "Finals", предпоследний – "Semi-Finals".
pub fn elimination_round_name(round: u32, total_rounds: u32) -> String {
    if round == total_rounds {
        "Finals".to_string()
    } else if round + 1 == total_rounds {
        "Semi-Finals".to_string()
    } else {
        format!("Round {}", round)
    }
}

/// Буквенное имя группы: 0 → "Group A", 1 → "Group B", …
pub fn group_name(index: u32) -> String {
    let letter = (b'A' + (index % 26) as u8) as char;
    if index < 26 {
        format!("Group {}", letter)
    } else {
        format!("Group {}{}", letter, index / 26)
    }
}

/// Раскладка "змейкой" по `buckets` корзинам: 0,1,2,2,1,0,0,1,2…
pub fn snake_distribute<T: Clone>(items: &[T], buckets: usize) -> Vec<Vec<T>> {
    let buckets = buckets.max(1);
    let mut out: Vec<Vec<T>> = vec![Vec::new(); buckets];

    for (i, item) in items.iter().enumerate() {
        let lap = i / buckets;
        let pos = i % buckets;
        let idx = if lap % 2 == 0 { pos } else { buckets - 1 - pos };
        out[idx].push(item.clone());
    }

    out
}
