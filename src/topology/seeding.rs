// src/topology/seeding.rs

use serde::{Deserialize, Serialize};

use crate::domain::Participant;
use crate::engine::errors::BracketError;
use crate::engine::RandomSource;
use crate::validation::rules::MIN_PARTICIPANTS;

/// Пара посевов первого раунда.
///
/// `low == None` – bye. Bye всегда занимает младший слот, никогда `high`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeedPair {
    pub high: u32,
    pub low: Option<u32>,
}

/// Размер сетки: ближайшая сверху степень двойки.
pub fn bracket_size(participant_count: usize) -> usize {
    participant_count.max(1).next_power_of_two()
}

/// Количество раундов на выбывание: ceil(log2(n)).
pub fn round_count(participant_count: usize) -> u32 {
    bracket_size(participant_count).trailing_zeros()
}

/// Порядок посевов по позициям сетки размера `size` (степень двойки).
///
/// Рекурсивное деление пополам: [1, 2] → [1, 4, 2, 3] → [1, 8, 4, 5, 2, 7, 3, 6] …
/// Соседние пары – матчи первого раунда; 1 и 2 оказываются в разных половинах.
pub fn seed_order(size: usize) -> Vec<u32> {
    let mut order: Vec<u32> = vec![1];
    let mut current = 1usize;

    while current < size {
        current *= 2;
        let sum = current as u32 + 1;
        order = order.iter().flat_map(|&s| [s, sum - s]).collect();
    }

    order
}

/// Пары первого раунда для `participant_count` участников.
pub fn pair_seeds(participant_count: usize) -> Result<Vec<SeedPair>, BracketError> {
    if participant_count < MIN_PARTICIPANTS {
        return Err(BracketError::InsufficientParticipants {
            required: MIN_PARTICIPANTS,
            found: participant_count,
        });
    }

    let size = bracket_size(participant_count);
    let n = participant_count as u32;

    let pairs = seed_order(size)
        .chunks(2)
        .map(|pair| {
            // В каждой паре первый посев всегда меньше второго.
            let (high, low) = (pair[0].min(pair[1]), pair[0].max(pair[1]));
            SeedPair {
                high,
                low: if low <= n { Some(low) } else { None },
            }
        })
        .collect();

    Ok(pairs)
}

/// Проставить посев всем участникам.
///
/// Сначала участники с явным посевом (по возрастанию), затем без посева
/// в исходном порядке. Итоговые посевы – 1..=n без пропусков.
pub fn assign_seeds(participants: &[Participant]) -> Vec<Participant> {
    let mut ordered: Vec<(usize, &Participant)> = participants.iter().enumerate().collect();
    // Сортировка стабильная: у несеяных порядок ввода сохраняется.
    ordered.sort_by_key(|(idx, p)| (p.seed_or_max(), *idx));

    ordered
        .into_iter()
        .enumerate()
        .map(|(i, (_, p))| Participant {
            id: p.id,
            name: p.name.clone(),
            seed: Some(i as u32 + 1),
        })
        .collect()
}

/// Перемешать участников без явного посева, не трогая сеяных.
pub fn shuffle_unseeded<R: RandomSource>(participants: &mut [Participant], rng: &mut R) {
    let positions: Vec<usize> = participants
        .iter()
        .enumerate()
        .filter(|(_, p)| p.seed.is_none())
        .map(|(i, _)| i)
        .collect();

    let mut unseeded: Vec<Participant> = positions.iter().map(|&i| participants[i].clone()).collect();
    rng.shuffle(&mut unseeded);

    for (pos, p) in positions.into_iter().zip(unseeded) {
        participants[pos] = p;
    }
}
