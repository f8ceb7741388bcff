// src/topology/swiss.rs

use std::collections::HashSet;

use crate::domain::{
    BracketBody, Match, Participant, ParticipantId, Round, SectionKind, Slot, SwissConfig,
};
use crate::engine::errors::BracketError;
use crate::topology::GenContext;

/// Лимит шагов перебора при поиске пар без повторных встреч.
const PAIRING_STEP_BUDGET: usize = 100_000;

/// Пары раунда швейцарской системы.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SwissPairing {
    pub pairs: Vec<(ParticipantId, ParticipantId)>,
    pub bye: Option<ParticipantId>,
    /// Пар без повторов не нашлось, пришлось допустить повторную встречу.
    pub rematch_fallback: bool,
}

/// Нормализованный ключ пары (порядок не важен).
pub fn pair_key(a: ParticipantId, b: ParticipantId) -> (ParticipantId, ParticipantId) {
    (a.min(b), a.max(b))
}

/// Первый раунд: посев i против посева i + n/2.
///
/// При нечётном количестве bye получает последний по посеву.
pub fn fold_pairs(ordered: &[ParticipantId]) -> SwissPairing {
    let mut pool = ordered.to_vec();
    let bye = if pool.len() % 2 == 1 { pool.pop() } else { None };

    let half = pool.len() / 2;
    let pairs = (0..half).map(|i| (pool[i], pool[i + half])).collect();

    SwissPairing {
        pairs,
        bye,
        rematch_fallback: false,
    }
}

/// Пары по текущей таблице.
///
/// `ranked` – участники в порядке таблицы (лучший первым).
/// Bye получает самый нижний участник, у которого ещё не было bye.
/// Остальные спариваются сверху вниз перебором с возвратом без повторных встреч;
/// если так нельзя – соседние по таблице.
pub fn pair_by_standing(
    ranked: &[ParticipantId],
    played: &HashSet<(ParticipantId, ParticipantId)>,
    had_bye: &HashSet<ParticipantId>,
) -> SwissPairing {
    let mut pool = ranked.to_vec();

    let bye = if pool.len() % 2 == 1 {
        let idx = pool
            .iter()
            .rposition(|p| !had_bye.contains(p))
            .unwrap_or(pool.len() - 1);
        Some(pool.remove(idx))
    } else {
        None
    };

    let mut pairs = Vec::with_capacity(pool.len() / 2);
    let mut budget = PAIRING_STEP_BUDGET;
    let mut work = pool.clone();

    if backtrack(&mut work, played, &mut pairs, &mut budget) {
        return SwissPairing {
            pairs,
            bye,
            rematch_fallback: false,
        };
    }

    let pairs = pool.chunks(2).map(|c| (c[0], c[1])).collect();
    SwissPairing {
        pairs,
        bye,
        rematch_fallback: true,
    }
}

fn backtrack(
    pool: &mut Vec<ParticipantId>,
    played: &HashSet<(ParticipantId, ParticipantId)>,
    out: &mut Vec<(ParticipantId, ParticipantId)>,
    budget: &mut usize,
) -> bool {
    if pool.is_empty() {
        return true;
    }
    if *budget == 0 {
        return false;
    }
    *budget -= 1;

    let a = pool.remove(0);
    for i in 0..pool.len() {
        let b = pool[i];
        if played.contains(&pair_key(a, b)) {
            continue;
        }

        pool.remove(i);
        out.push((a, b));
        if backtrack(pool, played, out, budget) {
            return true;
        }
        out.pop();
        pool.insert(i, b);
    }
    pool.insert(0, a);

    false
}

/// Собрать раунд из готовых пар.
pub fn build_round(number: u32, pairing: SwissPairing, ctx: &mut GenContext<'_>) -> Round {
    let mut round = Round::new(number, format!("Round {}", number));

    for (pos, (a, b)) in pairing.pairs.into_iter().enumerate() {
        let id = ctx.next_id();
        round.matches.push(Match::head_to_head(
            id,
            SectionKind::Swiss,
            number,
            pos as u32,
            Slot::Participant(a),
            Slot::Participant(b),
            ctx.best_of(number),
        ));
    }
    round.byes.extend(pairing.bye);

    round
}

/// Генерируется только первый раунд, остальные – `engine::generate_next_round`.
pub fn generate(
    participants: &[Participant],
    _cfg: &SwissConfig,
    ctx: &mut GenContext<'_>,
) -> Result<BracketBody, BracketError> {
    let mut ordered: Vec<&Participant> = participants.iter().collect();
    ordered.sort_by_key(|p| p.seed_or_max());
    let ids: Vec<ParticipantId> = ordered.iter().map(|p| p.id).collect();

    let round = build_round(1, fold_pairs(&ids), ctx);

    Ok(BracketBody::Swiss {
        rounds: vec![round],
    })
}
