// tests/seeding_tests.rs
//
// Посев и пары первого раунда:
//  1) порядок посевов по позициям сетки
//  2) размер сетки и количество раундов
//  3) bye всегда у младшего посева, bye никогда не встречаются друг с другом
//  4) посевы 1 и 2 в разных половинах
//  5) assign_seeds: сначала явные посевы, потом порядок ввода
//  6) shuffle_unseeded не трогает сеяных

use std::collections::HashSet;

use bracket_engine::domain::Participant;
use bracket_engine::engine::BracketError;
use bracket_engine::infra::rng::DeterministicRng;
use bracket_engine::topology::{
    assign_seeds, bracket_size, pair_seeds, round_count, seed_order, shuffle_unseeded,
};

// -----------------------------
// ВСПОМОГАТЕЛЬНЫЕ КОНСТРУКТОРЫ
// -----------------------------

fn unseeded(count: u64) -> Vec<Participant> {
    (1..=count)
        .map(|id| Participant::new(id, format!("Team {}", id)))
        .collect()
}

// TEST 1 — порядок посевов для 8 позиций
#[test]
fn seed_order_for_eight_slots() {
    assert_eq!(seed_order(1), vec![1]);
    assert_eq!(seed_order(2), vec![1, 2]);
    assert_eq!(seed_order(4), vec![1, 4, 2, 3]);
    assert_eq!(seed_order(8), vec![1, 8, 4, 5, 2, 7, 3, 6]);
}

// TEST 2 — размер сетки = ближайшая степень двойки, раунды = ceil(log2(n))
#[test]
fn bracket_size_and_round_count() {
    assert_eq!(bracket_size(2), 2);
    assert_eq!(bracket_size(5), 8);
    assert_eq!(bracket_size(16), 16);
    assert_eq!(bracket_size(17), 32);

    assert_eq!(round_count(2), 1);
    assert_eq!(round_count(5), 3);
    assert_eq!(round_count(8), 3);
    assert_eq!(round_count(9), 4);
}

// TEST 3 — 5 участников: три bye, все у сильнейших посевов
#[test]
fn five_participants_get_three_byes() {
    let pairs = pair_seeds(5).expect("pairs");
    assert_eq!(pairs.len(), 4);

    let byes: Vec<u32> = pairs
        .iter()
        .filter(|p| p.low.is_none())
        .map(|p| p.high)
        .collect();
    assert_eq!(byes.len(), 3);

    let mut sorted = byes.clone();
    sorted.sort_unstable();
    assert_eq!(sorted, vec![1, 2, 3], "bye получают три лучших посева");

    // Единственный настоящий матч – 4 против 5.
    let contested: Vec<(u32, Option<u32>)> = pairs
        .iter()
        .filter(|p| p.low.is_some())
        .map(|p| (p.high, p.low))
        .collect();
    assert_eq!(contested, vec![(4, Some(5))]);
}

// TEST 4 — для любого n два bye никогда не попадают в одну пару
#[test]
fn byes_never_meet_each_other() {
    for n in 2..=64usize {
        let pairs = pair_seeds(n).expect("pairs");
        let size = bracket_size(n);

        assert_eq!(pairs.len(), size / 2, "n = {}", n);
        assert_eq!(
            pairs.iter().filter(|p| p.low.is_none()).count(),
            size - n,
            "n = {}",
            n
        );
        for p in &pairs {
            assert!(p.high as usize <= n, "high seed must be a real participant (n = {})", n);
            if let Some(low) = p.low {
                assert!(p.high < low);
            }
        }
    }
}

// TEST 5 — посевы 1 и 2 встречаются только в финале
#[test]
fn top_two_seeds_are_in_opposite_halves() {
    for size in [2usize, 4, 8, 16, 32] {
        let order = seed_order(size);
        let half = size / 2;

        let pos1 = order.iter().position(|s| *s == 1).expect("seed 1");
        let pos2 = order.iter().position(|s| *s == 2).expect("seed 2");
        assert!(pos1 < half);
        assert!(pos2 >= half);

        let unique: HashSet<u32> = order.iter().copied().collect();
        assert_eq!(unique.len(), size, "каждый посев ровно один раз");
    }
}

// TEST 6 — меньше двух участников
#[test]
fn pair_seeds_rejects_single_participant() {
    let err = pair_seeds(1).unwrap_err();
    assert_eq!(
        err,
        BracketError::InsufficientParticipants {
            required: 2,
            found: 1
        }
    );
}

// TEST 7 — явные посевы впереди, несеяные в порядке ввода
#[test]
fn assign_seeds_keeps_explicit_seeds_first() {
    let participants = vec![
        Participant::seeded(10, "A", 2),
        Participant::new(20, "B"),
        Participant::seeded(30, "C", 1),
        Participant::new(40, "D"),
    ];

    let seeded = assign_seeds(&participants);
    let order: Vec<(u64, Option<u32>)> = seeded.iter().map(|p| (p.id, p.seed)).collect();

    assert_eq!(
        order,
        vec![(30, Some(1)), (10, Some(2)), (20, Some(3)), (40, Some(4))]
    );
}

// TEST 8 — перемешивание несеяных детерминировано и не трогает сеяных
#[test]
fn shuffle_unseeded_is_deterministic_and_keeps_seeded() {
    let mut base = unseeded(10);
    base[0].seed = Some(1);
    base[5].seed = Some(2);

    let mut a = base.clone();
    let mut b = base.clone();
    shuffle_unseeded(&mut a, &mut DeterministicRng::from_seed(42));
    shuffle_unseeded(&mut b, &mut DeterministicRng::from_seed(42));

    assert_eq!(a, b, "один seed – один порядок");
    assert_eq!(a[0], base[0]);
    assert_eq!(a[5], base[5]);

    let before: HashSet<u64> = base.iter().map(|p| p.id).collect();
    let after: HashSet<u64> = a.iter().map(|p| p.id).collect();
    assert_eq!(before, after);
}
