// tests/round_robin_tests.rs
//
// Round robin:
//  1) круговой метод: каждая пара ровно один раз
//  2) нечётная группа: m раундов, у каждого ровно один bye
//  3) группы по количеству раскладываются "змейкой"
//  4) участник в двух группах → DuplicateAssignment
//  5) полный прогон: таблица внутри группы и порядок для следующей стадии

use std::collections::{HashMap, HashSet};

use bracket_engine::domain::{
    Bracket, BracketBody, BracketConfig, GenerateRequest, GroupConfig, GroupLayout,
    MatchStatus, Participant, ParticipantId, RoundRobinConfig, Score,
};
use bracket_engine::engine::{self, BracketError, ResultSubmission};
use bracket_engine::topology::generate;
use bracket_engine::topology::round_robin::circle_schedule;

// -----------------------------
// ВСПОМОГАТЕЛЬНЫЕ КОНСТРУКТОРЫ
// -----------------------------

fn roster(count: u64) -> Vec<Participant> {
    (1..=count)
        .map(|id| Participant::seeded(id, format!("Team {}", id), id as u32))
        .collect()
}

fn round_robin(count: u64, groups: GroupLayout) -> Result<Bracket, BracketError> {
    let request = GenerateRequest::new(
        3,
        "League",
        roster(count),
        BracketConfig::RoundRobin(RoundRobinConfig { groups }),
    );
    generate(&request, 1)
}

fn play_out(bracket: &mut Bracket) {
    loop {
        let next = bracket
            .matches()
            .find(|m| m.status == MatchStatus::Scheduled)
            .cloned();
        let Some(game) = next else {
            break;
        };

        let mut players = game.participants();
        players.sort_unstable();
        let (winner, loser) = (players[0], players[1]);
        engine::submit_result(
            bracket,
            ResultSubmission::played(
                game.id,
                winner,
                vec![Score::new(winner, 3), Score::new(loser, 1)],
            ),
        )
        .expect("result accepted");
    }
}

fn pair_key(a: ParticipantId, b: ParticipantId) -> (ParticipantId, ParticipantId) {
    (a.min(b), a.max(b))
}

// TEST 1 — чётная группа: m-1 раундов, каждая пара один раз
#[test]
fn circle_method_even_group() {
    let members: Vec<ParticipantId> = (1..=6).collect();
    let schedule = circle_schedule(&members);

    assert_eq!(schedule.len(), 5);

    let mut seen = HashSet::new();
    for round in &schedule {
        assert_eq!(round.pairs.len(), 3);
        assert!(round.bye.is_none());

        let mut in_round = HashSet::new();
        for (a, b) in &round.pairs {
            assert!(in_round.insert(*a) && in_round.insert(*b), "дважды в одном раунде");
            assert!(seen.insert(pair_key(*a, *b)), "пара {}-{} повторилась", a, b);
        }
    }
    assert_eq!(seen.len(), 15, "6 * 5 / 2");
}

// TEST 2 — нечётная группа: m раундов, bye у каждого ровно один раз
#[test]
fn circle_method_odd_group() {
    let members: Vec<ParticipantId> = (1..=5).collect();
    let schedule = circle_schedule(&members);

    assert_eq!(schedule.len(), 5);

    let mut byes: HashMap<ParticipantId, u32> = HashMap::new();
    let mut pairs = HashSet::new();
    for round in &schedule {
        assert_eq!(round.pairs.len(), 2);
        let bye = round.bye.expect("bye every round");
        *byes.entry(bye).or_default() += 1;
        for (a, b) in &round.pairs {
            pairs.insert(pair_key(*a, *b));
        }
    }

    assert_eq!(pairs.len(), 10);
    assert_eq!(byes.len(), 5);
    assert!(byes.values().all(|n| *n == 1));
}

// TEST 3 — две группы по количеству: змейка 1,4,5,8 / 2,3,6,7
#[test]
fn group_count_uses_snake_distribution() {
    let bracket = round_robin(8, GroupLayout::Count(2)).expect("bracket");

    let BracketBody::RoundRobin { groups } = &bracket.body else {
        panic!("unexpected body");
    };

    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].name, "Group A");
    assert_eq!(groups[0].participants, vec![1, 4, 5, 8]);
    assert_eq!(groups[1].name, "Group B");
    assert_eq!(groups[1].participants, vec![2, 3, 6, 7]);

    // 4 участника: 3 раунда по 2 матча в каждой группе.
    for g in groups {
        assert_eq!(g.rounds.len(), 3);
        assert!(g.rounds.iter().all(|r| r.matches.len() == 2));
    }
    assert_eq!(bracket.matches().count(), 12);
}

// TEST 4 — один участник в двух явных группах
#[test]
fn duplicate_group_assignment_is_rejected() {
    let groups = GroupLayout::Explicit(vec![
        GroupConfig {
            name: "North".to_string(),
            participants: vec![1, 2],
        },
        GroupConfig {
            name: "South".to_string(),
            participants: vec![1, 3, 4],
        },
    ]);

    let err = round_robin(4, groups).unwrap_err();
    assert_eq!(
        err,
        BracketError::DuplicateAssignment {
            participant_id: 1,
            first_group: 0,
            second_group: 1,
        }
    );
}

// TEST 5 — одна группа из 5: bye в раунде, таблица по победам
#[test]
fn single_group_full_run() {
    let mut bracket = round_robin(5, GroupLayout::Count(1)).expect("bracket");
    assert_eq!(bracket.matches().count(), 10);

    let BracketBody::RoundRobin { groups } = &bracket.body else {
        panic!("unexpected body");
    };
    assert!(groups[0].rounds.iter().all(|r| r.byes.len() == 1));

    play_out(&mut bracket);
    assert!(bracket.is_completed());

    let table = engine::standings(&bracket);
    let order: Vec<ParticipantId> = table.iter().map(|s| s.participant).collect();
    assert_eq!(order, vec![1, 2, 3, 4, 5]);

    let wins: Vec<u32> = table.iter().map(|s| s.wins).collect();
    assert_eq!(wins, vec![4, 3, 2, 1, 0], "bye в круговой не даёт очков");
    assert!(table.iter().all(|s| s.group == Some(0)));
    assert_eq!(table[0].score_diff(), 8);
}

// TEST 6 — две группы: порядок таблицы "первые места, потом вторые"
#[test]
fn group_standings_interleave_groups() {
    let mut bracket = round_robin(8, GroupLayout::Count(2)).expect("bracket");
    play_out(&mut bracket);
    assert!(bracket.is_completed());

    let table = engine::standings(&bracket);
    let order: Vec<(u32, Option<u32>, ParticipantId)> = table
        .iter()
        .map(|s| (s.rank, s.group, s.participant))
        .collect();

    assert_eq!(
        order,
        vec![
            (1, Some(0), 1),
            (1, Some(1), 2),
            (2, Some(0), 4),
            (2, Some(1), 3),
            (3, Some(0), 5),
            (3, Some(1), 6),
            (4, Some(0), 8),
            (4, Some(1), 7),
        ]
    );
}
