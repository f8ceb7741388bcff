// tests/single_elimination_tests.rs
//
// Single elimination:
//  1) 5 участников: 3 раунда, 3 bye-матча закрыты сразу
//  2) имена раундов
//  3) полный прогон 5 участников: чемпион, таблица, статистика
//  4) степень двойки: без bye, n-1 матчей
//  5) каждый матч (кроме финала) ведёт ровно в один слот следующего раунда
//  6) двойная неявка отдаёт bye дальше

use std::collections::HashSet;

use bracket_engine::domain::{
    Bracket, BracketConfig, BracketStatus, EliminationConfig, GenerateRequest, Match,
    MatchStatus, Outcome, Participant, ParticipantId, Score, SectionKind, Slot,
};
use bracket_engine::engine::{self, ResultSubmission};
use bracket_engine::stats::count_stats;
use bracket_engine::topology::generate;

// -----------------------------
// ВСПОМОГАТЕЛЬНЫЕ КОНСТРУКТОРЫ
// -----------------------------

fn roster(count: u64) -> Vec<Participant> {
    (1..=count)
        .map(|id| Participant::seeded(id, format!("Team {}", id), id as u32))
        .collect()
}

fn single_elim(count: u64) -> Bracket {
    let request = GenerateRequest::new(
        1,
        "Cup",
        roster(count),
        BracketConfig::SingleElimination(EliminationConfig::default()),
    );
    generate(&request, 1).expect("bracket")
}

fn match_at(bracket: &Bracket, round: u32, position: u32) -> Match {
    bracket
        .matches()
        .find(|m| m.section == SectionKind::Winners && m.round == round && m.position == position)
        .cloned()
        .expect("match exists")
}

/// Победитель 2:1.
fn play(bracket: &mut Bracket, game: &Match, winner: ParticipantId) {
    let loser = game
        .participants()
        .into_iter()
        .find(|p| *p != winner)
        .expect("opponent");
    engine::submit_result(
        bracket,
        ResultSubmission::played(
            game.id,
            winner,
            vec![Score::new(winner, 2), Score::new(loser, 1)],
        ),
    )
    .expect("result accepted");
}

// TEST 1 — 5 участников: 8 позиций, 3 раунда, bye закрыты при генерации
#[test]
fn five_participants_structure() {
    let bracket = single_elim(5);

    assert_eq!(bracket.matches().count(), 7);
    assert_eq!(bracket.status, BracketStatus::InProgress);

    let byes: Vec<&Match> = bracket.matches().filter(|m| m.is_bye()).collect();
    assert_eq!(byes.len(), 3);
    for m in &byes {
        assert_eq!(m.round, 1);
        assert_eq!(m.status, MatchStatus::Completed);
        assert_eq!(m.slots[1], Slot::Bye, "bye всегда во втором слоте");
    }

    // 4 против 5 – единственный настоящий матч первого раунда.
    let r1m1 = match_at(&bracket, 1, 1);
    assert_eq!(r1m1.slots, vec![Slot::Participant(4), Slot::Participant(5)]);
    assert_eq!(r1m1.status, MatchStatus::Scheduled);

    // Посев 1 уже ждёт победителя 4/5, полуфинал 2 – 3 готов.
    let semi0 = match_at(&bracket, 2, 0);
    assert_eq!(semi0.slots, vec![Slot::Participant(1), Slot::Tbd]);
    assert_eq!(semi0.status, MatchStatus::Pending);

    let semi1 = match_at(&bracket, 2, 1);
    assert_eq!(semi1.slots, vec![Slot::Participant(2), Slot::Participant(3)]);
    assert_eq!(semi1.status, MatchStatus::Scheduled);

    let final_match = match_at(&bracket, 3, 0);
    assert_eq!(final_match.slots, vec![Slot::Tbd, Slot::Tbd]);
}

// TEST 2 — имена раундов
#[test]
fn round_names() {
    let bracket = single_elim(8);
    let names: Vec<(u32, String)> = match &bracket.body {
        bracket_engine::domain::BracketBody::SingleElimination { winners } => winners
            .rounds
            .iter()
            .map(|r| (r.number, r.name.clone()))
            .collect(),
        other => panic!("unexpected body: {:?}", other),
    };

    assert_eq!(
        names,
        vec![
            (1, "Round 1".to_string()),
            (2, "Semi-Finals".to_string()),
            (3, "Finals".to_string()),
        ]
    );
}

// TEST 3 — полный прогон 5 участников
#[test]
fn five_participants_full_run() {
    let mut bracket = single_elim(5);

    let r1 = match_at(&bracket, 1, 1);
    play(&mut bracket, &r1, 4);

    let semi0 = match_at(&bracket, 2, 0);
    assert_eq!(semi0.slots, vec![Slot::Participant(1), Slot::Participant(4)]);
    assert_eq!(semi0.status, MatchStatus::Scheduled);

    play(&mut bracket, &semi0, 1);
    let semi1 = match_at(&bracket, 2, 1);
    play(&mut bracket, &semi1, 2);

    let final_match = match_at(&bracket, 3, 0);
    assert_eq!(final_match.slots, vec![Slot::Participant(1), Slot::Participant(2)]);
    play(&mut bracket, &final_match, 1);

    assert!(bracket.is_completed());

    let stats = count_stats(&bracket);
    assert_eq!(stats.total_matches, 7);
    assert_eq!(stats.completed_matches, 7);
    assert_eq!(stats.bye_matches, 3);
    assert_eq!(stats.contested_total(), 4, "n - 1 настоящих матчей");
    assert!(stats.current_round.is_none());

    let table = engine::standings(&bracket);
    assert_eq!(table.len(), 5);
    assert_eq!(table[0].participant, 1);
    assert_eq!(table[0].wins, 3, "bye считается победой");
    assert_eq!(table[1].participant, 2);
    assert_eq!(table[4].participant, 5);
    assert!(table.iter().skip(1).all(|s| s.eliminated));
}

// TEST 4 — степень двойки
#[test]
fn power_of_two_has_no_byes() {
    let bracket = single_elim(16);
    let stats = count_stats(&bracket);

    assert_eq!(stats.total_matches, 15);
    assert_eq!(stats.bye_matches, 0);
    assert_eq!(stats.completed_matches, 0);
    assert_eq!(
        stats.current_round.map(|r| r.name),
        Some("Round 1".to_string())
    );
}

// TEST 5 — ссылки: каждый слот следующего раунда получает ровно одного фидера
#[test]
fn winner_links_are_unique() {
    let bracket = single_elim(13);
    let final_id = match_at(&bracket, 4, 0).id;

    let mut targets = HashSet::new();
    for m in bracket.matches() {
        match m.winner_to {
            Some(target) => {
                assert!(targets.insert(target), "слот {:?} получает двух фидеров", target);
                let next = bracket.find_match(target.match_id).expect("target");
                assert_eq!(next.round, m.round + 1);
            }
            None => assert_eq!(m.id, final_id, "только финал без ссылки"),
        }
        assert!(m.loser_to.is_none());
    }
}

// TEST 6 — двойная неявка: дальше уходит bye, соперник проходит без игры
#[test]
fn double_forfeit_sends_bye_forward() {
    let mut bracket = single_elim(4);

    let m0 = match_at(&bracket, 1, 0);
    engine::submit_result(&mut bracket, ResultSubmission::double_forfeit(m0.id))
        .expect("double forfeit");

    let final_match = match_at(&bracket, 2, 0);
    assert_eq!(final_match.slots[0], Slot::Bye);

    let m1 = match_at(&bracket, 1, 1);
    play(&mut bracket, &m1, 2);

    let final_match = match_at(&bracket, 2, 0);
    assert!(final_match.is_bye());
    assert_eq!(final_match.winner(), Some(2));
    assert_eq!(
        final_match.result.as_ref().map(|r| r.outcome),
        Some(Outcome::Bye)
    );
    assert!(bracket.is_completed());
}
