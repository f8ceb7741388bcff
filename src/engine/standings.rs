// src/engine/standings.rs

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::domain::{
    BattleRoyaleConfig, Bracket, BracketBody, BracketConfig, Match, MatchStatus, Outcome,
    Participant, ParticipantId, Round,
};

/// Строка турнирной таблицы.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Standing {
    /// Место (1-based). Для групп round robin – место внутри группы.
    pub rank: u32,
    pub participant: ParticipantId,
    pub seed: u32,
    pub group: Option<u32>,
    /// Победы, включая проходы через bye.
    pub wins: u32,
    pub losses: u32,
    pub byes: u32,
    /// Победы для дуэлей, очки за места для battle royale.
    pub points: u32,
    pub score_for: u32,
    pub score_against: u32,
    /// Последний раунд, в котором участник был в матче.
    pub last_round: u32,
    pub qualified: bool,
    pub eliminated: bool,
}

impl Standing {
    fn new(p: &Participant) -> Self {
        Self {
            rank: 0,
            participant: p.id,
            seed: p.seed_or_max(),
            group: None,
            wins: 0,
            losses: 0,
            byes: 0,
            points: 0,
            score_for: 0,
            score_against: 0,
            last_round: 0,
            qualified: false,
            eliminated: false,
        }
    }

    pub fn score_diff(&self) -> i64 {
        i64::from(self.score_for) - i64::from(self.score_against)
    }
}

/// Таблица сетки. Для multi-stage – таблица последней сгенерированной стадии.
pub fn standings(bracket: &Bracket) -> Vec<Standing> {
    match &bracket.body {
        BracketBody::MultiStage { stages } => stages
            .iter()
            .rev()
            .find_map(|s| {
                s.body
                    .as_ref()
                    .map(|b| standings_for(b, &s.config, &s.participants))
            })
            .unwrap_or_default(),
        body => standings_for(body, &bracket.config, &bracket.participants),
    }
}

/// Таблица одной структуры.
///
/// Порядок строк – порядок посева для следующей стадии.
pub fn standings_for(
    body: &BracketBody,
    config: &BracketConfig,
    participants: &[Participant],
) -> Vec<Standing> {
    let mut table = tally(body, participants);

    match (body, config) {
        (BracketBody::SingleElimination { winners }, _) => {
            let champion = winners
                .last_round()
                .and_then(|r| r.matches.first())
                .and_then(Match::winner);
            for s in table.values_mut() {
                s.eliminated = s.losses >= 1;
            }
            ranked(table, |a, b| {
                champion_first(champion, a, b)
                    .then_with(|| b.last_round.cmp(&a.last_round))
                    .then_with(|| by_record(a, b))
            })
        }
        (BracketBody::DoubleElimination { grand_finals, .. }, _) => {
            let champion = grand_finals
                .matches()
                .filter(|m| m.is_completed())
                .last()
                .and_then(Match::winner);
            let decided = grand_finals.matches().all(Match::is_terminal);
            for s in table.values_mut() {
                s.eliminated =
                    s.losses >= 2 || (decided && Some(s.participant) != champion);
            }
            ranked(table, |a, b| {
                champion_first(champion, a, b).then_with(|| by_record(a, b))
            })
        }
        (BracketBody::RoundRobin { groups }, _) => {
            for g in groups {
                for id in &g.participants {
                    if let Some(s) = table.get_mut(id) {
                        s.group = Some(g.index);
                    }
                }
            }

            let mut rows: Vec<Standing> = table.into_values().collect();
            rows.sort_by(|a, b| a.group.cmp(&b.group).then_with(|| by_record(a, b)));

            let mut current = None;
            let mut rank = 0;
            for row in rows.iter_mut() {
                if row.group != current {
                    current = row.group;
                    rank = 0;
                }
                rank += 1;
                row.rank = rank;
            }

            // Сначала победители групп, потом вторые места и т.д.
            rows.sort_by(|a, b| a.rank.cmp(&b.rank).then_with(|| a.group.cmp(&b.group)));
            rows
        }
        (BracketBody::Swiss { .. }, BracketConfig::Swiss(cfg)) => {
            for s in table.values_mut() {
                s.qualified = cfg.wins_to_qualify.map_or(false, |w| s.wins >= w);
                s.eliminated =
                    !s.qualified && cfg.losses_to_eliminate.map_or(false, |l| s.losses >= l);
            }
            ranked(table, by_record)
        }
        (BracketBody::BattleRoyale { rounds }, BracketConfig::BattleRoyale(cfg)) => {
            if let Some(alive) = survivors(rounds, cfg) {
                for s in table.values_mut() {
                    s.eliminated = !alive.contains(&s.participant);
                }
            }
            ranked(table, |a, b| {
                b.last_round
                    .cmp(&a.last_round)
                    .then_with(|| b.points.cmp(&a.points))
                    .then_with(|| b.wins.cmp(&a.wins))
                    .then_with(|| a.seed.cmp(&b.seed))
            })
        }
        _ => ranked(table, by_record),
    }
}

/// Участники, которые ещё играют (швейцарка, battle royale), в порядке таблицы.
///
/// Для остальных топологий – все участники.
pub fn active_participants(
    body: &BracketBody,
    config: &BracketConfig,
    participants: &[Participant],
) -> Vec<ParticipantId> {
    standings_for(body, config, participants)
        .into_iter()
        .filter(|s| !s.qualified && !s.eliminated)
        .map(|s| s.participant)
        .collect()
}

fn tally(body: &BracketBody, participants: &[Participant]) -> HashMap<ParticipantId, Standing> {
    let mut table: HashMap<ParticipantId, Standing> = participants
        .iter()
        .map(|p| (p.id, Standing::new(p)))
        .collect();

    for game in body.matches() {
        let players = game.participants();
        for id in &players {
            if let Some(s) = table.get_mut(id) {
                s.last_round = s.last_round.max(game.round);
            }
        }

        if game.status != MatchStatus::Completed {
            continue;
        }
        let Some(result) = &game.result else {
            continue;
        };

        if result.outcome == Outcome::Bye {
            if let Some(s) = result.winner.and_then(|w| table.get_mut(&w)) {
                s.wins += 1;
                s.byes += 1;
                s.points += 1;
            }
            continue;
        }

        if !result.placements.is_empty() {
            let size = result.placements.len() as u32;
            for (pos, id) in result.placements.iter().enumerate() {
                if let Some(s) = table.get_mut(id) {
                    s.points += size - pos as u32;
                    if pos == 0 {
                        s.wins += 1;
                    }
                }
            }
            continue;
        }

        for id in &players {
            let Some(s) = table.get_mut(id) else {
                continue;
            };
            if result.winner == Some(*id) {
                s.wins += 1;
                s.points += 1;
            } else {
                s.losses += 1;
            }
            for score in &result.scores {
                if score.participant == *id {
                    s.score_for += score.score;
                } else {
                    s.score_against += score.score;
                }
            }
        }
    }

    // В швейцарке bye = победа.
    if let BracketBody::Swiss { rounds } = body {
        for id in rounds.iter().flat_map(|r| r.byes.iter()) {
            if let Some(s) = table.get_mut(id) {
                s.wins += 1;
                s.byes += 1;
                s.points += 1;
            }
        }
    }

    table
}

/// Кто остаётся в игре после последнего раунда battle royale.
///
/// `None` – раундов ещё не было, в игре все.
fn survivors(rounds: &[Round], cfg: &BattleRoyaleConfig) -> Option<HashSet<ParticipantId>> {
    let last = rounds.last()?;
    let mut alive = HashSet::new();

    for game in &last.matches {
        match &game.result {
            Some(result) if game.is_completed() && !result.placements.is_empty() => {
                let keep = cfg
                    .advance_per_lobby
                    .map_or(result.placements.len(), |k| k as usize);
                alive.extend(result.placements.iter().take(keep).copied());
            }
            _ => alive.extend(game.participants()),
        }
    }

    Some(alive)
}

fn ranked<F>(table: HashMap<ParticipantId, Standing>, cmp: F) -> Vec<Standing>
where
    F: Fn(&Standing, &Standing) -> Ordering,
{
    let mut rows: Vec<Standing> = table.into_values().collect();
    rows.sort_by(|a, b| cmp(a, b));
    for (i, row) in rows.iter_mut().enumerate() {
        row.rank = i as u32 + 1;
    }
    rows
}

/// Больше побед, меньше поражений, лучше разница, больше забито, выше посев.
fn by_record(a: &Standing, b: &Standing) -> Ordering {
    b.wins
        .cmp(&a.wins)
        .then_with(|| a.losses.cmp(&b.losses))
        .then_with(|| b.score_diff().cmp(&a.score_diff()))
        .then_with(|| b.score_for.cmp(&a.score_for))
        .then_with(|| a.seed.cmp(&b.seed))
}

fn champion_first(champion: Option<ParticipantId>, a: &Standing, b: &Standing) -> Ordering {
    let a_champ = Some(a.participant) == champion;
    let b_champ = Some(b.participant) == champion;
    b_champ.cmp(&a_champ)
}
