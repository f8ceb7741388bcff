//! Подсчёт матчей сетки. Ничего не хранится: всё считается по структуре.

use serde::{Deserialize, Serialize};

use crate::domain::{Bracket, BracketBody, MatchStatus, Round, SectionKind};
use crate::engine::stages::active_stage;

/// Раунд, в котором сейчас идёт игра.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoundRef {
    pub section: SectionKind,
    pub number: u32,
    pub name: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BracketStats {
    /// Все матчи, кроме пропущенных (`Skipped`). Bye-матчи входят.
    pub total_matches: usize,
    /// Завершённые, включая bye.
    pub completed_matches: usize,
    pub bye_matches: usize,
    pub skipped_matches: usize,
    pub current_round: Option<RoundRef>,
    /// Индекс текущей стадии (только multi-stage).
    pub current_stage: Option<u32>,
}

impl BracketStats {
    pub fn remaining(&self) -> usize {
        self.total_matches - self.completed_matches
    }

    /// Матчи, которые реально играются (без bye).
    pub fn contested_total(&self) -> usize {
        self.total_matches - self.bye_matches
    }

    pub fn is_finished(&self) -> bool {
        self.total_matches > 0 && self.remaining() == 0
    }
}

/// Посчитать статистику сетки. Несгенерированные стадии и раунды не учитываются.
///
/// Первый раунд на выбывание занимает всю степень двойки (`size / 2` матчей),
/// пустые места становятся bye-матчами. Поэтому для single elimination
/// `total_matches` равно `size - 1`, а не `n - 1`: при n = 5 это 7 матчей,
/// из них 3 bye. Сыгранные матчи даёт `contested_total()` (= `n - 1`).
pub fn count_stats(bracket: &Bracket) -> BracketStats {
    let mut stats = BracketStats::default();

    for game in bracket.matches() {
        if game.status == MatchStatus::Skipped {
            stats.skipped_matches += 1;
            continue;
        }

        stats.total_matches += 1;
        if game.is_completed() {
            stats.completed_matches += 1;
        }
        if game.is_bye() {
            stats.bye_matches += 1;
        }
    }

    match &bracket.body {
        BracketBody::MultiStage { stages } => {
            if let Some(stage) = active_stage(stages) {
                stats.current_stage = Some(stage.index);
                stats.current_round = stage.body.as_ref().and_then(current_round);
            }
        }
        body => stats.current_round = current_round(body),
    }

    stats
}

/// Первый (в порядке секций) раунд с незавершённым матчем.
pub fn current_round(body: &BracketBody) -> Option<RoundRef> {
    let open = |kind: SectionKind, round: &Round| -> Option<RoundRef> {
        if round.is_finished() {
            None
        } else {
            Some(RoundRef {
                section: kind,
                number: round.number,
                name: round.name.clone(),
            })
        }
    };

    match body {
        BracketBody::SingleElimination { winners } => {
            winners.rounds.iter().find_map(|r| open(winners.kind, r))
        }
        BracketBody::DoubleElimination {
            winners,
            losers,
            grand_finals,
        } => [winners, losers, grand_finals]
            .into_iter()
            .find_map(|s| s.rounds.iter().find_map(|r| open(s.kind, r))),
        BracketBody::RoundRobin { groups } => groups.iter().find_map(|g| {
            g.rounds
                .iter()
                .find_map(|r| open(SectionKind::Group(g.index), r))
        }),
        BracketBody::Swiss { rounds } => rounds.iter().find_map(|r| open(SectionKind::Swiss, r)),
        BracketBody::BattleRoyale { rounds } => {
            rounds.iter().find_map(|r| open(SectionKind::Lobby, r))
        }
        BracketBody::Custom { matches } => matches
            .iter()
            .filter(|m| !m.is_terminal())
            .map(|m| m.round)
            .min()
            .map(|number| RoundRef {
                section: SectionKind::Custom,
                number,
                name: format!("Round {}", number),
            }),
        BracketBody::MultiStage { stages } => active_stage(stages)
            .and_then(|s| s.body.as_ref())
            .and_then(current_round),
    }
}
