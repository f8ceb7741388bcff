// src/topology/preview.rs

use serde::{Deserialize, Serialize};

use crate::domain::{
    BattleRoyaleConfig, BracketConfig, BracketKind, CustomConfig, GroupLayout, MultiStageConfig,
    RoundRobinConfig, Slot, SwissConfig,
};
use crate::engine::errors::BracketError;
use crate::topology::battle_royale::lobby_count;
use crate::topology::double_elimination::{
    losers_round_count, losers_round_matches, losers_round_name, winners_round_name,
};
use crate::topology::seeding::{bracket_size, round_count};
use crate::topology::{elimination_round_name, group_name, snake_distribute};
use crate::validation::rules::{derived_count, group_count, MIN_PARTICIPANTS};

/// Раунд в предпросмотре структуры.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoundPreview {
    pub number: u32,
    pub name: String,
    /// Все матчи раунда, включая bye-матчи.
    pub matches: usize,
    /// Bye-матчи (выбывание) или участники с bye (группы, швейцарка).
    pub byes: usize,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SectionPreview {
    pub label: String,
    pub rounds: Vec<RoundPreview>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StagePreview {
    pub index: u32,
    pub name: String,
    pub participants: usize,
    pub preview: BracketPreview,
}

/// Структура сетки без участников: сколько раундов, матчей и bye.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BracketPreview {
    pub kind: BracketKind,
    pub participants: usize,
    pub sections: Vec<SectionPreview>,
    /// Матчи, которые гарантированно будут сыграны (без bye).
    pub total_matches: usize,
    /// Матчи, которые могут не понадобиться (ресет гранд-финала).
    pub optional_matches: usize,
    pub stages: Vec<StagePreview>,
}

impl BracketPreview {
    fn new(kind: BracketKind, participants: usize) -> Self {
        Self {
            kind,
            participants,
            sections: Vec::new(),
            total_matches: 0,
            optional_matches: 0,
            stages: Vec::new(),
        }
    }

    pub fn round_count(&self) -> usize {
        self.sections.iter().map(|s| s.rounds.len()).sum()
    }
}

/// Посчитать структуру сетки для `participant_count` участников.
pub fn preview(
    participant_count: usize,
    config: &BracketConfig,
) -> Result<BracketPreview, BracketError> {
    if participant_count < MIN_PARTICIPANTS {
        return Err(BracketError::InsufficientParticipants {
            required: MIN_PARTICIPANTS,
            found: participant_count,
        });
    }

    let n = participant_count;
    let preview = match config {
        BracketConfig::SingleElimination(_) => {
            let mut p = BracketPreview::new(BracketKind::SingleElimination, n);
            p.sections
                .push(elimination_section("Bracket", n, elimination_round_name));
            p.total_matches = n - 1;
            p
        }
        BracketConfig::DoubleElimination(cfg) => {
            let mut p = BracketPreview::new(BracketKind::DoubleElimination, n);
            p.sections
                .push(elimination_section("Winners", n, winners_round_name));
            p.sections.push(losers_section(n));

            let mut gf = SectionPreview {
                label: "Grand Finals".to_string(),
                rounds: vec![RoundPreview {
                    number: 1,
                    name: "Grand Finals".to_string(),
                    matches: 1,
                    byes: 0,
                }],
            };
            if cfg.grand_finals_reset {
                gf.rounds.push(RoundPreview {
                    number: 2,
                    name: "Grand Finals Reset".to_string(),
                    matches: 1,
                    byes: 0,
                });
                p.optional_matches = 1;
            }
            p.sections.push(gf);
            p.total_matches = 2 * (n - 1);
            p
        }
        BracketConfig::RoundRobin(cfg) => round_robin_preview(n, cfg),
        BracketConfig::Swiss(cfg) => swiss_preview(n, cfg),
        BracketConfig::BattleRoyale(cfg) => battle_royale_preview(n, cfg),
        BracketConfig::Custom(cfg) => custom_preview(n, cfg),
        BracketConfig::MultiStage(cfg) => multi_stage_preview(n, cfg)?,
    };

    Ok(preview)
}

fn elimination_section(label: &str, n: usize, name: fn(u32, u32) -> String) -> SectionPreview {
    let size = bracket_size(n);
    let total = round_count(n);

    let rounds = (1..=total)
        .map(|r| RoundPreview {
            number: r,
            name: name(r, total),
            matches: size >> r,
            byes: if r == 1 { size - n } else { 0 },
        })
        .collect();

    SectionPreview {
        label: label.to_string(),
        rounds,
    }
}

fn losers_section(n: usize) -> SectionPreview {
    let l = losers_round_count(round_count(n));

    SectionPreview {
        label: "Losers".to_string(),
        rounds: (1..=l)
            .map(|k| RoundPreview {
                number: k,
                name: losers_round_name(k, l),
                matches: losers_round_matches(l, k),
                byes: 0,
            })
            .collect(),
    }
}

fn round_robin_preview(n: usize, cfg: &RoundRobinConfig) -> BracketPreview {
    let mut p = BracketPreview::new(BracketKind::RoundRobin, n);

    let groups: Vec<(String, usize)> = match &cfg.groups {
        GroupLayout::Explicit(groups) => groups
            .iter()
            .map(|g| (g.name.clone(), g.participants.len()))
            .collect(),
        GroupLayout::Count(k) => {
            snake_sizes(n, *k as usize)
                .into_iter()
                .enumerate()
                .map(|(i, m)| (group_name(i as u32), m))
                .collect()
        }
    };

    for (name, m) in groups {
        let (rounds, per_round, byes) = if m % 2 == 0 {
            (m.saturating_sub(1), m / 2, 0)
        } else {
            (m, (m - 1) / 2, 1)
        };

        p.sections.push(SectionPreview {
            label: name,
            rounds: (1..=rounds as u32)
                .map(|r| RoundPreview {
                    number: r,
                    name: format!("Round {}", r),
                    matches: per_round,
                    byes,
                })
                .collect(),
        });
        p.total_matches += m * m.saturating_sub(1) / 2;
    }

    p
}

/// Пороги побед/поражений не учитываются: это верхняя граница.
fn swiss_preview(n: usize, cfg: &SwissConfig) -> BracketPreview {
    let mut p = BracketPreview::new(BracketKind::Swiss, n);

    p.sections.push(SectionPreview {
        label: "Swiss".to_string(),
        rounds: (1..=cfg.total_rounds)
            .map(|r| RoundPreview {
                number: r,
                name: format!("Round {}", r),
                matches: n / 2,
                byes: n % 2,
            })
            .collect(),
    });
    p.total_matches = (n / 2) * cfg.total_rounds as usize;
    p
}

fn battle_royale_preview(n: usize, cfg: &BattleRoyaleConfig) -> BracketPreview {
    let mut p = BracketPreview::new(BracketKind::BattleRoyale, n);
    let mut rounds = Vec::new();
    let mut active = n;

    for r in 1..=cfg.total_rounds {
        if active < 2 {
            break;
        }

        let lobbies = lobby_count(active, cfg.teams_per_lobby);
        let sizes = snake_sizes(active, lobbies);
        let byes = sizes.iter().filter(|s| **s == 1).count();

        rounds.push(RoundPreview {
            number: r,
            name: format!("Round {}", r),
            matches: lobbies,
            byes,
        });
        p.total_matches += lobbies - byes;

        if let Some(k) = cfg.advance_per_lobby {
            active = sizes.iter().map(|s| (*s).min(k as usize)).sum();
        }
    }

    p.sections.push(SectionPreview {
        label: "Lobbies".to_string(),
        rounds,
    });
    p
}

fn custom_preview(n: usize, cfg: &CustomConfig) -> BracketPreview {
    let mut p = BracketPreview::new(BracketKind::Custom, n);

    let mut numbers: Vec<u32> = cfg.matches.iter().map(|m| m.round).collect();
    numbers.sort_unstable();
    numbers.dedup();

    let rounds = numbers
        .into_iter()
        .map(|r| {
            let in_round = cfg.matches.iter().filter(|m| m.round == r);
            let (matches, byes) = in_round.fold((0, 0), |(all, byes), m| {
                (all + 1, byes + usize::from(m.slots.contains(&Slot::Bye)))
            });
            RoundPreview {
                number: r,
                name: format!("Round {}", r),
                matches,
                byes,
            }
        })
        .collect::<Vec<_>>();

    p.total_matches = rounds.iter().map(|r| r.matches - r.byes).sum();
    p.sections.push(SectionPreview {
        label: "Custom".to_string(),
        rounds,
    });
    p
}

fn multi_stage_preview(n: usize, cfg: &MultiStageConfig) -> Result<BracketPreview, BracketError> {
    let mut p = BracketPreview::new(BracketKind::MultiStage, n);
    let mut count = n;
    let mut prev_groups = 1;

    for (i, stage) in cfg.stages.iter().enumerate() {
        if i > 0 {
            count = derived_count(stage.advance, count, prev_groups).min(count);
        }

        let inner = preview(count, &stage.config)?;
        p.total_matches += inner.total_matches;
        p.optional_matches += inner.optional_matches;
        p.stages.push(StagePreview {
            index: i as u32,
            name: stage.name.clone(),
            participants: count,
            preview: inner,
        });

        prev_groups = group_count(&stage.config);
    }

    Ok(p)
}

/// Размеры корзин при раскладке "змейкой" `n` элементов.
fn snake_sizes(n: usize, buckets: usize) -> Vec<usize> {
    let items: Vec<usize> = (0..n).collect();
    snake_distribute(&items, buckets)
        .iter()
        .map(Vec::len)
        .collect()
}
