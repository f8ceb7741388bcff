// src/validation/rules.rs

use std::collections::{HashMap, HashSet};

use crate::domain::{
    AdvanceRule, BattleRoyaleConfig, BestOfPolicy, BracketConfig, CustomConfig, GenerateRequest,
    GroupLayout, MultiStageConfig, Participant, ParticipantId, RoundRobinConfig, Slot, SlotRef,
    SwissConfig,
};
use crate::validation::report::{ReasonCode, ValidationReport};

/// Минимум участников для любой сетки.
pub const MIN_PARTICIPANTS: usize = 2;

/// Полная валидация запроса на генерацию.
///
/// Не останавливается на первой ошибке: все правила прогоняются,
/// в отчёт попадает всё найденное.
pub fn validate(request: &GenerateRequest) -> ValidationReport {
    let mut report = ValidationReport::new();

    validate_participants(&request.participants, &mut report);

    let stage_count = match &request.config {
        BracketConfig::MultiStage(ms) => ms.stages.len().max(1),
        _ => 1,
    };
    validate_best_of(&request.settings.best_of, stage_count, &mut report);

    let ids: Vec<ParticipantId> = request.participants.iter().map(|p| p.id).collect();
    validate_config(
        &request.config,
        Some(&ids),
        request.participants.len(),
        "config",
        &mut report,
    );

    report
}

/// Участники: количество, уникальность id, корректность посева.
pub fn validate_participants(participants: &[Participant], report: &mut ValidationReport) {
    let n = participants.len();

    if n < MIN_PARTICIPANTS {
        report.push(
            "participants",
            ReasonCode::InsufficientParticipants {
                required: MIN_PARTICIPANTS,
                found: n,
            },
            format!("at least {} participants are required, got {}", MIN_PARTICIPANTS, n),
        );
    }

    let mut seen_ids: HashSet<ParticipantId> = HashSet::new();
    let mut seen_seeds: HashSet<u32> = HashSet::new();

    for (i, p) in participants.iter().enumerate() {
        if !seen_ids.insert(p.id) {
            report.push(
                format!("participants[{}].id", i),
                ReasonCode::DuplicateParticipant,
                format!("participant {} is listed more than once", p.id),
            );
        }

        if let Some(seed) = p.seed {
            if seed == 0 || seed as usize > n {
                report.push(
                    format!("participants[{}].seed", i),
                    ReasonCode::SeedOutOfRange,
                    format!("seed {} is outside 1..={}", seed, n),
                );
            } else if !seen_seeds.insert(seed) {
                report.push(
                    format!("participants[{}].seed", i),
                    ReasonCode::DuplicateSeed,
                    format!("seed {} is used more than once", seed),
                );
            }
        }
    }
}

/// Длина матчей: положительная и нечётная, исключения указывают на существующие стадии.
pub fn validate_best_of(policy: &BestOfPolicy, stage_count: usize, report: &mut ValidationReport) {
    if !is_valid_best_of(policy.default_best_of) {
        report.push(
            "settings.best_of.default_best_of",
            ReasonCode::BestOfInvalid,
            format!("best-of {} must be a positive odd number", policy.default_best_of),
        );
    }

    for (i, o) in policy.overrides.iter().enumerate() {
        if !is_valid_best_of(o.best_of) {
            report.push(
                format!("settings.best_of.overrides[{}].best_of", i),
                ReasonCode::BestOfInvalid,
                format!("best-of {} must be a positive odd number", o.best_of),
            );
        }
        if o.round == 0 {
            report.push(
                format!("settings.best_of.overrides[{}].round", i),
                ReasonCode::OutOfRange,
                "rounds are numbered from 1",
            );
        }
        if o.stage as usize >= stage_count {
            report.push(
                format!("settings.best_of.overrides[{}].stage", i),
                ReasonCode::OutOfRange,
                format!("stage {} does not exist ({} stage(s))", o.stage, stage_count),
            );
        }
    }
}

fn is_valid_best_of(best_of: u32) -> bool {
    best_of >= 1 && best_of % 2 == 1
}

/// Конфиг топологии.
///
/// `ids` – известные участники (None для будущих стадий, чей состав ещё неизвестен),
/// `count` – сколько участников попадёт в эту топологию.
pub fn validate_config(
    config: &BracketConfig,
    ids: Option<&[ParticipantId]>,
    count: usize,
    prefix: &str,
    report: &mut ValidationReport,
) {
    match config {
        BracketConfig::SingleElimination(_) | BracketConfig::DoubleElimination(_) => {}
        BracketConfig::RoundRobin(cfg) => validate_round_robin(cfg, ids, count, prefix, report),
        BracketConfig::Swiss(cfg) => validate_swiss(cfg, count, prefix, report),
        BracketConfig::BattleRoyale(cfg) => validate_battle_royale(cfg, prefix, report),
        BracketConfig::Custom(cfg) => validate_custom(cfg, ids, prefix, report),
        BracketConfig::MultiStage(cfg) => validate_multi_stage(cfg, ids, count, prefix, report),
    }
}

fn validate_round_robin(
    cfg: &RoundRobinConfig,
    ids: Option<&[ParticipantId]>,
    count: usize,
    prefix: &str,
    report: &mut ValidationReport,
) {
    let groups = match &cfg.groups {
        GroupLayout::Count(k) => {
            if *k == 0 {
                report.push(
                    format!("{}.groups", prefix),
                    ReasonCode::OutOfRange,
                    "group count must be at least 1",
                );
            } else if count / (*k as usize) < MIN_PARTICIPANTS {
                report.push(
                    format!("{}.groups", prefix),
                    ReasonCode::GroupTooSmall,
                    format!("{} participants cannot fill {} groups of 2+", count, k),
                );
            }
            return;
        }
        GroupLayout::Explicit(groups) => groups,
    };

    if groups.is_empty() {
        report.push(
            format!("{}.groups", prefix),
            ReasonCode::GroupsMissing,
            "round robin needs at least one group",
        );
        return;
    }

    let known: Option<HashSet<ParticipantId>> = ids.map(|ids| ids.iter().copied().collect());
    // participant -> индекс первой группы, где он встретился
    let mut assigned: HashMap<ParticipantId, u32> = HashMap::new();

    for (gi, group) in groups.iter().enumerate() {
        let gi = gi as u32;

        if group.participants.len() < MIN_PARTICIPANTS {
            report.push(
                format!("{}.groups[{}].participants", prefix, gi),
                ReasonCode::GroupTooSmall,
                format!(
                    "group '{}' has {} participant(s), needs at least {}",
                    group.name,
                    group.participants.len(),
                    MIN_PARTICIPANTS
                ),
            );
        }

        for (pi, pid) in group.participants.iter().enumerate() {
            let field = format!("{}.groups[{}].participants[{}]", prefix, gi, pi);

            if let Some(known) = &known {
                if !known.contains(pid) {
                    report.push(
                        field.clone(),
                        ReasonCode::UnknownParticipant,
                        format!("participant {} is not registered", pid),
                    );
                    continue;
                }
            }

            match assigned.get(pid) {
                Some(first) => report.push(
                    field,
                    ReasonCode::DuplicateAssignment {
                        participant_id: *pid,
                        first_group: *first,
                        second_group: gi,
                    },
                    format!("participant {} already plays in group {}", pid, first),
                ),
                None => {
                    assigned.insert(*pid, gi);
                }
            }
        }
    }

    if let Some(ids) = ids {
        for (i, pid) in ids.iter().enumerate() {
            if !assigned.contains_key(pid) {
                report.push(
                    format!("participants[{}]", i),
                    ReasonCode::UnassignedParticipant,
                    format!("participant {} is not in any group", pid),
                );
            }
        }
    }
}

/// Сколько раундов можно сыграть без повторных встреч.
fn max_rematch_free_rounds(count: usize) -> usize {
    if count % 2 == 0 {
        count.saturating_sub(1)
    } else {
        count
    }
}

fn validate_swiss(cfg: &SwissConfig, count: usize, prefix: &str, report: &mut ValidationReport) {
    if cfg.total_rounds == 0 {
        report.push(
            format!("{}.total_rounds", prefix),
            ReasonCode::OutOfRange,
            "swiss needs at least one round",
        );
    } else if count >= MIN_PARTICIPANTS && cfg.total_rounds as usize > max_rematch_free_rounds(count)
    {
        report.push(
            format!("{}.total_rounds", prefix),
            ReasonCode::TooManyRounds,
            format!(
                "{} rounds cannot be paired without rematches for {} participants",
                cfg.total_rounds, count
            ),
        );
    }

    if cfg.wins_to_qualify == Some(0) {
        report.push(
            format!("{}.wins_to_qualify", prefix),
            ReasonCode::OutOfRange,
            "wins_to_qualify must be at least 1",
        );
    }
    if cfg.losses_to_eliminate == Some(0) {
        report.push(
            format!("{}.losses_to_eliminate", prefix),
            ReasonCode::OutOfRange,
            "losses_to_eliminate must be at least 1",
        );
    }
}

fn validate_battle_royale(cfg: &BattleRoyaleConfig, prefix: &str, report: &mut ValidationReport) {
    if cfg.teams_per_lobby < MIN_PARTICIPANTS as u32 {
        report.push(
            format!("{}.teams_per_lobby", prefix),
            ReasonCode::OutOfRange,
            "a lobby needs at least 2 teams",
        );
    }
    if cfg.total_rounds == 0 {
        report.push(
            format!("{}.total_rounds", prefix),
            ReasonCode::OutOfRange,
            "battle royale needs at least one round",
        );
    }
    if let Some(k) = cfg.advance_per_lobby {
        if k == 0 || k >= cfg.teams_per_lobby {
            report.push(
                format!("{}.advance_per_lobby", prefix),
                ReasonCode::OutOfRange,
                format!("advance_per_lobby must be in 1..{}", cfg.teams_per_lobby),
            );
        }
    }
}

pub fn validate_custom(
    cfg: &CustomConfig,
    ids: Option<&[ParticipantId]>,
    prefix: &str,
    report: &mut ValidationReport,
) {
    if cfg.matches.is_empty() {
        report.push(
            format!("{}.matches", prefix),
            ReasonCode::MissingField,
            "custom bracket needs at least one match",
        );
        return;
    }

    // id -> слоты матча, для проверки ссылок
    let mut slots_by_id: HashMap<u64, &[Slot]> = HashMap::new();
    for (i, m) in cfg.matches.iter().enumerate() {
        if slots_by_id.insert(m.id, m.slots.as_slice()).is_some() {
            report.push(
                format!("{}.matches[{}].id", prefix, i),
                ReasonCode::DuplicateMatchId,
                format!("match id {} is used more than once", m.id),
            );
        }
    }

    let known: Option<HashSet<ParticipantId>> = ids.map(|ids| ids.iter().copied().collect());
    // Слоты, в которые уже ведёт ссылка: каждый `Tbd` заполняется ровно одной.
    let mut claimed: HashSet<SlotRef> = HashSet::new();

    for (i, m) in cfg.matches.iter().enumerate() {
        if m.round == 0 {
            report.push(
                format!("{}.matches[{}].round", prefix, i),
                ReasonCode::OutOfRange,
                "rounds are numbered from 1",
            );
        }

        if m.slots.len() < MIN_PARTICIPANTS {
            report.push(
                format!("{}.matches[{}].slots", prefix, i),
                ReasonCode::InvalidSlotCount,
                format!("match {} has {} slot(s)", m.id, m.slots.len()),
            );
        }

        let mut in_match: HashSet<ParticipantId> = HashSet::new();
        for (si, slot) in m.slots.iter().enumerate() {
            let Slot::Participant(pid) = slot else {
                continue;
            };
            let field = format!("{}.matches[{}].slots[{}]", prefix, i, si);

            if let Some(known) = &known {
                if !known.contains(pid) {
                    report.push(
                        field.clone(),
                        ReasonCode::UnknownParticipant,
                        format!("participant {} is not registered", pid),
                    );
                }
            }
            if !in_match.insert(*pid) {
                report.push(
                    field,
                    ReasonCode::DuplicateParticipant,
                    format!("participant {} takes two slots of match {}", pid, m.id),
                );
            }
        }

        for (name, link) in [("winner_to", m.winner_to), ("loser_to", m.loser_to)] {
            let Some(link) = link else {
                continue;
            };
            let valid = link.match_id != m.id
                && slots_by_id
                    .get(&link.match_id)
                    .and_then(|slots| slots.get(link.slot))
                    .map(|slot| *slot == Slot::Tbd)
                    .unwrap_or(false);
            if !valid {
                report.push(
                    format!("{}.matches[{}].{}", prefix, i, name),
                    ReasonCode::InvalidLink,
                    format!(
                        "match {} links to slot {} of match {}",
                        m.id, link.slot, link.match_id
                    ),
                );
            } else if !claimed.insert(link) {
                report.push(
                    format!("{}.matches[{}].{}", prefix, i, name),
                    ReasonCode::InvalidLink,
                    format!(
                        "slot {} of match {} is already fed by another link",
                        link.slot, link.match_id
                    ),
                );
            }
        }
    }

    for (i, m) in cfg.matches.iter().enumerate() {
        for (si, slot) in m.slots.iter().enumerate() {
            if *slot == Slot::Tbd && !claimed.contains(&SlotRef::new(m.id, si)) {
                report.push(
                    format!("{}.matches[{}].slots[{}]", prefix, i, si),
                    ReasonCode::UnfedSlot,
                    format!("no match feeds slot {} of match {}", si, m.id),
                );
            }
        }
    }
}

fn validate_multi_stage(
    cfg: &MultiStageConfig,
    ids: Option<&[ParticipantId]>,
    count: usize,
    prefix: &str,
    report: &mut ValidationReport,
) {
    if cfg.stages.is_empty() {
        report.push(
            format!("{}.stages", prefix),
            ReasonCode::MissingField,
            "multi-stage bracket needs at least one stage",
        );
        return;
    }

    let mut prev_count = count;
    let mut prev_config: Option<&BracketConfig> = None;

    for (i, stage) in cfg.stages.iter().enumerate() {
        let stage_prefix = format!("{}.stages[{}].config", prefix, i);

        if matches!(stage.config, BracketConfig::MultiStage(_)) {
            report.push(
                stage_prefix,
                ReasonCode::NestedMultiStage,
                "stages cannot contain another multi-stage bracket",
            );
            prev_config = Some(&stage.config);
            continue;
        }

        let stage_count = match prev_config {
            None => count,
            Some(prev) => {
                let derived = derived_count(stage.advance, prev_count, group_count(prev));
                if derived < MIN_PARTICIPANTS || derived > prev_count {
                    report.push(
                        format!("{}.stages[{}].advance", prefix, i),
                        ReasonCode::AdvanceCountOutOfRange,
                        format!(
                            "{} participant(s) would advance out of {}",
                            derived, prev_count
                        ),
                    );
                }
                derived
            }
        };

        let stage_ids = if i == 0 { ids } else { None };

        if i > 0 {
            let unsupported = match &stage.config {
                BracketConfig::Custom(_) => true,
                BracketConfig::RoundRobin(rr) => matches!(rr.groups, GroupLayout::Explicit(_)),
                _ => false,
            };
            if unsupported {
                report.push(
                    stage_prefix.clone(),
                    ReasonCode::StageTopologyUnsupported,
                    "later stages need a topology that does not name participants up front",
                );
            }
        }

        validate_config(&stage.config, stage_ids, stage_count, &stage_prefix, report);

        prev_count = stage_count;
        prev_config = Some(&stage.config);
    }
}

/// Сколько групп даёт топология (для правила TopPerGroup).
pub fn group_count(config: &BracketConfig) -> usize {
    match config {
        BracketConfig::RoundRobin(rr) => match &rr.groups {
            GroupLayout::Explicit(groups) => groups.len().max(1),
            GroupLayout::Count(k) => (*k as usize).max(1),
        },
        _ => 1,
    }
}

/// Сколько участников даст правило перехода.
pub fn derived_count(rule: AdvanceRule, prev_count: usize, groups: usize) -> usize {
    match rule {
        AdvanceRule::All => prev_count,
        AdvanceRule::Top { count } => count as usize,
        AdvanceRule::TopPerGroup { count } => count as usize * groups,
    }
}
