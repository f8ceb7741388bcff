// src/validation/mapper.rs

use serde::{Deserialize, Serialize};

use crate::engine::errors::BracketError;
use crate::validation::report::ValidationReport;

/// Внешний поиск локализованных сообщений по ключу.
///
/// Сам движок ничего не переводит: если lookup вернул `None`,
/// используется английское сообщение по умолчанию.
pub trait MessageLookup {
    fn lookup(&self, key: &str) -> Option<String>;
}

impl<F> MessageLookup for F
where
    F: Fn(&str) -> Option<String>,
{
    fn lookup(&self, key: &str) -> Option<String> {
        self(key)
    }
}

/// Сообщение для одного поля.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldMessage {
    pub field: String,
    pub code: String,
    pub message: String,
}

/// Отчёт, который видит UI.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorReport {
    pub message: String,
    pub field_errors: Vec<FieldMessage>,
    pub suggestions: Vec<String>,
}

/// Правило маппинга: подстрока сырой причины → ключ сообщения + подсказки.
struct MappingRule {
    needles: &'static [&'static str],
    key: &'static str,
    message: &'static str,
    suggestions: &'static [&'static str],
}

// Порядок важен: первое совпадение даёт основное сообщение,
// подсказки собираются со всех совпавших правил.
const RULES: &[MappingRule] = &[
    MappingRule {
        needles: &["invalid bracket configuration"],
        key: "bracket.errors.invalid_configuration",
        message: "The bracket configuration is invalid.",
        suggestions: &[],
    },
    MappingRule {
        needles: &["not enough participants", "insufficient_participants"],
        key: "bracket.errors.insufficient_participants",
        message: "At least two participants are required to generate a bracket.",
        suggestions: &["Add more teams"],
    },
    MappingRule {
        needles: &["duplicate_participant"],
        key: "bracket.errors.duplicate_participant",
        message: "A participant is listed more than once.",
        suggestions: &["Remove duplicate participants"],
    },
    MappingRule {
        needles: &["seed_out_of_range", "duplicate_seed"],
        key: "bracket.errors.seed",
        message: "Seeds must be unique and between 1 and the number of participants.",
        suggestions: &["Re-number the seeds"],
    },
    MappingRule {
        needles: &["assigned to group", "duplicate_assignment"],
        key: "bracket.errors.duplicate_assignment",
        message: "A participant is assigned to more than one group.",
        suggestions: &["Assign each team to exactly one group"],
    },
    MappingRule {
        needles: &["groups_missing"],
        key: "bracket.errors.groups_missing",
        message: "Round robin needs at least one group.",
        suggestions: &["Configure at least one group"],
    },
    MappingRule {
        needles: &["group_too_small"],
        key: "bracket.errors.group_too_small",
        message: "Every group needs at least two participants.",
        suggestions: &["Add more teams to the group or use fewer groups"],
    },
    MappingRule {
        needles: &["unknown_participant"],
        key: "bracket.errors.unknown_participant",
        message: "The participant is not registered for this tournament.",
        suggestions: &["Register the participant before assigning them"],
    },
    MappingRule {
        needles: &["unassigned_participant"],
        key: "bracket.errors.unassigned_participant",
        message: "A registered participant is not in any group.",
        suggestions: &["Assign every registered team to a group"],
    },
    MappingRule {
        needles: &["too_many_rounds"],
        key: "bracket.errors.too_many_rounds",
        message: "There are more rounds than possible pairings.",
        suggestions: &["Reduce the number of rounds or add more teams"],
    },
    MappingRule {
        needles: &["total_rounds"],
        key: "bracket.errors.total_rounds",
        message: "The number of rounds is invalid.",
        suggestions: &["Configure Swiss rounds"],
    },
    MappingRule {
        needles: &["teams_per_lobby", "advance_per_lobby"],
        key: "bracket.errors.lobby",
        message: "The lobby configuration is invalid.",
        suggestions: &["Set a lobby size of at least two teams"],
    },
    MappingRule {
        needles: &["wins_to_qualify", "losses_to_eliminate"],
        key: "bracket.errors.thresholds",
        message: "Qualification thresholds must be at least 1.",
        suggestions: &["Configure the win and loss thresholds"],
    },
    MappingRule {
        needles: &["best_of_invalid"],
        key: "bracket.errors.best_of",
        message: "Best-of must be a positive odd number.",
        suggestions: &["Use an odd best-of such as 1, 3 or 5"],
    },
    MappingRule {
        needles: &["duplicate_match_id"],
        key: "bracket.errors.duplicate_match_id",
        message: "Custom match ids must be unique.",
        suggestions: &["Give every custom match a unique id"],
    },
    MappingRule {
        needles: &["invalid_slot_count"],
        key: "bracket.errors.slot_count",
        message: "A match needs at least two slots.",
        suggestions: &["Add an opponent or a bye to the match"],
    },
    MappingRule {
        needles: &["invalid_link"],
        key: "bracket.errors.invalid_link",
        message: "A match links to a slot that does not exist or is already taken.",
        suggestions: &["Point each winner and loser link at its own empty slot"],
    },
    MappingRule {
        needles: &["unfed_slot"],
        key: "bracket.errors.unfed_slot",
        message: "A TBD slot is not fed by any match.",
        suggestions: &["Link a winner or loser into every TBD slot"],
    },
    MappingRule {
        needles: &["nested_multi_stage"],
        key: "bracket.errors.nested_stages",
        message: "Stages cannot be nested.",
        suggestions: &["Flatten nested stages into one stage list"],
    },
    MappingRule {
        needles: &["stage_topology_unsupported"],
        key: "bracket.errors.stage_topology",
        message: "This topology cannot be used after the first stage.",
        suggestions: &["Use a generated topology or a group count for later stages"],
    },
    MappingRule {
        needles: &["advance_count_out_of_range"],
        key: "bracket.errors.advance_count",
        message: "The number of advancing participants is invalid.",
        suggestions: &["Advance at least two participants and no more than the previous stage had"],
    },
    MappingRule {
        needles: &["missing_field"],
        key: "bracket.errors.missing_field",
        message: "This field is required.",
        suggestions: &[],
    },
    MappingRule {
        needles: &["out_of_range"],
        key: "bracket.errors.out_of_range",
        message: "The value is out of range.",
        suggestions: &[],
    },
    MappingRule {
        needles: &["already exists"],
        key: "bracket.errors.already_exists",
        message: "This tournament already has a bracket.",
        suggestions: &["Delete the existing bracket before generating a new one"],
    },
    MappingRule {
        needles: &["is not ready"],
        key: "bracket.errors.not_ready",
        message: "The match is still waiting for its opponents.",
        suggestions: &["Wait for the feeder matches to finish"],
    },
    MappingRule {
        needles: &["already terminal", "completed and read-only"],
        key: "bracket.errors.terminal",
        message: "The match result can no longer be changed.",
        suggestions: &[],
    },
    MappingRule {
        needles: &["still has unfinished matches"],
        key: "bracket.errors.round_in_progress",
        message: "The current round is not finished yet.",
        suggestions: &["Report all results of the current round first"],
    },
    MappingRule {
        needles: &["invalid scores", "invalid placements", "does not play in match"],
        key: "bracket.errors.result",
        message: "The submitted result does not fit the match.",
        suggestions: &["Check the winner and the scores"],
    },
    MappingRule {
        needles: &["does not exist", "not found"],
        key: "bracket.errors.not_found",
        message: "The requested item was not found.",
        suggestions: &["Refresh the bracket and try again"],
    },
];

const FALLBACK_KEY: &str = "bracket.errors.unknown";
const FALLBACK_MESSAGE: &str = "The bracket request could not be processed.";

/// Маппер сырых причин в сообщения для пользователя.
#[derive(Default)]
pub struct ErrorMapper<'a> {
    lookup: Option<&'a dyn MessageLookup>,
}

impl<'a> ErrorMapper<'a> {
    pub fn new() -> Self {
        Self { lookup: None }
    }

    pub fn with_lookup(lookup: &'a dyn MessageLookup) -> Self {
        Self {
            lookup: Some(lookup),
        }
    }

    fn resolve(&self, key: &str, default: &str) -> String {
        self.lookup
            .and_then(|l| l.lookup(key))
            .unwrap_or_else(|| default.to_string())
    }

    fn matching(raw: &str) -> impl Iterator<Item = &'static MappingRule> + '_ {
        let raw = raw.to_lowercase();
        RULES
            .iter()
            .filter(move |rule| rule.needles.iter().any(|n| raw.contains(n)))
    }

    /// Сообщение по сырой причине (первое совпавшее правило).
    pub fn message_for(&self, raw: &str) -> String {
        match Self::matching(raw).next() {
            Some(rule) => self.resolve(rule.key, rule.message),
            None => self.resolve(FALLBACK_KEY, FALLBACK_MESSAGE),
        }
    }

    /// Подсказки со всех совпавших правил, без повторов.
    pub fn suggestions_for(&self, raw: &str) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for rule in Self::matching(raw) {
            for s in rule.suggestions {
                let s = self.resolve(&format!("{}.suggestion", rule.key), s);
                if !out.contains(&s) {
                    out.push(s);
                }
            }
        }
        out
    }

    /// Отчёт по сырой причине + отчёту валидации (если он есть).
    pub fn map(&self, raw: &str, report: Option<&ValidationReport>) -> ErrorReport {
        let field_errors = report
            .map(|r| {
                r.errors
                    .iter()
                    .map(|e| {
                        let code = e.reason.as_str();
                        FieldMessage {
                            field: e.field.clone(),
                            code: code.to_string(),
                            message: self.message_for(code),
                        }
                    })
                    .collect()
            })
            .unwrap_or_default();

        ErrorReport {
            message: self.message_for(raw),
            field_errors,
            suggestions: self.suggestions_for(raw),
        }
    }

    pub fn map_report(&self, report: &ValidationReport) -> ErrorReport {
        let raw = BracketError::InvalidConfiguration(report.clone()).to_string();
        self.map(&raw, Some(report))
    }

    pub fn map_error(&self, err: &BracketError) -> ErrorReport {
        let report = match err {
            BracketError::InvalidConfiguration(report) => Some(report),
            _ => None,
        };
        self.map(&err.to_string(), report)
    }
}

impl BracketError {
    /// Отчёт для UI без локализации.
    pub fn to_report(&self) -> ErrorReport {
        ErrorMapper::new().map_error(self)
    }
}
