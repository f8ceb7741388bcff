// tests/validation_tests.rs
//
// Валидация запроса и сообщения об ошибках:
//  1) все ошибки за один проход
//  2) одиночная ошибка количества – отдельный вариант ошибки
//  3) швейцарка: раундов больше, чем пар без повторов
//  4) явные группы: чужой участник, маленькая группа, участник без группы
//  5) battle royale: размеры лобби и отсев
//  6) стадии: число проходящих и неподдерживаемая топология
//  7) best-of: чётное значение, несуществующие раунд и стадия
//  8) маппер: сообщение, поля, подсказки
//  9) маппер с внешним lookup и сообщение по умолчанию
// 10) отчёт: has / for_field / Display
// 11) кастомные ссылки: два фидера в один слот, слот без фидера

use bracket_engine::domain::{
    AdvanceRule, BattleRoyaleConfig, BestOfPolicy, BracketConfig, CustomConfig, CustomMatchSpec,
    EliminationConfig, GenerateRequest, GenerationSettings, GroupConfig, GroupLayout,
    MultiStageConfig, Participant, RoundRobinConfig, Slot, SlotRef, StageConfig, SwissConfig,
};
use bracket_engine::engine::BracketError;
use bracket_engine::topology::generate;
use bracket_engine::validation::{
    validate, ErrorMapper, FieldMessage, ReasonCode, ValidationReport,
};

// -----------------------------
// ВСПОМОГАТЕЛЬНЫЕ КОНСТРУКТОРЫ
// -----------------------------

fn roster(count: u64) -> Vec<Participant> {
    (1..=count)
        .map(|id| Participant::seeded(id, format!("Team {}", id), id as u32))
        .collect()
}

fn single_elimination() -> BracketConfig {
    BracketConfig::SingleElimination(EliminationConfig::default())
}

fn fields(report: &ValidationReport) -> Vec<(&str, &str)> {
    report
        .errors
        .iter()
        .map(|e| (e.field.as_str(), e.reason.as_str()))
        .collect()
}

// TEST 1 — несколько ошибок сразу
#[test]
fn collects_every_error_in_one_pass() {
    let participants = vec![
        Participant::seeded(1, "Alpha", 1),
        Participant::seeded(1, "Alpha again", 1),
        Participant::seeded(3, "Gamma", 9),
    ];
    let request = GenerateRequest::new(
        1,
        "Broken",
        participants,
        BracketConfig::Swiss(SwissConfig::standard(0)),
    )
    .with_settings(GenerationSettings {
        best_of: BestOfPolicy::new(2),
        shuffle_unseeded: false,
    });

    let report = validate(&request);
    assert_eq!(
        fields(&report),
        vec![
            ("participants[1].id", "duplicate_participant"),
            ("participants[1].seed", "duplicate_seed"),
            ("participants[2].seed", "seed_out_of_range"),
            ("settings.best_of.default_best_of", "best_of_invalid"),
            ("config.total_rounds", "out_of_range"),
        ]
    );

    match generate(&request, 1).unwrap_err() {
        BracketError::InvalidConfiguration(r) => assert_eq!(r, report),
        other => panic!("unexpected error: {:?}", other),
    }
}

// TEST 2 — один участник
#[test]
fn lone_participant_gets_dedicated_error() {
    let request = GenerateRequest::new(1, "Solo", roster(1), single_elimination());

    let report = validate(&request);
    assert_eq!(report.len(), 1);
    assert_eq!(
        report.errors[0].reason,
        ReasonCode::InsufficientParticipants {
            required: 2,
            found: 1
        }
    );

    assert_eq!(
        generate(&request, 1).unwrap_err(),
        BracketError::InsufficientParticipants {
            required: 2,
            found: 1
        }
    );
}

// TEST 3 — 4 участника не сыграют 4 раунда без повторов
#[test]
fn swiss_round_limit() {
    let too_many = GenerateRequest::new(
        1,
        "Swiss",
        roster(4),
        BracketConfig::Swiss(SwissConfig::standard(4)),
    );
    assert!(validate(&too_many).has("too_many_rounds"));

    // Нечётное поле: каждый раз кто-то отдыхает, раундов может быть n.
    let odd = GenerateRequest::new(
        1,
        "Swiss",
        roster(5),
        BracketConfig::Swiss(SwissConfig::standard(5)),
    );
    assert!(validate(&odd).is_empty());

    let zero_threshold = GenerateRequest::new(
        1,
        "Swiss",
        roster(8),
        BracketConfig::Swiss(SwissConfig {
            total_rounds: 3,
            wins_to_qualify: Some(0),
            losses_to_eliminate: Some(2),
        }),
    );
    assert_eq!(
        fields(&validate(&zero_threshold)),
        vec![("config.wins_to_qualify", "out_of_range")]
    );
}

// TEST 4 — явные группы
#[test]
fn explicit_groups_are_checked_against_roster() {
    let request = GenerateRequest::new(
        1,
        "Groups",
        roster(4),
        BracketConfig::RoundRobin(RoundRobinConfig {
            groups: GroupLayout::Explicit(vec![
                GroupConfig {
                    name: "A".to_string(),
                    participants: vec![1, 2, 9],
                },
                GroupConfig {
                    name: "B".to_string(),
                    participants: vec![3],
                },
            ]),
        }),
    );

    assert_eq!(
        fields(&validate(&request)),
        vec![
            ("config.groups[0].participants[2]", "unknown_participant"),
            ("config.groups[1].participants", "group_too_small"),
            ("participants[3]", "unassigned_participant"),
        ]
    );

    let empty = GenerateRequest::new(
        1,
        "Groups",
        roster(4),
        BracketConfig::RoundRobin(RoundRobinConfig {
            groups: GroupLayout::Explicit(Vec::new()),
        }),
    );
    assert!(validate(&empty).has("groups_missing"));

    let crowded = GenerateRequest::new(
        1,
        "Groups",
        roster(5),
        BracketConfig::RoundRobin(RoundRobinConfig {
            groups: GroupLayout::Count(3),
        }),
    );
    assert!(validate(&crowded).has("group_too_small"));
}

// TEST 5 — лобби
#[test]
fn battle_royale_bounds() {
    let request = GenerateRequest::new(
        1,
        "Royale",
        roster(10),
        BracketConfig::BattleRoyale(BattleRoyaleConfig {
            teams_per_lobby: 1,
            total_rounds: 0,
            advance_per_lobby: Some(1),
        }),
    );

    assert_eq!(
        fields(&validate(&request)),
        vec![
            ("config.teams_per_lobby", "out_of_range"),
            ("config.total_rounds", "out_of_range"),
            ("config.advance_per_lobby", "out_of_range"),
        ]
    );
}

// TEST 6 — стадии
#[test]
fn stage_rules() {
    let request = GenerateRequest::new(
        1,
        "Stages",
        roster(8),
        BracketConfig::MultiStage(MultiStageConfig {
            stages: vec![
                StageConfig {
                    name: "Playoff".to_string(),
                    config: single_elimination(),
                    advance: AdvanceRule::All,
                },
                StageConfig {
                    name: "Groups".to_string(),
                    config: BracketConfig::RoundRobin(RoundRobinConfig {
                        groups: GroupLayout::Explicit(vec![GroupConfig {
                            name: "A".to_string(),
                            participants: vec![1, 2],
                        }]),
                    }),
                    advance: AdvanceRule::Top { count: 10 },
                },
            ],
        }),
    );

    assert_eq!(
        fields(&validate(&request)),
        vec![
            ("config.stages[1].advance", "advance_count_out_of_range"),
            ("config.stages[1].config", "stage_topology_unsupported"),
        ]
    );

    let empty = GenerateRequest::new(
        1,
        "Stages",
        roster(8),
        BracketConfig::MultiStage(MultiStageConfig { stages: Vec::new() }),
    );
    assert_eq!(
        fields(&validate(&empty)),
        vec![("config.stages", "missing_field")]
    );
}

// TEST 7 — best-of
#[test]
fn best_of_overrides() {
    let request = GenerateRequest::new(1, "Cup", roster(4), single_elimination()).with_settings(
        GenerationSettings {
            best_of: BestOfPolicy::new(3).with_override(2, 0, 4),
            shuffle_unseeded: false,
        },
    );

    assert_eq!(
        fields(&validate(&request)),
        vec![
            ("settings.best_of.overrides[0].best_of", "best_of_invalid"),
            ("settings.best_of.overrides[0].round", "out_of_range"),
            ("settings.best_of.overrides[0].stage", "out_of_range"),
        ]
    );

    // Корректное исключение для финала.
    let ok = GenerateRequest::new(1, "Cup", roster(4), single_elimination()).with_settings(
        GenerationSettings {
            best_of: BestOfPolicy::new(1).with_override(0, 2, 5),
            shuffle_unseeded: false,
        },
    );
    let bracket = generate(&ok, 1).expect("bracket");
    let final_best_of = bracket.matches().find(|m| m.round == 2).map(|m| m.best_of);
    assert_eq!(final_best_of, Some(Some(5)));
}

// TEST 8 — отчёт для UI
#[test]
fn mapper_builds_field_messages() {
    let mut report = ValidationReport::new();
    report.push("participants[1].seed", ReasonCode::DuplicateSeed, "seed 1 twice");
    report.push(
        "settings.best_of.default_best_of",
        ReasonCode::BestOfInvalid,
        "best-of 2",
    );

    let ui = ErrorMapper::new().map_report(&report);

    assert_eq!(ui.message, "The bracket configuration is invalid.");
    assert_eq!(
        ui.field_errors,
        vec![
            FieldMessage {
                field: "participants[1].seed".to_string(),
                code: "duplicate_seed".to_string(),
                message: "Seeds must be unique and between 1 and the number of participants."
                    .to_string(),
            },
            FieldMessage {
                field: "settings.best_of.default_best_of".to_string(),
                code: "best_of_invalid".to_string(),
                message: "Best-of must be a positive odd number.".to_string(),
            },
        ]
    );
    assert_eq!(
        ui.suggestions,
        vec![
            "Re-number the seeds".to_string(),
            "Use an odd best-of such as 1, 3 or 5".to_string(),
        ]
    );
}

// TEST 9 — локализация через lookup
#[test]
fn mapper_uses_lookup_and_fallback() {
    let lookup = |key: &str| -> Option<String> {
        match key {
            "bracket.errors.insufficient_participants" => {
                Some("Нужно минимум два участника.".to_string())
            }
            "bracket.errors.insufficient_participants.suggestion" => {
                Some("Добавьте команды".to_string())
            }
            _ => None,
        }
    };
    let mapper = ErrorMapper::with_lookup(&lookup);

    let err = BracketError::InsufficientParticipants {
        required: 2,
        found: 1,
    };
    let ui = mapper.map_error(&err);
    assert_eq!(ui.message, "Нужно минимум два участника.");
    assert_eq!(ui.suggestions, vec!["Добавьте команды".to_string()]);

    // Ключа нет в lookup – английский текст.
    let dup = BracketError::DuplicateAssignment {
        participant_id: 1,
        first_group: 0,
        second_group: 1,
    };
    assert_eq!(
        mapper.map_error(&dup).message,
        "A participant is assigned to more than one group."
    );

    // Ничего не совпало.
    let ui = mapper.map_error(&BracketError::Internal("storage offline"));
    assert_eq!(ui.message, "The bracket request could not be processed.");
    assert!(ui.suggestions.is_empty());
    assert_eq!(
        mapper.message_for("something odd"),
        "The bracket request could not be processed."
    );
}

// TEST 10 — ValidationReport
#[test]
fn report_helpers() {
    let mut report = ValidationReport::new();
    assert!(report.is_empty());
    assert!(report.clone().into_result().is_ok());

    report.push("config.matches", ReasonCode::MissingField, "no matches");
    report.push("config.groups", ReasonCode::OutOfRange, "zero groups");
    report.push("config.groups", ReasonCode::GroupTooSmall, "too small");

    assert!(report.has("missing_field"));
    assert!(!report.has("invalid_link"));
    assert_eq!(report.for_field("config.groups").count(), 2);
    assert_eq!(
        report.to_string(),
        "3 field error(s): config.matches: missing_field; config.groups: out_of_range; \
         config.groups: group_too_small"
    );

    assert!(matches!(
        report.into_result(),
        Err(BracketError::InvalidConfiguration(_))
    ));
}

// TEST 11 — каждый TBD слот кормит ровно одна ссылка
#[test]
fn custom_links_feed_each_slot_once() {
    let spec = |id: u64, round: u32, slots: Vec<Slot>, winner_to: Option<SlotRef>| {
        CustomMatchSpec {
            id,
            round,
            slots,
            best_of: None,
            winner_to,
            loser_to: None,
        }
    };

    // Оба полуфинала ведут в слот 0 финала, слот 1 никто не кормит.
    let request = GenerateRequest::new(
        1,
        "Custom",
        roster(4),
        BracketConfig::Custom(CustomConfig {
            matches: vec![
                spec(
                    1,
                    1,
                    vec![Slot::Participant(1), Slot::Participant(2)],
                    Some(SlotRef::new(3, 0)),
                ),
                spec(
                    2,
                    1,
                    vec![Slot::Participant(3), Slot::Participant(4)],
                    Some(SlotRef::new(3, 0)),
                ),
                spec(3, 2, vec![Slot::Tbd, Slot::Tbd], None),
            ],
        }),
    );

    let report = validate(&request);
    assert_eq!(
        fields(&report),
        vec![
            ("config.matches[1].winner_to", "invalid_link"),
            ("config.matches[2].slots[1]", "unfed_slot"),
        ]
    );
    assert!(matches!(
        generate(&request, 1),
        Err(BracketError::InvalidConfiguration(_))
    ));

    let ui = ErrorMapper::new().map_report(&report);
    assert_eq!(ui.field_errors[1].message, "A TBD slot is not fed by any match.");

    // Финал без фидеров вообще: обе ячейки пустые навсегда.
    let orphan = GenerateRequest::new(
        1,
        "Custom",
        roster(2),
        BracketConfig::Custom(CustomConfig {
            matches: vec![
                spec(1, 1, vec![Slot::Participant(1), Slot::Participant(2)], None),
                spec(2, 2, vec![Slot::Tbd, Slot::Tbd], None),
            ],
        }),
    );
    assert_eq!(
        fields(&validate(&orphan)),
        vec![
            ("config.matches[1].slots[0]", "unfed_slot"),
            ("config.matches[1].slots[1]", "unfed_slot"),
        ]
    );
}
