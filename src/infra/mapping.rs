use crate::api::dto::{
    BracketSummaryDto, BracketViewDto, MatchDto, ParticipantDto, RoundDto, SectionDto, SlotDto,
    StageDto, StandingDto, StatsDto,
};
use crate::domain::{
    Bracket, BracketBody, BracketStatus, Match, ParticipantId, Round, Section, Slot,
};
use crate::engine::Standing;
use crate::stats::{count_stats, BracketStats};

/// Утилита: получить отображаемое имя участника.
///
/// Сетка знает имена своих участников, но сигнатуру оставляем общей,
/// чтобы фронт мог подставить свои (например, названия команд с тегами).
pub trait ParticipantNameResolver {
    fn resolve_name(&self, participant_id: ParticipantId) -> String;
}

/// Простая реализация: отображаемое имя = "Participant {id}".
pub struct DefaultNameResolver;

impl ParticipantNameResolver for DefaultNameResolver {
    fn resolve_name(&self, participant_id: ParticipantId) -> String {
        format!("Participant {}", participant_id)
    }
}

impl ParticipantNameResolver for Bracket {
    fn resolve_name(&self, participant_id: ParticipantId) -> String {
        self.participant(participant_id)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| DefaultNameResolver.resolve_name(participant_id))
    }
}

pub fn status_label(status: BracketStatus) -> &'static str {
    match status {
        BracketStatus::InProgress => "InProgress",
        BracketStatus::Completed => "Completed",
    }
}

pub fn map_slot_to_dto(slot: &Slot, names: &impl ParticipantNameResolver) -> SlotDto {
    match slot {
        Slot::Participant(id) => SlotDto {
            participant_id: Some(*id),
            label: names.resolve_name(*id),
        },
        Slot::Tbd => SlotDto {
            participant_id: None,
            label: "TBD".to_string(),
        },
        Slot::Bye => SlotDto {
            participant_id: None,
            label: "BYE".to_string(),
        },
    }
}

pub fn map_match_to_dto(game: &Match, names: &impl ParticipantNameResolver) -> MatchDto {
    let (scores, placements) = game
        .result
        .as_ref()
        .map(|r| (r.scores.clone(), r.placements.clone()))
        .unwrap_or_default();

    MatchDto {
        match_id: game.id,
        section: game.section,
        round: game.round,
        position: game.position,
        slots: game.slots.iter().map(|s| map_slot_to_dto(s, names)).collect(),
        best_of: game.best_of,
        status: game.status,
        winner_id: game.winner(),
        scores,
        placements,
        is_bye: game.is_bye(),
    }
}

pub fn map_round_to_dto(round: &Round, names: &impl ParticipantNameResolver) -> RoundDto {
    RoundDto {
        number: round.number,
        name: round.name.clone(),
        matches: round
            .matches
            .iter()
            .map(|m| map_match_to_dto(m, names))
            .collect(),
        byes: round.byes.clone(),
    }
}

fn map_section(label: &str, section: &Section, names: &impl ParticipantNameResolver) -> SectionDto {
    SectionDto {
        label: label.to_string(),
        rounds: section
            .rounds
            .iter()
            .map(|r| map_round_to_dto(r, names))
            .collect(),
    }
}

fn map_rounds(label: &str, rounds: &[Round], names: &impl ParticipantNameResolver) -> SectionDto {
    SectionDto {
        label: label.to_string(),
        rounds: rounds.iter().map(|r| map_round_to_dto(r, names)).collect(),
    }
}

/// Секции структуры в порядке отображения.
pub fn map_body_sections(
    body: &BracketBody,
    names: &impl ParticipantNameResolver,
) -> Vec<SectionDto> {
    match body {
        BracketBody::SingleElimination { winners } => vec![map_section("Bracket", winners, names)],
        BracketBody::DoubleElimination {
            winners,
            losers,
            grand_finals,
        } => vec![
            map_section("Winners", winners, names),
            map_section("Losers", losers, names),
            map_section("Grand Finals", grand_finals, names),
        ],
        BracketBody::RoundRobin { groups } => groups
            .iter()
            .map(|g| map_rounds(&g.name, &g.rounds, names))
            .collect(),
        BracketBody::Swiss { rounds } => vec![map_rounds("Swiss", rounds, names)],
        BracketBody::BattleRoyale { rounds } => vec![map_rounds("Lobbies", rounds, names)],
        BracketBody::Custom { matches } => {
            let mut numbers: Vec<u32> = matches.iter().map(|m| m.round).collect();
            numbers.sort_unstable();
            numbers.dedup();

            let rounds = numbers
                .into_iter()
                .map(|n| RoundDto {
                    number: n,
                    name: format!("Round {}", n),
                    matches: matches
                        .iter()
                        .filter(|m| m.round == n)
                        .map(|m| map_match_to_dto(m, names))
                        .collect(),
                    byes: Vec::new(),
                })
                .collect();

            vec![SectionDto {
                label: "Custom".to_string(),
                rounds,
            }]
        }
        // Стадии отображаются отдельно.
        BracketBody::MultiStage { .. } => Vec::new(),
    }
}

pub fn map_stats_to_dto(stats: &BracketStats) -> StatsDto {
    StatsDto {
        total_matches: stats.total_matches,
        completed_matches: stats.completed_matches,
        remaining_matches: stats.remaining(),
        bye_matches: stats.bye_matches,
        skipped_matches: stats.skipped_matches,
        contested_matches: stats.contested_total(),
        current_round: stats.current_round.as_ref().map(|r| r.name.clone()),
        current_stage: stats.current_stage,
    }
}

pub fn map_standing_to_dto(
    standing: &Standing,
    names: &impl ParticipantNameResolver,
) -> StandingDto {
    StandingDto {
        rank: standing.rank,
        participant_id: standing.participant,
        display_name: names.resolve_name(standing.participant),
        seed: standing.seed,
        group: standing.group,
        wins: standing.wins,
        losses: standing.losses,
        points: standing.points,
        score_diff: standing.score_diff(),
        qualified: standing.qualified,
        eliminated: standing.eliminated,
    }
}

/// Bracket → BracketViewDto (структура + счётчики).
pub fn map_bracket_to_dto(bracket: &Bracket) -> BracketViewDto {
    let stages = match &bracket.body {
        BracketBody::MultiStage { stages } => stages
            .iter()
            .map(|s| StageDto {
                index: s.index,
                name: s.name.clone(),
                kind: s.config.kind().as_str().to_string(),
                generated: s.is_generated(),
                completed: s.completed,
                sections: s
                    .body
                    .as_ref()
                    .map(|b| map_body_sections(b, bracket))
                    .unwrap_or_default(),
            })
            .collect(),
        _ => Vec::new(),
    };

    BracketViewDto {
        bracket_id: bracket.id,
        tournament_id: bracket.tournament_id,
        name: bracket.name.clone(),
        kind: bracket.kind().as_str().to_string(),
        status: status_label(bracket.status).to_string(),
        participants: bracket
            .participants
            .iter()
            .map(|p| ParticipantDto {
                participant_id: p.id,
                display_name: p.name.clone(),
                seed: p.seed,
            })
            .collect(),
        sections: map_body_sections(&bracket.body, bracket),
        stages,
        stats: map_stats_to_dto(&count_stats(bracket)),
    }
}

pub fn map_bracket_to_summary(bracket: &Bracket) -> BracketSummaryDto {
    BracketSummaryDto {
        bracket_id: bracket.id,
        tournament_id: bracket.tournament_id,
        name: bracket.name.clone(),
        kind: bracket.kind().as_str().to_string(),
        status: status_label(bracket.status).to_string(),
    }
}
