// src/topology/custom.rs

use crate::domain::{BracketBody, CustomConfig, Match, Participant, ParticipantId, SectionKind};
use crate::engine::errors::BracketError;
use crate::topology::GenContext;
use crate::validation::rules::validate_custom;
use crate::validation::ValidationReport;

/// Кастомная сетка: матчи приходят от клиента как есть.
///
/// Только структурная проверка: участники существуют, id матчей уникальны,
/// каждый `Tbd` слот получает ровно одну ссылку.
pub fn generate(
    participants: &[Participant],
    cfg: &CustomConfig,
    ctx: &mut GenContext<'_>,
) -> Result<BracketBody, BracketError> {
    let ids: Vec<ParticipantId> = participants.iter().map(|p| p.id).collect();
    let mut report = ValidationReport::new();
    validate_custom(cfg, Some(&ids), "config", &mut report);
    report.into_result()?;

    // Сгенерированные дальше матчи (следующие стадии) идут после id клиента.
    let max_id = cfg.matches.iter().map(|m| m.id).max().unwrap_or(0);
    ctx.ids.reserve_below(max_id + 1);

    let mut matches = Vec::with_capacity(cfg.matches.len());

    for entry in &cfg.matches {
        let position = cfg
            .matches
            .iter()
            .take_while(|m| m.id != entry.id)
            .filter(|m| m.round == entry.round)
            .count() as u32;

        let mut game = Match::with_slots(
            entry.id,
            SectionKind::Custom,
            entry.round,
            position,
            entry.slots.clone(),
            entry.best_of.or_else(|| ctx.best_of(entry.round)),
        );
        game.winner_to = entry.winner_to;
        game.loser_to = entry.loser_to;
        matches.push(game);
    }

    Ok(BracketBody::Custom { matches })
}
