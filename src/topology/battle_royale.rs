// src/topology/battle_royale.rs

use crate::domain::{
    BattleRoyaleConfig, BracketBody, Match, Participant, ParticipantId, Round, SectionKind, Slot,
};
use crate::engine::errors::BracketError;
use crate::topology::{snake_distribute, GenContext};

/// Количество лобби для `active` участников.
pub fn lobby_count(active: usize, teams_per_lobby: u32) -> usize {
    let per = (teams_per_lobby as usize).max(1);
    ((active + per - 1) / per).max(1)
}

/// Разложить участников (в порядке таблицы) по лобби "змейкой".
pub fn split_lobbies(ranked: &[ParticipantId], teams_per_lobby: u32) -> Vec<Vec<ParticipantId>> {
    snake_distribute(ranked, lobby_count(ranked.len(), teams_per_lobby))
}

/// Раунд battle royale: одно лобби = один матч с N слотами.
///
/// Лобби из одного участника получает слот `Bye` и закрывается автоматически.
pub fn build_round(
    number: u32,
    ranked: &[ParticipantId],
    cfg: &BattleRoyaleConfig,
    ctx: &mut GenContext<'_>,
) -> Round {
    let mut round = Round::new(number, format!("Round {}", number));

    for (pos, lobby) in split_lobbies(ranked, cfg.teams_per_lobby)
        .into_iter()
        .enumerate()
    {
        if lobby.is_empty() {
            continue;
        }

        let mut slots: Vec<Slot> = lobby.into_iter().map(Slot::Participant).collect();
        if slots.len() == 1 {
            slots.push(Slot::Bye);
        }

        let id = ctx.next_id();
        round.matches.push(Match::with_slots(
            id,
            SectionKind::Lobby,
            number,
            pos as u32,
            slots,
            None,
        ));
    }

    round
}

pub fn generate(
    participants: &[Participant],
    cfg: &BattleRoyaleConfig,
    ctx: &mut GenContext<'_>,
) -> Result<BracketBody, BracketError> {
    let mut ordered: Vec<&Participant> = participants.iter().collect();
    ordered.sort_by_key(|p| p.seed_or_max());
    let ids: Vec<ParticipantId> = ordered.iter().map(|p| p.id).collect();

    let round = build_round(1, &ids, cfg, ctx);

    Ok(BracketBody::BattleRoyale {
        rounds: vec![round],
    })
}
