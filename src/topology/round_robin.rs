// src/topology/round_robin.rs

use crate::domain::{
    BracketBody, Group, GroupLayout, Match, Participant, ParticipantId, Round, RoundRobinConfig,
    SectionKind, Slot,
};
use crate::engine::errors::BracketError;
use crate::topology::{group_name, snake_distribute, GenContext};

/// Расписание одной группы по круговой системе.
///
/// Каждый раунд – список пар и участник с bye (если в группе нечётное число).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoundSchedule {
    pub pairs: Vec<(ParticipantId, ParticipantId)>,
    pub bye: Option<ParticipantId>,
}

/// Круговой метод: первый участник стоит на месте, остальные вращаются.
///
/// Чётная группа из m: m-1 раундов по m/2 матчей.
/// Нечётная: добавляется "пустой" участник, m раундов по (m-1)/2 матчей.
/// Каждая пара встречается ровно один раз.
pub fn circle_schedule(members: &[ParticipantId]) -> Vec<RoundSchedule> {
    let mut ring: Vec<Option<ParticipantId>> = members.iter().copied().map(Some).collect();
    if ring.len() % 2 == 1 {
        ring.push(None);
    }

    let size = ring.len();
    if size < 2 {
        return Vec::new();
    }

    let mut schedule = Vec::with_capacity(size - 1);

    for _ in 0..size - 1 {
        let mut pairs = Vec::with_capacity(size / 2);
        let mut bye = None;

        for i in 0..size / 2 {
            match (ring[i], ring[size - 1 - i]) {
                (Some(a), Some(b)) => pairs.push((a, b)),
                (Some(p), None) | (None, Some(p)) => bye = Some(p),
                (None, None) => {}
            }
        }

        schedule.push(RoundSchedule { pairs, bye });

        // Вращение всех, кроме первого.
        let last = ring.pop();
        if let Some(last) = last {
            ring.insert(1, last);
        }
    }

    schedule
}

/// Разложить участников по группам согласно конфигу.
///
/// Внутри группы участники упорядочены по посеву.
pub fn resolve_groups(
    participants: &[Participant],
    cfg: &RoundRobinConfig,
) -> Vec<(String, Vec<ParticipantId>)> {
    let seed_of = |id: ParticipantId| -> u32 {
        participants
            .iter()
            .find(|p| p.id == id)
            .map(Participant::seed_or_max)
            .unwrap_or(u32::MAX)
    };

    match &cfg.groups {
        GroupLayout::Explicit(groups) => groups
            .iter()
            .map(|g| {
                let mut members = g.participants.clone();
                members.sort_by_key(|id| seed_of(*id));
                (g.name.clone(), members)
            })
            .collect(),
        GroupLayout::Count(k) => {
            let mut ordered: Vec<&Participant> = participants.iter().collect();
            ordered.sort_by_key(|p| p.seed_or_max());
            let ids: Vec<ParticipantId> = ordered.iter().map(|p| p.id).collect();

            snake_distribute(&ids, *k as usize)
                .into_iter()
                .enumerate()
                .map(|(i, members)| (group_name(i as u32), members))
                .collect()
        }
    }
}

pub fn generate(
    participants: &[Participant],
    cfg: &RoundRobinConfig,
    ctx: &mut GenContext<'_>,
) -> Result<BracketBody, BracketError> {
    let mut groups = Vec::new();

    for (gi, (name, members)) in resolve_groups(participants, cfg).into_iter().enumerate() {
        let gi = gi as u32;
        let section = SectionKind::Group(gi);
        let mut rounds = Vec::new();

        for (ri, sched) in circle_schedule(&members).into_iter().enumerate() {
            let number = ri as u32 + 1;
            let mut round = Round::new(number, format!("Round {}", number));

            for (pos, (a, b)) in sched.pairs.into_iter().enumerate() {
                let id = ctx.next_id();
                round.matches.push(Match::head_to_head(
                    id,
                    section,
                    number,
                    pos as u32,
                    Slot::Participant(a),
                    Slot::Participant(b),
                    ctx.best_of(number),
                ));
            }
            round.byes.extend(sched.bye);
            rounds.push(round);
        }

        groups.push(Group {
            index: gi,
            name,
            participants: members,
            rounds,
        });
    }

    Ok(BracketBody::RoundRobin { groups })
}
