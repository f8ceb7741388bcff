// src/topology/multi_stage.rs

use tracing::info;

use crate::domain::{
    BestOfPolicy, BracketBody, MatchIdAllocator, MultiStageConfig, Participant, Stage,
};
use crate::engine::errors::BracketError;
use crate::topology::{generate_body, GenContext};

/// Multi-stage: сразу генерируется только первая стадия.
///
/// Остальные получают посев из итогов предыдущей, когда та завершится
/// (см. `engine::stages`).
pub fn generate(
    participants: &[Participant],
    cfg: &MultiStageConfig,
    ctx: &mut GenContext<'_>,
) -> Result<BracketBody, BracketError> {
    let mut stages = Vec::with_capacity(cfg.stages.len());

    for (i, sc) in cfg.stages.iter().enumerate() {
        let mut stage = Stage {
            index: i as u32,
            name: sc.name.clone(),
            config: sc.config.clone(),
            advance: sc.advance,
            participants: Vec::new(),
            body: None,
            completed: false,
        };

        if i == 0 {
            generate_stage(&mut stage, participants.to_vec(), ctx.best_of, &mut *ctx.ids)?;
        }

        stages.push(stage);
    }

    Ok(BracketBody::MultiStage { stages })
}

/// Сгенерировать стадию для уже упорядоченного списка участников.
///
/// Посев стадии переназначается 1..=n в порядке списка.
pub fn generate_stage(
    stage: &mut Stage,
    ordered: Vec<Participant>,
    best_of: &BestOfPolicy,
    ids: &mut MatchIdAllocator,
) -> Result<(), BracketError> {
    let participants: Vec<Participant> = ordered
        .into_iter()
        .enumerate()
        .map(|(i, p)| Participant {
            seed: Some(i as u32 + 1),
            ..p
        })
        .collect();

    let body = generate_body(&stage.config, &participants, best_of, stage.index, ids)?;

    info!(
        stage = stage.index,
        name = %stage.name,
        kind = stage.config.kind().as_str(),
        participants = participants.len(),
        "stage generated"
    );

    stage.participants = participants;
    stage.body = Some(body);
    Ok(())
}
