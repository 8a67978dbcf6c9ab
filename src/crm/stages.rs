use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use uuid::Uuid;

use crate::crm::error::CrmError;
use crate::shared::models::{CrmDeal, CrmPipelineStage, DealStatus};
use crate::shared::schema::{crm_deals, crm_pipeline_stages, crm_pipelines};

/// Stages at or above this win-probability may only hold deals that are
/// linked to a contact or an organization.
pub const HIGH_CONFIDENCE_PROBABILITY: i32 = 75;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionDenial {
    DealAlreadyClosed,
    RequiresContactOrOrganization,
}

impl TransitionDenial {
    pub fn message_key(&self) -> &'static str {
        match self {
            Self::DealAlreadyClosed => "crm.deal-already-closed",
            Self::RequiresContactOrOrganization => "crm.stage-requires-contact",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TransitionCheck {
    pub valid: bool,
    pub reason: Option<TransitionDenial>,
}

impl TransitionCheck {
    fn ok() -> Self {
        Self {
            valid: true,
            reason: None,
        }
    }

    fn denied(reason: TransitionDenial) -> Self {
        Self {
            valid: false,
            reason: Some(reason),
        }
    }
}

/// Decide whether a deal may move to `target`. Rules, in order: a deal with
/// no stage yet may enter anywhere; a won or lost deal moves nowhere; a
/// high-confidence stage requires a linked contact or organization. Forward
/// and backward moves are otherwise both legal.
pub fn validate_stage_transition(deal: &CrmDeal, target: &CrmPipelineStage) -> TransitionCheck {
    if deal.stage_id.is_none() {
        return TransitionCheck::ok();
    }

    if DealStatus::parse(&deal.status).is_some_and(DealStatus::is_closed) {
        return TransitionCheck::denied(TransitionDenial::DealAlreadyClosed);
    }

    if target.probability >= HIGH_CONFIDENCE_PROBABILITY
        && deal.contact_id.is_none()
        && deal.organization_id.is_none()
    {
        return TransitionCheck::denied(TransitionDenial::RequiresContactOrOrganization);
    }

    TransitionCheck::ok()
}

pub fn is_forward_transition(current: &CrmPipelineStage, target: &CrmPipelineStage) -> bool {
    target.stage_order > current.stage_order
}

/// The adjacent stage after `current` within the same pipeline, or `None`
/// at the boundary.
pub fn next_stage<'a>(
    current: &CrmPipelineStage,
    stages: &'a [CrmPipelineStage],
) -> Option<&'a CrmPipelineStage> {
    stages
        .iter()
        .filter(|s| s.pipeline_id == current.pipeline_id && s.stage_order > current.stage_order)
        .min_by_key(|s| s.stage_order)
}

pub fn previous_stage<'a>(
    current: &CrmPipelineStage,
    stages: &'a [CrmPipelineStage],
) -> Option<&'a CrmPipelineStage> {
    stages
        .iter()
        .filter(|s| s.pipeline_id == current.pipeline_id && s.stage_order < current.stage_order)
        .max_by_key(|s| s.stage_order)
}

/// Apply a validated stage move. The deal's probability snapshot follows
/// the stage; stages flagged won/lost also close the deal.
pub fn move_deal_to_stage(
    conn: &mut PgConnection,
    owner_id: Uuid,
    deal_id: Uuid,
    stage_id: Uuid,
    now: DateTime<Utc>,
) -> Result<CrmDeal, CrmError> {
    conn.transaction(|conn| {
        let deal: CrmDeal = crm_deals::table
            .filter(crm_deals::id.eq(deal_id))
            .filter(crm_deals::owner_id.eq(owner_id))
            .first(conn)
            .optional()?
            .ok_or(CrmError::NotFound("crm.deal-not-found"))?;

        let target: CrmPipelineStage = crm_pipeline_stages::table
            .inner_join(crm_pipelines::table)
            .filter(crm_pipeline_stages::id.eq(stage_id))
            .filter(crm_pipelines::owner_id.eq(owner_id))
            .select(CrmPipelineStage::as_select())
            .first(conn)
            .optional()?
            .ok_or(CrmError::NotFound("crm.stage-not-in-pipeline"))?;

        if let Some(current_id) = deal.stage_id {
            let same_pipeline: i64 = crm_pipeline_stages::table
                .filter(crm_pipeline_stages::id.eq(current_id))
                .filter(crm_pipeline_stages::pipeline_id.eq(target.pipeline_id))
                .count()
                .get_result(conn)?;
            if same_pipeline == 0 {
                return Err(CrmError::Validation("crm.stage-not-in-pipeline"));
            }
        }

        let check = validate_stage_transition(&deal, &target);
        if let Some(reason) = check.reason {
            return Err(CrmError::Validation(reason.message_key()));
        }

        diesel::update(crm_deals::table.filter(crm_deals::id.eq(deal.id)))
            .set((
                crm_deals::stage_id.eq(Some(target.id)),
                crm_deals::probability.eq(target.probability),
                crm_deals::updated_at.eq(now),
            ))
            .execute(conn)?;

        if target.is_won || target.is_lost {
            let status = if target.is_won {
                DealStatus::Won
            } else {
                DealStatus::Lost
            };
            diesel::update(crm_deals::table.filter(crm_deals::id.eq(deal.id)))
                .set((
                    crm_deals::status.eq(status.as_str()),
                    crm_deals::closed_at.eq(Some(now)),
                ))
                .execute(conn)?;
        }

        let updated: CrmDeal = crm_deals::table
            .filter(crm_deals::id.eq(deal.id))
            .first(conn)?;
        Ok(updated)
    })
}
