use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::OwnerScope;
use crate::crm::cadence::{self, CadenceApplicationResult};
use crate::crm::cascade::{self, DealCascadeOutcome, OrganizationCascadeOutcome};
use crate::crm::conversion::{self, ConvertLeadRequest, LeadConversionResult};
use crate::crm::error::{CrmError, LocalizedError};
use crate::crm::stages;
use crate::crm::value;
use crate::i18n::{Locale, RequestLocale};
use crate::shared::models::{CrmDeal, CrmDealProduct, CrmLeadCadence};
use crate::shared::schema::{crm_deal_products, crm_deals};
use crate::shared::state::AppState;
use crate::shared::utils::DbPool;

/// Run a blocking engine call on the pool, off the async runtime, and
/// localize whatever it raises. The teacher pattern: checkout + transaction
/// inside `spawn_blocking`, join errors folded into Internal.
async fn run_engine<T, F>(pool: DbPool, locale: Locale, f: F) -> Result<T, LocalizedError>
where
    T: Send + 'static,
    F: FnOnce(&mut PgConnection) -> Result<T, CrmError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let mut conn = pool.get()?;
        f(&mut conn)
    })
    .await
    .map_err(|e| CrmError::Internal(e.to_string()))
    .and_then(|r| r)
    .map_err(|e| e.localized(locale))
}

pub async fn convert_lead(
    State(state): State<Arc<AppState>>,
    OwnerScope(owner_id): OwnerScope,
    RequestLocale(locale): RequestLocale,
    Path(lead_id): Path<Uuid>,
    Json(req): Json<ConvertLeadRequest>,
) -> Result<Json<LeadConversionResult>, LocalizedError> {
    let pool = state.conn.clone();
    let result = run_engine(pool, locale, move |conn| {
        conversion::convert_lead(conn, owner_id, lead_id, &req, Utc::now())
    })
    .await?;

    state.views.invalidate(&[
        format!("/crm/leads/{lead_id}"),
        format!("/crm/organizations/{}", result.organization_id),
    ]);

    Ok(Json(result))
}

pub async fn delete_deal(
    State(state): State<Arc<AppState>>,
    OwnerScope(owner_id): OwnerScope,
    RequestLocale(locale): RequestLocale,
    Path(deal_id): Path<Uuid>,
) -> Result<Json<DealCascadeOutcome>, LocalizedError> {
    let pool = state.conn.clone();
    let outcome = run_engine(pool, locale, move |conn| {
        cascade::delete_deal_cascade(conn, owner_id, deal_id)
    })
    .await?;

    state
        .views
        .invalidate(&[format!("/crm/deals/{deal_id}"), "/crm/pipeline".to_string()]);

    Ok(Json(outcome))
}

pub async fn delete_organization(
    State(state): State<Arc<AppState>>,
    OwnerScope(owner_id): OwnerScope,
    RequestLocale(locale): RequestLocale,
    Path(organization_id): Path<Uuid>,
) -> Result<Json<OrganizationCascadeOutcome>, LocalizedError> {
    let pool = state.conn.clone();
    let outcome = run_engine(pool, locale, move |conn| {
        cascade::delete_organization_cascade(conn, owner_id, organization_id)
    })
    .await?;

    state.views.invalidate(&[
        format!("/crm/organizations/{organization_id}"),
        "/crm/pipeline".to_string(),
    ]);

    Ok(Json(outcome))
}

#[derive(Debug, Deserialize)]
pub struct MoveDealStageRequest {
    pub stage_id: Uuid,
}

pub async fn move_deal_stage(
    State(state): State<Arc<AppState>>,
    OwnerScope(owner_id): OwnerScope,
    RequestLocale(locale): RequestLocale,
    Path(deal_id): Path<Uuid>,
    Json(req): Json<MoveDealStageRequest>,
) -> Result<Json<CrmDeal>, LocalizedError> {
    let pool = state.conn.clone();
    let deal = run_engine(pool, locale, move |conn| {
        stages::move_deal_to_stage(conn, owner_id, deal_id, req.stage_id, Utc::now())
    })
    .await?;

    state
        .views
        .invalidate(&[format!("/crm/deals/{deal_id}"), "/crm/pipeline".to_string()]);

    Ok(Json(deal))
}

#[derive(Debug, Deserialize)]
pub struct DealValueQuery {
    pub discount: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct DealValueResponse {
    pub deal_id: Uuid,
    pub total: f64,
    pub currency: String,
}

pub async fn get_deal_value(
    State(state): State<Arc<AppState>>,
    OwnerScope(owner_id): OwnerScope,
    RequestLocale(locale): RequestLocale,
    Path(deal_id): Path<Uuid>,
    Query(query): Query<DealValueQuery>,
) -> Result<Json<DealValueResponse>, LocalizedError> {
    let pool = state.conn.clone();
    let response = run_engine(pool, locale, move |conn| {
        let deal: CrmDeal = crm_deals::table
            .filter(crm_deals::id.eq(deal_id))
            .filter(crm_deals::owner_id.eq(owner_id))
            .first(conn)
            .optional()?
            .ok_or(CrmError::NotFound("crm.deal-not-found"))?;

        let products: Vec<CrmDealProduct> = crm_deal_products::table
            .filter(crm_deal_products::deal_id.eq(deal.id))
            .order(crm_deal_products::position.asc())
            .load(conn)?;

        let mut total = value::calculate_deal_value(&deal, &products);
        if let Some(discount) = query.discount {
            total = value::apply_discount(total, discount);
        }

        Ok(DealValueResponse {
            deal_id: deal.id,
            total,
            currency: deal.currency,
        })
    })
    .await?;

    Ok(Json(response))
}

#[derive(Debug, Deserialize)]
pub struct ApplyCadenceRequest {
    pub cadence_id: Uuid,
    pub start_date: Option<DateTime<Utc>>,
}

pub async fn apply_cadence(
    State(state): State<Arc<AppState>>,
    OwnerScope(owner_id): OwnerScope,
    RequestLocale(locale): RequestLocale,
    Path(lead_id): Path<Uuid>,
    Json(req): Json<ApplyCadenceRequest>,
) -> Result<Json<CadenceApplicationResult>, LocalizedError> {
    let pool = state.conn.clone();
    let result = run_engine(pool, locale, move |conn| {
        cadence::apply_cadence(
            conn,
            owner_id,
            lead_id,
            req.cadence_id,
            req.start_date,
            Utc::now(),
        )
    })
    .await?;

    state.views.invalidate(&[
        format!("/crm/leads/{lead_id}"),
        "/crm/calendar".to_string(),
    ]);

    Ok(Json(result))
}

async fn cadence_transition(
    state: Arc<AppState>,
    owner_id: Uuid,
    locale: Locale,
    application_id: Uuid,
    op: fn(&mut PgConnection, Uuid, Uuid, DateTime<Utc>) -> Result<CrmLeadCadence, CrmError>,
) -> Result<Json<CrmLeadCadence>, LocalizedError> {
    let pool = state.conn.clone();
    let application = run_engine(pool, locale, move |conn| {
        op(conn, owner_id, application_id, Utc::now())
    })
    .await?;

    state.views.invalidate(&[
        format!("/crm/leads/{}", application.lead_id),
        "/crm/calendar".to_string(),
    ]);

    Ok(Json(application))
}

pub async fn pause_cadence(
    State(state): State<Arc<AppState>>,
    OwnerScope(owner_id): OwnerScope,
    RequestLocale(locale): RequestLocale,
    Path(application_id): Path<Uuid>,
) -> Result<Json<CrmLeadCadence>, LocalizedError> {
    cadence_transition(state, owner_id, locale, application_id, cadence::pause_cadence).await
}

pub async fn resume_cadence(
    State(state): State<Arc<AppState>>,
    OwnerScope(owner_id): OwnerScope,
    RequestLocale(locale): RequestLocale,
    Path(application_id): Path<Uuid>,
) -> Result<Json<CrmLeadCadence>, LocalizedError> {
    cadence_transition(state, owner_id, locale, application_id, cadence::resume_cadence).await
}

pub async fn cancel_cadence(
    State(state): State<Arc<AppState>>,
    OwnerScope(owner_id): OwnerScope,
    RequestLocale(locale): RequestLocale,
    Path(application_id): Path<Uuid>,
) -> Result<Json<CrmLeadCadence>, LocalizedError> {
    cadence_transition(state, owner_id, locale, application_id, cadence::cancel_cadence).await
}

pub async fn complete_cadence(
    State(state): State<Arc<AppState>>,
    OwnerScope(owner_id): OwnerScope,
    RequestLocale(locale): RequestLocale,
    Path(application_id): Path<Uuid>,
) -> Result<Json<CrmLeadCadence>, LocalizedError> {
    cadence_transition(
        state,
        owner_id,
        locale,
        application_id,
        cadence::complete_cadence,
    )
    .await
}

pub fn configure_crm_api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/crm/leads/:id/convert", post(convert_lead))
        .route("/api/crm/leads/:id/cadences", post(apply_cadence))
        .route("/api/crm/deals/:id", delete(delete_deal))
        .route("/api/crm/deals/:id/stage", post(move_deal_stage))
        .route("/api/crm/deals/:id/value", get(get_deal_value))
        .route("/api/crm/organizations/:id", delete(delete_organization))
        .route(
            "/api/crm/cadences/applications/:id/pause",
            post(pause_cadence),
        )
        .route(
            "/api/crm/cadences/applications/:id/resume",
            post(resume_cadence),
        )
        .route(
            "/api/crm/cadences/applications/:id/cancel",
            post(cancel_cadence),
        )
        .route(
            "/api/crm/cadences/applications/:id/complete",
            post(complete_cadence),
        )
}
