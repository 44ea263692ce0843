use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::middleware::{ApiJson, AuthUser};
use crate::domain::event::Event;
use crate::domain::partner::{NewPartner, NewPrize, Partner, PartnerUpdate, Prize, PrizeUpdate};
use crate::domain::project::Project;
use crate::domain::repositories::Filter;
use crate::state::AppState;

use super::common::{load, load_visible_event};

#[derive(Debug, Deserialize)]
pub struct PartnerQuery {
    pub event_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct AwardRequest {
    pub project_id: Uuid,
}

async fn ensure_events_exist(state: &AppState, event_ids: &[Uuid]) -> Result<(), ApiError> {
    for id in event_ids {
        load::<Event>(state, *id, "Event").await?;
    }
    Ok(())
}

async fn ensure_partner_exists(state: &AppState, partner_id: Option<Uuid>) -> Result<(), ApiError> {
    if let Some(id) = partner_id {
        load::<Partner>(state, id, "Partner").await?;
    }
    Ok(())
}

// ===== Partners =====

/// POST /api/partners
pub async fn create_partner(
    State(state): State<AppState>,
    caller: AuthUser,
    ApiJson(req): ApiJson<NewPartner>,
) -> Result<(StatusCode, Json<Partner>), ApiError> {
    caller.require_staff()?;
    ensure_events_exist(&state, &req.event_ids).await?;

    let partner = Partner::new(req)?;
    state.collection::<Partner>().insert(&partner).await?;

    tracing::info!(partner_id = %partner.id(), tier = %partner.tier(), "Partner created");

    Ok((StatusCode::CREATED, Json(partner)))
}

/// List partners, optionally only those sponsoring one event
///
/// GET /api/partners
pub async fn list_partners(
    State(state): State<AppState>,
    Query(query): Query<PartnerQuery>,
) -> Result<Json<Vec<Partner>>, ApiError> {
    let mut filter = Filter::new();
    if let Some(event_id) = query.event_id {
        filter = filter.contains("event_ids", event_id);
    }

    let mut partners = state.collection::<Partner>().find(filter).await?;
    partners.sort_by(|a, b| a.tier().cmp(&b.tier()).then_with(|| a.name().cmp(b.name())));

    Ok(Json(partners))
}

/// GET /api/partners/:id
pub async fn get_partner(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Partner>, ApiError> {
    let partner: Partner = load(&state, id, "Partner").await?;
    Ok(Json(partner))
}

/// PATCH /api/partners/:id
pub async fn update_partner(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
    ApiJson(req): ApiJson<PartnerUpdate>,
) -> Result<Json<Partner>, ApiError> {
    caller.require_staff()?;

    let mut partner: Partner = load(&state, id, "Partner").await?;
    if let Some(event_ids) = &req.event_ids {
        ensure_events_exist(&state, event_ids).await?;
    }
    partner.update(req)?;
    state.collection::<Partner>().save(&partner).await?;

    Ok(Json(partner))
}

/// Delete a partner that no prize refers to
///
/// DELETE /api/partners/:id
pub async fn delete_partner(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    caller.require_staff()?;
    load::<Partner>(&state, id, "Partner").await?;

    let sponsoring = state
        .collection::<Prize>()
        .exists(Filter::new().eq("partner_id", id))
        .await?;
    if sponsoring {
        return Err(ApiError::conflict("Partner still sponsors prizes"));
    }

    state.collection::<Partner>().delete(id).await?;

    tracing::info!(partner_id = %id, "Partner deleted");

    Ok(StatusCode::NO_CONTENT)
}

// ===== Prizes =====

/// POST /api/events/:id/prizes
pub async fn create_prize(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(event_id): Path<Uuid>,
    ApiJson(req): ApiJson<NewPrize>,
) -> Result<(StatusCode, Json<Prize>), ApiError> {
    caller.require_staff()?;
    load::<Event>(&state, event_id, "Event").await?;
    ensure_partner_exists(&state, req.partner_id).await?;

    let prize = Prize::new(event_id, req)?;
    state.collection::<Prize>().insert(&prize).await?;

    tracing::info!(prize_id = %prize.id(), event_id = %event_id, "Prize created");

    Ok((StatusCode::CREATED, Json(prize)))
}

/// GET /api/events/:id/prizes
pub async fn list_prizes(
    State(state): State<AppState>,
    caller: Option<AuthUser>,
    Path(event_id): Path<Uuid>,
) -> Result<Json<Vec<Prize>>, ApiError> {
    load_visible_event(&state, event_id, caller.as_ref()).await?;

    let prizes = state
        .collection::<Prize>()
        .find(Filter::new().eq("event_id", event_id))
        .await?;

    Ok(Json(prizes))
}

/// PATCH /api/prizes/:id
pub async fn update_prize(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
    ApiJson(req): ApiJson<PrizeUpdate>,
) -> Result<Json<Prize>, ApiError> {
    caller.require_staff()?;

    let mut prize: Prize = load(&state, id, "Prize").await?;
    ensure_partner_exists(&state, req.partner_id.flatten()).await?;
    prize.update(req)?;
    state.collection::<Prize>().save(&prize).await?;

    Ok(Json(prize))
}

/// DELETE /api/prizes/:id
pub async fn delete_prize(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    caller.require_staff()?;
    load::<Prize>(&state, id, "Prize").await?;
    state.collection::<Prize>().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Award a prize to a project of the same event
///
/// POST /api/prizes/:id/award
pub async fn award_prize(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
    ApiJson(req): ApiJson<AwardRequest>,
) -> Result<Json<Prize>, ApiError> {
    caller.require_staff()?;

    let mut prize: Prize = load(&state, id, "Prize").await?;
    let project: Project = load(&state, req.project_id, "Project").await?;
    if project.event_id() != prize.event_id() {
        return Err(ApiError::bad_request("Project is from a different event"));
    }
    if project.is_draft() {
        return Err(ApiError::bad_request("Draft projects cannot win prizes"));
    }

    prize.award(req.project_id)?;
    state.collection::<Prize>().save(&prize).await?;

    tracing::info!(prize_id = %id, project_id = %req.project_id, "Prize awarded");

    Ok(Json(prize))
}

/// DELETE /api/prizes/:id/award/:project_id
pub async fn revoke_prize(
    State(state): State<AppState>,
    caller: AuthUser,
    Path((id, project_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Prize>, ApiError> {
    caller.require_staff()?;

    let mut prize: Prize = load(&state, id, "Prize").await?;
    prize.revoke(project_id)?;
    state.collection::<Prize>().save(&prize).await?;

    tracing::info!(prize_id = %id, project_id = %project_id, "Prize award revoked");

    Ok(Json(prize))
}
