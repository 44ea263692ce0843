use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::middleware::{ApiJson, AuthUser};
use crate::domain::event::{slugify, unique_slug, Event, EventStatus, EventUpdate, NewEvent};
use crate::domain::forms::{FeedbackFormConfig, FeedbackResponse, RegistrationFormConfig};
use crate::domain::partner::{Partner, Prize};
use crate::domain::repositories::Filter;
use crate::domain::template::Template;
use crate::state::AppState;

use super::common::{load, load_visible_event};

#[derive(Debug, Deserialize)]
pub struct EventQuery {
    pub status: Option<EventStatus>,
}

#[derive(Debug, Deserialize)]
pub struct TransitionRequest {
    pub status: EventStatus,
}

#[derive(Debug, Deserialize)]
pub struct AttachTemplateRequest {
    pub template_id: Option<Uuid>,
}

/// Create an event in draft status
///
/// POST /api/events
pub async fn create_event(
    State(state): State<AppState>,
    caller: AuthUser,
    ApiJson(req): ApiJson<NewEvent>,
) -> Result<(StatusCode, Json<Event>), ApiError> {
    caller.require_staff()?;

    let events = state.collection::<Event>();
    let taken: Vec<String> = events
        .all()
        .await?
        .iter()
        .map(|e| e.slug().to_string())
        .collect();
    let slug = unique_slug(&slugify(&req.name), &taken);

    let event = Event::new(req, slug, caller.id)?;
    events.insert(&event).await?;

    tracing::info!(event_id = %event.id(), slug = %event.slug(), "Event created");

    Ok((StatusCode::CREATED, Json(event)))
}

/// List events; drafts are visible to staff only
///
/// GET /api/events
pub async fn list_events(
    State(state): State<AppState>,
    caller: Option<AuthUser>,
    Query(query): Query<EventQuery>,
) -> Result<Json<Vec<Event>>, ApiError> {
    let mut filter = Filter::new();
    if let Some(status) = query.status {
        filter = filter.eq("status", status);
    }

    let staff = caller.as_ref().is_some_and(AuthUser::is_staff);
    let events = state
        .collection::<Event>()
        .find(filter)
        .await?
        .into_iter()
        .filter(|e| staff || e.is_public())
        .collect();

    Ok(Json(events))
}

/// GET /api/events/:id
pub async fn get_event(
    State(state): State<AppState>,
    caller: Option<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Event>, ApiError> {
    let event = load_visible_event(&state, id, caller.as_ref()).await?;
    Ok(Json(event))
}

/// PATCH /api/events/:id
pub async fn update_event(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
    ApiJson(req): ApiJson<EventUpdate>,
) -> Result<Json<Event>, ApiError> {
    caller.require_staff()?;

    let mut event: Event = load(&state, id, "Event").await?;
    event.update(req)?;
    state.collection::<Event>().save(&event).await?;

    Ok(Json(event))
}

/// Move an event one step along its lifecycle
///
/// POST /api/events/:id/status
pub async fn transition_event(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
    ApiJson(req): ApiJson<TransitionRequest>,
) -> Result<Json<Event>, ApiError> {
    caller.require_staff()?;

    let mut event: Event = load(&state, id, "Event").await?;
    let from = event.status();
    event.transition_to(req.status)?;
    state.collection::<Event>().save(&event).await?;

    tracing::info!(event_id = %id, from = %from, to = %req.status, "Event status changed");

    Ok(Json(event))
}

/// Delete a draft event and its registration form
///
/// DELETE /api/events/:id
pub async fn delete_event(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    caller.require_admin()?;

    let event: Event = load(&state, id, "Event").await?;
    if event.status() != EventStatus::Draft {
        return Err(ApiError::bad_request("Only draft events can be deleted"));
    }

    state.collection::<Event>().delete(id).await?;

    // Everything scoped to the event goes with it
    let scoped = Filter::new().eq("event_id", id);
    state
        .collection::<RegistrationFormConfig>()
        .delete_many(scoped.clone())
        .await?;
    let prizes = state.collection::<Prize>().delete_many(scoped.clone()).await?;
    let responses = state
        .collection::<FeedbackResponse>()
        .delete_many(scoped.clone())
        .await?;
    let forms = state
        .collection::<FeedbackFormConfig>()
        .delete_many(scoped)
        .await?;

    let partners = state.collection::<Partner>();
    for mut partner in partners
        .find(Filter::new().contains("event_ids", id))
        .await?
    {
        if partner.drop_event(id) {
            partners.save(&partner).await?;
        }
    }

    tracing::info!(event_id = %id, prizes, forms, responses, "Event deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Attach (or detach, with `null`) a landing-page template
///
/// PUT /api/events/:id/template
pub async fn attach_template(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
    ApiJson(req): ApiJson<AttachTemplateRequest>,
) -> Result<Json<Event>, ApiError> {
    caller.require_staff()?;

    let mut event: Event = load(&state, id, "Event").await?;
    if let Some(template_id) = req.template_id {
        load::<Template>(&state, template_id, "Template").await?;
    }
    event.set_template(req.template_id);
    state.collection::<Event>().save(&event).await?;

    Ok(Json(event))
}
