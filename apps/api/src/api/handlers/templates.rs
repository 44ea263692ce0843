use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::middleware::{ApiJson, AuthUser};
use crate::domain::event::Event;
use crate::domain::partner::{Partner, Prize};
use crate::domain::repositories::Filter;
use crate::domain::template::{render, NewTemplate, RenderedPage, Template, TemplateUpdate};
use crate::state::AppState;

use super::common::load;

/// POST /api/templates
pub async fn create_template(
    State(state): State<AppState>,
    caller: AuthUser,
    ApiJson(req): ApiJson<NewTemplate>,
) -> Result<(StatusCode, Json<Template>), ApiError> {
    caller.require_staff()?;

    let template = Template::new(req, caller.id)?;
    state.collection::<Template>().insert(&template).await?;

    tracing::info!(template_id = %template.id(), "Template created");

    Ok((StatusCode::CREATED, Json(template)))
}

/// GET /api/templates
pub async fn list_templates(
    State(state): State<AppState>,
) -> Result<Json<Vec<Template>>, ApiError> {
    Ok(Json(state.collection::<Template>().all().await?))
}

/// GET /api/templates/:id
pub async fn get_template(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Template>, ApiError> {
    let template: Template = load(&state, id, "Template").await?;
    Ok(Json(template))
}

/// PATCH /api/templates/:id
pub async fn update_template(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
    ApiJson(req): ApiJson<TemplateUpdate>,
) -> Result<Json<Template>, ApiError> {
    caller.require_staff()?;

    let mut template: Template = load(&state, id, "Template").await?;
    template.update(req)?;
    state.collection::<Template>().save(&template).await?;

    Ok(Json(template))
}

/// Delete a template no event uses
///
/// DELETE /api/templates/:id
pub async fn delete_template(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    caller.require_staff()?;
    load::<Template>(&state, id, "Template").await?;

    let in_use = state
        .collection::<Event>()
        .exists(Filter::new().eq("template_id", id))
        .await?;
    if in_use {
        return Err(ApiError::conflict("Template is attached to an event"));
    }

    state.collection::<Template>().delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/templates/:id/clone
pub async fn clone_template(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<Template>), ApiError> {
    caller.require_staff()?;

    let source: Template = load(&state, id, "Template").await?;
    let copy = source.clone_for(caller.id);
    state.collection::<Template>().insert(&copy).await?;

    tracing::info!(source_id = %id, template_id = %copy.id(), "Template cloned");

    Ok((StatusCode::CREATED, Json(copy)))
}

/// Public landing page of an event
///
/// GET /api/public/events/:slug/landing
pub async fn landing_page(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<RenderedPage>, ApiError> {
    let not_found = || ApiError::not_found("Landing page not found");

    let event = state
        .collection::<Event>()
        .find_one(Filter::new().eq("slug", &slug))
        .await?
        .filter(Event::is_public)
        .ok_or_else(not_found)?;
    let template_id = event.template_id().ok_or_else(not_found)?;
    let template = state
        .collection::<Template>()
        .find_by_id(template_id)
        .await?
        .ok_or_else(not_found)?;

    let prizes = state
        .collection::<Prize>()
        .find(Filter::new().eq("event_id", event.id()))
        .await?;
    let partners = state
        .collection::<Partner>()
        .find(Filter::new().contains("event_ids", event.id()))
        .await?;

    Ok(Json(render(&template, &event, &prizes, &partners)))
}
