use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::middleware::{ApiJson, AuthUser, OptionalJson};
use crate::domain::event::{Event, Participant};
use crate::domain::forms::{Answers, FormField, RegistrationFormConfig};
use crate::domain::repositories::Filter;
use crate::domain::user::User;
use crate::infrastructure::email::EmailMessage;
use crate::state::AppState;

use super::common::{find_participant, load, load_visible_event, team_of};

#[derive(Debug, Deserialize)]
pub struct RegistrationFormRequest {
    pub fields: Vec<FormField>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub answers: Answers,
}

async fn registration_form(
    state: &AppState,
    event_id: Uuid,
) -> Result<RegistrationFormConfig, ApiError> {
    Ok(state
        .collection::<RegistrationFormConfig>()
        .find_by_id(event_id)
        .await?
        .unwrap_or_else(|| RegistrationFormConfig::empty(event_id)))
}

/// Replace the event's registration questions
///
/// PUT /api/events/:id/registration-form
pub async fn put_registration_form(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(event_id): Path<Uuid>,
    ApiJson(req): ApiJson<RegistrationFormRequest>,
) -> Result<Json<RegistrationFormConfig>, ApiError> {
    caller.require_staff()?;
    load::<Event>(&state, event_id, "Event").await?;

    let form = RegistrationFormConfig::new(event_id, req.fields)?;
    state.collection::<RegistrationFormConfig>().save(&form).await?;

    Ok(Json(form))
}

/// GET /api/events/:id/registration-form
pub async fn get_registration_form(
    State(state): State<AppState>,
    caller: Option<AuthUser>,
    Path(event_id): Path<Uuid>,
) -> Result<Json<RegistrationFormConfig>, ApiError> {
    load_visible_event(&state, event_id, caller.as_ref()).await?;
    Ok(Json(registration_form(&state, event_id).await?))
}

/// Register the caller for an event
///
/// POST /api/events/:id/register
///
/// # Business Rules
/// - A user registers at most once per event
/// - The event must be open, before its deadline and below capacity
/// - Answers must satisfy the event's registration form
pub async fn register(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(event_id): Path<Uuid>,
    OptionalJson(req): OptionalJson<RegisterRequest>,
) -> Result<(StatusCode, Json<Participant>), ApiError> {
    let event = load_visible_event(&state, event_id, Some(&caller)).await?;

    if find_participant(&state, event_id, caller.id).await?.is_some() {
        return Err(ApiError::conflict("Already registered for this event"));
    }

    let participants = state.collection::<Participant>();
    let registered = participants
        .count(Filter::new().eq("event_id", event_id))
        .await?;
    event.check_registration(Utc::now(), registered)?;

    registration_form(&state, event_id).await?.validate(&req.answers)?;

    let participant = Participant::new(event_id, caller.id, req.skills, req.answers);
    participants.insert(&participant).await?;

    tracing::info!(event_id = %event_id, user_id = %caller.id, "Participant registered");

    let user: User = load(&state, caller.id, "User").await?;
    state
        .notify(EmailMessage::new(
            user.email().as_str(),
            format!("You're registered for {}", event.name()),
            format!(
                "Hi {},\n\nYour spot at {} is confirmed. Hacking starts {}.\n",
                user.full_name(),
                event.name(),
                event.starts_at().format("%B %-d, %Y at %H:%M UTC")
            ),
        ))
        .await;

    Ok((StatusCode::CREATED, Json(participant)))
}

/// Withdraw the caller's registration
///
/// DELETE /api/events/:id/register
pub async fn withdraw(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(event_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let participant = find_participant(&state, event_id, caller.id)
        .await?
        .ok_or_else(|| ApiError::not_found("Not registered for this event"))?;

    if team_of(&state, event_id, caller.id).await?.is_some() {
        return Err(ApiError::bad_request("Leave your team before withdrawing"));
    }

    state.collection::<Participant>().delete(participant.id).await?;

    tracing::info!(event_id = %event_id, user_id = %caller.id, "Registration withdrawn");

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/events/:id/participants
pub async fn list_participants(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(event_id): Path<Uuid>,
) -> Result<Json<Vec<Participant>>, ApiError> {
    caller.require_staff()?;
    load::<Event>(&state, event_id, "Event").await?;

    let participants = state
        .collection::<Participant>()
        .find(Filter::new().eq("event_id", event_id))
        .await?;

    Ok(Json(participants))
}
