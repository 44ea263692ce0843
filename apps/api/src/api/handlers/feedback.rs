use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::middleware::{ApiJson, AuthUser};
use crate::domain::event::Event;
use crate::domain::forms::{
    summarize, Answers, FeedbackAudience, FeedbackFormConfig, FeedbackFormUpdate,
    FeedbackResponse, FeedbackSummary, FormField,
};
use crate::domain::repositories::Filter;
use crate::state::AppState;

use super::common::{find_participant, load, load_visible_event};

#[derive(Debug, Deserialize)]
pub struct CreateFeedbackFormRequest {
    pub title: String,
    pub description: Option<String>,
    pub audience: FeedbackAudience,
    pub questions: Vec<FormField>,
    #[serde(default)]
    pub is_open: bool,
}

#[derive(Debug, Deserialize)]
pub struct FeedbackAnswersRequest {
    pub answers: Answers,
}

async fn ensure_in_audience(
    state: &AppState,
    form: &FeedbackFormConfig,
    caller: &AuthUser,
) -> Result<(), ApiError> {
    let allowed = match form.audience() {
        FeedbackAudience::Everyone => true,
        FeedbackAudience::Judges => caller.role.can_judge(),
        FeedbackAudience::Participants => find_participant(state, form.event_id(), caller.id)
            .await?
            .is_some(),
    };
    if allowed {
        Ok(())
    } else {
        Err(ApiError::forbidden("This form is not addressed to you"))
    }
}

/// POST /api/events/:id/feedback-forms
pub async fn create_form(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(event_id): Path<Uuid>,
    ApiJson(req): ApiJson<CreateFeedbackFormRequest>,
) -> Result<(StatusCode, Json<FeedbackFormConfig>), ApiError> {
    caller.require_staff()?;
    load::<Event>(&state, event_id, "Event").await?;

    let mut form = FeedbackFormConfig::new(
        event_id,
        req.title,
        req.description,
        req.audience,
        req.questions,
        caller.id,
    )?;
    if req.is_open {
        form.update(
            FeedbackFormUpdate {
                is_open: Some(true),
                ..Default::default()
            },
            false,
        )?;
    }
    state.collection::<FeedbackFormConfig>().insert(&form).await?;

    tracing::info!(form_id = %form.id(), event_id = %event_id, "Feedback form created");

    Ok((StatusCode::CREATED, Json(form)))
}

/// Forms of an event; closed forms are listed for staff only
///
/// GET /api/events/:id/feedback-forms
pub async fn list_forms(
    State(state): State<AppState>,
    caller: Option<AuthUser>,
    Path(event_id): Path<Uuid>,
) -> Result<Json<Vec<FeedbackFormConfig>>, ApiError> {
    load_visible_event(&state, event_id, caller.as_ref()).await?;

    let staff = caller.as_ref().is_some_and(AuthUser::is_staff);
    let forms = state
        .collection::<FeedbackFormConfig>()
        .find(Filter::new().eq("event_id", event_id))
        .await?
        .into_iter()
        .filter(|f| staff || f.is_open())
        .collect();

    Ok(Json(forms))
}

/// GET /api/feedback-forms/:id
pub async fn get_form(
    State(state): State<AppState>,
    caller: Option<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<FeedbackFormConfig>, ApiError> {
    let form: FeedbackFormConfig = load(&state, id, "Feedback form").await?;
    let staff = caller.as_ref().is_some_and(AuthUser::is_staff);
    if !staff && !form.is_open() {
        return Err(ApiError::not_found("Feedback form not found"));
    }
    Ok(Json(form))
}

/// PATCH /api/feedback-forms/:id
pub async fn update_form(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
    ApiJson(req): ApiJson<FeedbackFormUpdate>,
) -> Result<Json<FeedbackFormConfig>, ApiError> {
    caller.require_staff()?;

    let mut form: FeedbackFormConfig = load(&state, id, "Feedback form").await?;
    let has_responses = state
        .collection::<FeedbackResponse>()
        .exists(Filter::new().eq("form_id", id))
        .await?;
    form.update(req, has_responses)?;
    state.collection::<FeedbackFormConfig>().save(&form).await?;

    Ok(Json(form))
}

/// Delete a form together with its responses
///
/// DELETE /api/feedback-forms/:id
pub async fn delete_form(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    caller.require_staff()?;
    load::<FeedbackFormConfig>(&state, id, "Feedback form").await?;

    let removed = state
        .collection::<FeedbackResponse>()
        .delete_many(Filter::new().eq("form_id", id))
        .await?;
    state.collection::<FeedbackFormConfig>().delete(id).await?;

    tracing::info!(form_id = %id, responses = removed, "Feedback form deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/feedback-forms/:id/responses
pub async fn submit_response(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
    ApiJson(req): ApiJson<FeedbackAnswersRequest>,
) -> Result<(StatusCode, Json<FeedbackResponse>), ApiError> {
    let form: FeedbackFormConfig = load(&state, id, "Feedback form").await?;
    ensure_in_audience(&state, &form, &caller).await?;

    let responses = state.collection::<FeedbackResponse>();
    let answered = responses
        .exists(Filter::new().eq("form_id", id).eq("respondent_id", caller.id))
        .await?;
    if answered {
        return Err(ApiError::conflict("You already answered this form"));
    }

    form.accept(&req.answers)?;

    let response = FeedbackResponse::new(&form, caller.id, req.answers);
    responses.insert(&response).await?;

    tracing::debug!(form_id = %id, respondent_id = %caller.id, "Feedback recorded");

    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /api/feedback-forms/:id/summary
pub async fn form_summary(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<FeedbackSummary>, ApiError> {
    caller.require_staff()?;

    let form: FeedbackFormConfig = load(&state, id, "Feedback form").await?;
    let responses = state
        .collection::<FeedbackResponse>()
        .find(Filter::new().eq("form_id", id))
        .await?;

    Ok(Json(summarize(&form, &responses)))
}
