use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::middleware::AuthUser;
use crate::domain::analytics::{
    event_analytics, global_analytics, EventAnalytics, EventSnapshot, GlobalAnalytics,
    PlatformSnapshot,
};
use crate::domain::cluster::AtlasCluster;
use crate::domain::event::{Event, Participant};
use crate::domain::forms::FeedbackResponse;
use crate::domain::judging::{JudgeAssignment, Score};
use crate::domain::project::Project;
use crate::domain::repositories::Filter;
use crate::domain::team::Team;
use crate::domain::user::User;
use crate::state::AppState;

use super::common::load;

/// GET /api/admin/analytics
pub async fn platform_analytics(
    State(state): State<AppState>,
    caller: AuthUser,
) -> Result<Json<GlobalAnalytics>, ApiError> {
    caller.require_staff()?;

    let users = state.collection::<User>().all().await?;
    let events = state.collection::<Event>().all().await?;
    let teams = state.collection::<Team>().all().await?;
    let projects = state.collection::<Project>().all().await?;
    let scores = state.collection::<Score>().all().await?;
    let clusters = state.collection::<AtlasCluster>().all().await?;

    let snapshot = PlatformSnapshot {
        users: &users,
        events: &events,
        registrations: state.collection::<Participant>().count(Filter::new()).await?,
        teams: &teams,
        projects: &projects,
        scores: &scores,
        feedback_responses: state
            .collection::<FeedbackResponse>()
            .count(Filter::new())
            .await?,
        clusters: &clusters,
    };

    Ok(Json(global_analytics(&snapshot)))
}

/// GET /api/admin/analytics/events/:id
pub async fn event_dashboard(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(event_id): Path<Uuid>,
) -> Result<Json<EventAnalytics>, ApiError> {
    caller.require_staff()?;
    load::<Event>(&state, event_id, "Event").await?;

    let scoped = || Filter::new().eq("event_id", event_id);
    let participants = state.collection::<Participant>().find(scoped()).await?;
    let teams = state.collection::<Team>().find(scoped()).await?;
    let projects = state.collection::<Project>().find(scoped()).await?;
    let assignments = state.collection::<JudgeAssignment>().find(scoped()).await?;
    let scores = state.collection::<Score>().find(scoped()).await?;
    let feedback_responses = state.collection::<FeedbackResponse>().count(scoped()).await?;

    let snapshot = EventSnapshot {
        event_id,
        participants: &participants,
        teams: &teams,
        projects: &projects,
        assignments: &assignments,
        scores: &scores,
        feedback_responses,
    };

    Ok(Json(event_analytics(&snapshot)))
}
