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
use crate::domain::project::Project;
use crate::domain::repositories::Filter;
use crate::domain::team::{Team, TeamEvent, TeamUpdate};
use crate::domain::user::User;
use crate::infrastructure::email::EmailMessage;
use crate::state::AppState;

use super::common::{find_participant, load, load_visible_event, require_member, team_of};

/// Request body for creating a team
#[derive(Debug, Deserialize)]
pub struct CreateTeamRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TeamQuery {
    pub looking_for_members: Option<bool>,
}

fn ensure_team_changes_allowed(event: &Event) -> Result<(), ApiError> {
    if event.accepts_team_changes() {
        Ok(())
    } else {
        Err(ApiError::bad_request(format!(
            "Teams cannot change while the event is {}",
            event.status()
        )))
    }
}

async fn ensure_registered(state: &AppState, event_id: Uuid, user_id: Uuid) -> Result<(), ApiError> {
    match find_participant(state, event_id, user_id).await? {
        Some(_) => Ok(()),
        None => Err(ApiError::forbidden("Register for the event first")),
    }
}

/// Logs team events and emails the people they concern
async fn announce(state: &AppState, team: &Team, events: &[TeamEvent]) {
    for event in events {
        tracing::info!(team_id = %event.team_id(), ?event, "Team event");

        let message = match event {
            TeamEvent::MemberJoined { user_id, .. } => Some((
                team.leader_id(),
                format!("New member in {}", team.name()),
                format!("A new member ({}) joined your team {}.", user_id, team.name()),
            )),
            TeamEvent::LeadershipTransferred { to, .. } => Some((
                *to,
                format!("You now lead {}", team.name()),
                format!("The previous leader left, so you now lead {}.", team.name()),
            )),
            _ => None,
        };

        if let Some((recipient, subject, body)) = message {
            match state.collection::<User>().find_by_id(recipient).await {
                Ok(Some(user)) => {
                    state
                        .notify(EmailMessage::new(user.email().as_str(), subject, body))
                        .await
                }
                Ok(None) => {}
                Err(e) => tracing::warn!(error = %e, "Could not load notification recipient"),
            }
        }
    }
}

/// Create a team led by the caller
///
/// POST /api/events/:id/teams
pub async fn create_team(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(event_id): Path<Uuid>,
    ApiJson(req): ApiJson<CreateTeamRequest>,
) -> Result<(StatusCode, Json<Team>), ApiError> {
    let event = load_visible_event(&state, event_id, Some(&caller)).await?;
    ensure_team_changes_allowed(&event)?;
    ensure_registered(&state, event_id, caller.id).await?;

    if team_of(&state, event_id, caller.id).await?.is_some() {
        return Err(ApiError::conflict("Already on a team for this event"));
    }

    let (team, events) = Team::new(event_id, req.name, req.description, caller.id)?;
    state.collection::<Team>().insert(&team).await?;
    announce(&state, &team, &events).await;

    Ok((StatusCode::CREATED, Json(team)))
}

/// GET /api/events/:id/teams
pub async fn list_teams(
    State(state): State<AppState>,
    caller: Option<AuthUser>,
    Path(event_id): Path<Uuid>,
    Query(query): Query<TeamQuery>,
) -> Result<Json<Vec<Team>>, ApiError> {
    load_visible_event(&state, event_id, caller.as_ref()).await?;

    let mut filter = Filter::new().eq("event_id", event_id);
    if let Some(looking) = query.looking_for_members {
        filter = filter.eq("looking_for_members", looking);
    }

    Ok(Json(state.collection::<Team>().find(filter).await?))
}

/// GET /api/teams/:id
pub async fn get_team(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Team>, ApiError> {
    let team: Team = load(&state, id, "Team").await?;
    Ok(Json(team))
}

/// PATCH /api/teams/:id
pub async fn update_team(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
    ApiJson(req): ApiJson<TeamUpdate>,
) -> Result<Json<Team>, ApiError> {
    let mut team: Team = load(&state, id, "Team").await?;
    if !team.is_leader(caller.id) {
        return Err(ApiError::forbidden("Only the team leader can update the team"));
    }

    team.update(req)?;
    state.collection::<Team>().save(&team).await?;

    Ok(Json(team))
}

/// POST /api/teams/:id/join
pub async fn join_team(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Team>, ApiError> {
    let mut team: Team = load(&state, id, "Team").await?;
    let event: Event = load(&state, team.event_id(), "Event").await?;
    ensure_team_changes_allowed(&event)?;
    ensure_registered(&state, event.id(), caller.id).await?;

    if let Some(current) = team_of(&state, event.id(), caller.id).await? {
        if current.id() != team.id() {
            return Err(ApiError::conflict("Already on a team for this event"));
        }
    }

    let joined = team.add_member(caller.id, event.max_team_size())?;
    state.collection::<Team>().save(&team).await?;
    announce(&state, &team, &[joined]).await;

    Ok(Json(team))
}

/// Leave a team; the last member out disbands it
///
/// POST /api/teams/:id/leave
pub async fn leave_team(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let mut team: Team = load(&state, id, "Team").await?;
    require_member(&team, &caller)?;

    let projects = state.collection::<Project>();
    let project = projects.find_one(Filter::new().eq("team_id", id)).await?;

    let events = team.remove_member(caller.id)?;
    if team.is_disbanded() {
        if let Some(project) = &project {
            if !project.is_draft() {
                return Err(ApiError::bad_request(
                    "The last member cannot leave a team with a submitted project",
                ));
            }
            projects.delete(project.id()).await?;
        }
        state.collection::<Team>().delete(id).await?;
    } else {
        state.collection::<Team>().save(&team).await?;
    }
    announce(&state, &team, &events).await;

    Ok(StatusCode::NO_CONTENT)
}
