// Lookups shared by several handlers

use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::middleware::AuthUser;
use crate::domain::event::{Event, Participant};
use crate::domain::repositories::{Document, Filter};
use crate::domain::team::Team;
use crate::state::AppState;

/// Fetches a document by id or fails with 404 `"<what> not found"`
pub async fn load<T: Document>(state: &AppState, id: Uuid, what: &str) -> Result<T, ApiError> {
    state
        .collection::<T>()
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("{} not found", what)))
}

/// Fetches an event, hiding drafts from everyone but staff
pub async fn load_visible_event(
    state: &AppState,
    id: Uuid,
    caller: Option<&AuthUser>,
) -> Result<Event, ApiError> {
    let event: Event = load(state, id, "Event").await?;
    if event.is_public() || caller.is_some_and(AuthUser::is_staff) {
        Ok(event)
    } else {
        Err(ApiError::not_found("Event not found"))
    }
}

pub async fn find_participant(
    state: &AppState,
    event_id: Uuid,
    user_id: Uuid,
) -> Result<Option<Participant>, ApiError> {
    Ok(state
        .collection::<Participant>()
        .find_one(Filter::new().eq("event_id", event_id).eq("user_id", user_id))
        .await?)
}

/// The team `user_id` belongs to within an event, if any
pub async fn team_of(
    state: &AppState,
    event_id: Uuid,
    user_id: Uuid,
) -> Result<Option<Team>, ApiError> {
    Ok(state
        .collection::<Team>()
        .find_one(
            Filter::new()
                .eq("event_id", event_id)
                .contains("member_ids", user_id),
        )
        .await?)
}

pub fn require_member(team: &Team, caller: &AuthUser) -> Result<(), ApiError> {
    if team.is_member(caller.id) {
        Ok(())
    } else {
        Err(ApiError::forbidden("Only team members can do this"))
    }
}

pub fn require_member_or_staff(team: &Team, caller: &AuthUser) -> Result<(), ApiError> {
    if caller.is_staff() {
        Ok(())
    } else {
        require_member(team, caller)
    }
}
