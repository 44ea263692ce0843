use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::middleware::{ApiJson, AuthUser};
use crate::domain::repositories::Filter;
use crate::domain::user::{User, UserRole};
use crate::state::AppState;

use super::common::load;

/// Public view of a user; never includes the password hash
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id(),
            email: user.email().to_string(),
            full_name: user.full_name().to_string(),
            role: user.role(),
            is_active: user.is_active(),
            created_at: user.created_at(),
            last_login_at: user.last_login_at(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UserQuery {
    pub role: Option<UserRole>,
}

#[derive(Debug, Deserialize)]
pub struct RoleRequest {
    pub role: UserRole,
}

#[derive(Debug, Deserialize)]
pub struct ActiveRequest {
    pub is_active: bool,
}

/// GET /api/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    caller: AuthUser,
    Query(query): Query<UserQuery>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    caller.require_admin()?;

    let mut filter = Filter::new();
    if let Some(role) = query.role {
        filter = filter.eq("role", role);
    }
    let users = state.collection::<User>().find(filter).await?;

    Ok(Json(users.iter().map(UserResponse::from).collect()))
}

/// PATCH /api/admin/users/:id/role
pub async fn set_role(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
    ApiJson(req): ApiJson<RoleRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    caller.require_admin()?;
    if id == caller.id && req.role != UserRole::Admin {
        return Err(ApiError::bad_request("Admins cannot demote themselves"));
    }

    let mut user: User = load(&state, id, "User").await?;
    user.set_role(req.role);
    state.collection::<User>().save(&user).await?;

    tracing::info!(user_id = %id, role = %req.role, changed_by = %caller.id, "User role changed");

    Ok(Json(UserResponse::from(&user)))
}

/// PATCH /api/admin/users/:id/active
pub async fn set_active(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
    ApiJson(req): ApiJson<ActiveRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    caller.require_admin()?;
    if id == caller.id && !req.is_active {
        return Err(ApiError::bad_request("Admins cannot deactivate themselves"));
    }

    let mut user: User = load(&state, id, "User").await?;
    user.set_active(req.is_active);
    state.collection::<User>().save(&user).await?;

    Ok(Json(UserResponse::from(&user)))
}
