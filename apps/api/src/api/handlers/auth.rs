use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::handlers::users::UserResponse;
use crate::api::middleware::{ApiJson, AuthUser};
use crate::auth::jwt::create_token;
use crate::auth::password::{hash_password, verify_password, MIN_PASSWORD_LEN};
use crate::domain::repositories::Filter;
use crate::domain::user::{Email, User, UserRole};
use crate::state::AppState;

use super::common::load;

/// Request body for user registration
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
}

/// Response from successful registration
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user_id: Uuid,
    pub message: String,
}

/// Request body for user login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response from successful login
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user_id: Uuid,
    pub role: UserRole,
}

/// Register a new user
///
/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let email = Email::new(&req.email).map_err(ApiError::bad_request)?;

    if req.password.len() < MIN_PASSWORD_LEN {
        return Err(ApiError::bad_request(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }

    let users = state.collection::<User>();
    if users.exists(Filter::new().eq("email", email.as_str())).await? {
        return Err(ApiError::conflict("Email already registered"));
    }

    let role = if state.config.is_admin_email(email.as_str()) {
        UserRole::Admin
    } else {
        UserRole::Participant
    };

    let password_hash = hash_password(&req.password, state.config.bcrypt_cost)
        .map_err(|e| ApiError::internal_server_error(format!("Failed to hash password: {}", e)))?;

    let user = User::new(email, password_hash, req.full_name, role)?;
    users.insert(&user).await?;

    tracing::info!(user_id = %user.id(), role = %role, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            user_id: user.id(),
            message: "User registered successfully".to_string(),
        }),
    ))
}

/// Login with email and password
///
/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let email = Email::new(&req.email).map_err(ApiError::bad_request)?;

    let users = state.collection::<User>();
    let mut user = users
        .find_one(Filter::new().eq("email", email.as_str()))
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid credentials"))?;

    if !user.is_active() {
        return Err(ApiError::unauthorized("Account is disabled"));
    }

    let valid = verify_password(&req.password, user.password_hash()).map_err(|e| {
        ApiError::internal_server_error(format!("Password verification failed: {}", e))
    })?;

    if !valid {
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    user.record_login();
    users.save(&user).await?;

    let token = create_token(user.id(), user.role(), &state.config.jwt_secret)
        .map_err(|e| ApiError::internal_server_error(format!("Failed to create token: {}", e)))?;

    Ok(Json(LoginResponse {
        token,
        user_id: user.id(),
        role: user.role(),
    }))
}

/// The caller's own profile
///
/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    caller: AuthUser,
) -> Result<Json<UserResponse>, ApiError> {
    let user: User = load(&state, caller.id, "User").await?;
    Ok(Json(UserResponse::from(&user)))
}

/// Health check endpoint
///
/// GET /health
pub async fn health_check() -> &'static str {
    "OK"
}
