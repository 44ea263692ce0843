// Bearer tokens: HS256, 8-hour lifetime, user id and role as claims

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::user::UserRole;

pub const TOKEN_TTL_HOURS: i64 = 8;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Failed to sign token: {0}")]
    Sign(jsonwebtoken::errors::Error),

    #[error("{0}")]
    Invalid(jsonwebtoken::errors::Error),
}

/// JWT claims structure
///
/// The role is informational; request authorization re-reads it from the
/// stored user.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// User ID (subject)
    pub sub: Uuid,
    pub role: UserRole,
    /// Expiry timestamp (seconds since epoch)
    pub exp: usize,
}

impl Claims {
    fn issue(user_id: Uuid, role: UserRole) -> Self {
        let expiry = Utc::now() + Duration::hours(TOKEN_TTL_HOURS);
        Self {
            sub: user_id,
            role,
            exp: expiry.timestamp() as usize,
        }
    }
}

/// Signs a token for a freshly authenticated user
///
/// # Example
/// ```
/// use hackathon_api::auth::jwt::create_token;
/// use hackathon_api::domain::user::UserRole;
/// use uuid::Uuid;
///
/// let token = create_token(Uuid::new_v4(), UserRole::Participant, "your-secret-key")
///     .expect("valid token");
/// assert_eq!(token.split('.').count(), 3);
/// ```
pub fn create_token(user_id: Uuid, role: UserRole, secret: &str) -> Result<String, TokenError> {
    encode(
        &Header::default(),
        &Claims::issue(user_id, role),
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(TokenError::Sign)
}

/// Checks signature and expiry, returning the claims
///
/// ```
/// use hackathon_api::auth::jwt::{create_token, verify_token};
/// use hackathon_api::domain::user::UserRole;
/// use uuid::Uuid;
///
/// let user_id = Uuid::new_v4();
/// let token = create_token(user_id, UserRole::Judge, "s3cret").unwrap();
///
/// let claims = verify_token(&token, "s3cret").expect("valid token");
/// assert_eq!(claims.sub, user_id);
/// assert_eq!(claims.role, UserRole::Judge);
/// ```
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, TokenError> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(TokenError::Invalid)?;
    Ok(data.claims)
}
