use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::value_objects::{Email, UserRole};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::repositories::Document;

/// Platform account
///
/// # Invariants
/// - Full name cannot be blank
/// - Email is validated and lowercased (see [`Email`])
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    id: Uuid,
    email: Email,
    password_hash: String,
    full_name: String,
    role: UserRole,
    is_active: bool,
    created_at: DateTime<Utc>,
    last_login_at: Option<DateTime<Utc>>,
}

impl User {
    /// Creates a new active user
    ///
    /// The password must already be hashed.
    pub fn new(
        email: Email,
        password_hash: String,
        full_name: String,
        role: UserRole,
    ) -> DomainResult<Self> {
        let full_name = full_name.trim().to_string();
        if full_name.is_empty() {
            return Err(DomainError::validation("Full name cannot be empty"));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            email,
            password_hash,
            full_name,
            role,
            is_active: true,
            created_at: Utc::now(),
            last_login_at: None,
        })
    }

    pub fn record_login(&mut self) {
        self.last_login_at = Some(Utc::now());
    }

    pub fn set_role(&mut self, role: UserRole) {
        self.role = role;
    }

    pub fn set_active(&mut self, active: bool) {
        self.is_active = active;
    }

    // ===== Getters =====

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn role(&self) -> UserRole {
        self.role
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn last_login_at(&self) -> Option<DateTime<Utc>> {
        self.last_login_at
    }
}

impl Document for User {
    const COLLECTION: &'static str = "users";

    fn id(&self) -> Uuid {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email() -> Email {
        Email::new("ada@example.com").unwrap()
    }

    #[test]
    fn create_user() {
        let user = User::new(email(), "hash".into(), "Ada Lovelace".into(), UserRole::Participant)
            .unwrap();

        assert_eq!(user.full_name(), "Ada Lovelace");
        assert_eq!(user.role(), UserRole::Participant);
        assert!(user.is_active());
        assert!(user.last_login_at().is_none());
    }

    #[test]
    fn blank_name_rejected() {
        let result = User::new(email(), "hash".into(), "   ".into(), UserRole::Participant);
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn record_login_sets_timestamp() {
        let mut user =
            User::new(email(), "hash".into(), "Ada".into(), UserRole::Judge).unwrap();
        user.record_login();
        assert!(user.last_login_at().is_some());
    }

    #[test]
    fn round_trips_through_json() {
        let user = User::new(email(), "hash".into(), "Ada".into(), UserRole::Admin).unwrap();
        let json = serde_json::to_value(&user).unwrap();

        assert_eq!(json["role"], "admin");
        assert_eq!(json["email"], "ada@example.com");

        let back: User = serde_json::from_value(json).unwrap();
        assert_eq!(back.id(), user.id());
    }
}
