use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::field::{validate_answers, validate_fields, Answers, FormField};
use crate::domain::errors::DomainResult;
use crate::domain::repositories::Document;

/// Extra questions asked when a participant registers for an event
///
/// One configuration exists per event; its id is the event id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationFormConfig {
    event_id: Uuid,
    fields: Vec<FormField>,
    updated_at: DateTime<Utc>,
}

impl RegistrationFormConfig {
    pub fn new(event_id: Uuid, fields: Vec<FormField>) -> DomainResult<Self> {
        validate_fields(&fields)?;
        Ok(Self {
            event_id,
            fields,
            updated_at: Utc::now(),
        })
    }

    /// A form with no extra questions
    pub fn empty(event_id: Uuid) -> Self {
        Self {
            event_id,
            fields: Vec::new(),
            updated_at: Utc::now(),
        }
    }

    pub fn validate(&self, answers: &Answers) -> DomainResult<()> {
        validate_answers(&self.fields, answers)
    }

    pub fn event_id(&self) -> Uuid {
        self.event_id
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

impl Document for RegistrationFormConfig {
    const COLLECTION: &'static str = "registration_forms";

    fn id(&self) -> Uuid {
        self.event_id
    }
}
