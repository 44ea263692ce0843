use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::forms::Answers;
use crate::domain::repositories::Document;

/// A user's registration for an event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    pub id: Uuid,
    pub event_id: Uuid,
    pub user_id: Uuid,
    #[serde(default)]
    pub skills: Vec<String>,
    /// Answers to the event's registration form
    #[serde(default)]
    pub answers: Answers,
    pub registered_at: DateTime<Utc>,
}

impl Participant {
    pub fn new(event_id: Uuid, user_id: Uuid, skills: Vec<String>, answers: Answers) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_id,
            user_id,
            skills: skills
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            answers,
            registered_at: Utc::now(),
        }
    }
}

impl Document for Participant {
    const COLLECTION: &'static str = "participants";

    fn id(&self) -> Uuid {
        self.id
    }
}
