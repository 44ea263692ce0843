use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::value_objects::EventStatus;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::judging::{Criterion, Rubric};
use crate::domain::nullable;
use crate::domain::repositories::Document;

pub const DEFAULT_MAX_TEAM_SIZE: u32 = 4;

/// Input for creating an event
#[derive(Debug, Clone, Deserialize)]
pub struct NewEvent {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub location: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub registration_deadline: Option<DateTime<Utc>>,
    pub capacity: Option<u32>,
    pub max_team_size: Option<u32>,
    pub rubric: Option<Vec<Criterion>>,
}

/// Partial update of an event; absent fields are left unchanged and
/// `null` clears an optional one
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "nullable::deserialize")]
    pub location: Option<Option<String>>,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "nullable::deserialize")]
    pub registration_deadline: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "nullable::deserialize")]
    pub capacity: Option<Option<u32>>,
    pub max_team_size: Option<u32>,
    pub rubric: Option<Vec<Criterion>>,
}

/// Event aggregate root
///
/// A single hackathon with its schedule, capacity and judging rubric.
///
/// # Invariants
/// - Name cannot be empty
/// - `ends_at` is after `starts_at`
/// - Registration deadline (if any) is not after `ends_at`
/// - Capacity (if any) and max team size are positive
/// - Status only moves forward (see [`EventStatus::can_transition_to`])
/// - Concluded events are read-only
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    id: Uuid,
    name: String,
    slug: String,
    description: String,
    location: Option<String>,
    starts_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
    registration_deadline: Option<DateTime<Utc>>,
    capacity: Option<u32>,
    max_team_size: u32,
    status: EventStatus,
    rubric: Rubric,
    template_id: Option<Uuid>,
    created_by: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Event {
    /// Creates a new event in `Draft` status
    ///
    /// `slug` must already be unique; see
    /// [`unique_slug`](super::value_objects::unique_slug).
    pub fn new(details: NewEvent, slug: String, created_by: Uuid) -> DomainResult<Self> {
        let rubric = match details.rubric {
            Some(criteria) => Rubric::new(criteria)?,
            None => Rubric::default(),
        };
        let now = Utc::now();

        let event = Self {
            id: Uuid::new_v4(),
            name: details.name.trim().to_string(),
            slug,
            description: details.description,
            location: details.location,
            starts_at: details.starts_at,
            ends_at: details.ends_at,
            registration_deadline: details.registration_deadline,
            capacity: details.capacity,
            max_team_size: details.max_team_size.unwrap_or(DEFAULT_MAX_TEAM_SIZE),
            status: EventStatus::Draft,
            rubric,
            template_id: None,
            created_by,
            created_at: now,
            updated_at: now,
        };
        event.validate()?;

        Ok(event)
    }

    fn validate(&self) -> DomainResult<()> {
        if self.name.is_empty() {
            return Err(DomainError::validation("Event name cannot be empty"));
        }
        if self.ends_at <= self.starts_at {
            return Err(DomainError::validation("Event must end after it starts"));
        }
        if let Some(deadline) = self.registration_deadline {
            if deadline > self.ends_at {
                return Err(DomainError::validation(
                    "Registration deadline cannot be after the event ends",
                ));
            }
        }
        if self.capacity == Some(0) {
            return Err(DomainError::validation("Capacity must be positive"));
        }
        if self.max_team_size == 0 {
            return Err(DomainError::validation("Max team size must be at least 1"));
        }
        Ok(())
    }

    /// Applies a partial update, re-checking every invariant
    pub fn update(&mut self, update: EventUpdate) -> DomainResult<()> {
        if self.status == EventStatus::Concluded {
            return Err(DomainError::validation("Concluded events cannot be edited"));
        }

        let mut next = self.clone();
        if let Some(name) = update.name {
            next.name = name.trim().to_string();
        }
        if let Some(description) = update.description {
            next.description = description;
        }
        if let Some(location) = update.location {
            next.location = location;
        }
        if let Some(starts_at) = update.starts_at {
            next.starts_at = starts_at;
        }
        if let Some(ends_at) = update.ends_at {
            next.ends_at = ends_at;
        }
        if let Some(deadline) = update.registration_deadline {
            next.registration_deadline = deadline;
        }
        if let Some(capacity) = update.capacity {
            next.capacity = capacity;
        }
        if let Some(size) = update.max_team_size {
            next.max_team_size = size;
        }
        if let Some(criteria) = update.rubric {
            next.rubric = Rubric::new(criteria)?;
        }
        next.validate()?;
        next.updated_at = Utc::now();

        *self = next;
        Ok(())
    }

    /// Moves the event to the next lifecycle status
    pub fn transition_to(&mut self, next: EventStatus) -> DomainResult<()> {
        if !self.status.can_transition_to(next) {
            return Err(DomainError::validation(format!(
                "Cannot move event from {} to {}",
                self.status, next
            )));
        }
        self.status = next;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Checks whether one more participant may register
    ///
    /// # Business Rules
    /// - Event must be `Open`
    /// - Registration deadline (if any) must not have passed
    /// - Registered count must be below capacity (if any)
    pub fn check_registration(&self, now: DateTime<Utc>, registered: u64) -> DomainResult<()> {
        if self.status != EventStatus::Open {
            return Err(DomainError::validation(
                "Event is not open for registration",
            ));
        }
        if let Some(deadline) = self.registration_deadline {
            if now > deadline {
                return Err(DomainError::validation("Registration deadline has passed"));
            }
        }
        if let Some(capacity) = self.capacity {
            if registered >= u64::from(capacity) {
                return Err(DomainError::conflict("Event is full"));
            }
        }
        Ok(())
    }

    /// Teams may form and change while the event is open or running
    pub fn accepts_team_changes(&self) -> bool {
        matches!(self.status, EventStatus::Open | EventStatus::InProgress)
    }

    /// Projects may be submitted only while hacking is underway
    pub fn accepts_submissions(&self) -> bool {
        self.status == EventStatus::InProgress
    }

    pub fn is_public(&self) -> bool {
        self.status != EventStatus::Draft
    }

    pub fn set_template(&mut self, template_id: Option<Uuid>) {
        self.template_id = template_id;
        self.updated_at = Utc::now();
    }

    // ===== Getters =====

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn starts_at(&self) -> DateTime<Utc> {
        self.starts_at
    }

    pub fn ends_at(&self) -> DateTime<Utc> {
        self.ends_at
    }

    pub fn registration_deadline(&self) -> Option<DateTime<Utc>> {
        self.registration_deadline
    }

    pub fn capacity(&self) -> Option<u32> {
        self.capacity
    }

    pub fn max_team_size(&self) -> u32 {
        self.max_team_size
    }

    pub fn status(&self) -> EventStatus {
        self.status
    }

    pub fn rubric(&self) -> &Rubric {
        &self.rubric
    }

    pub fn template_id(&self) -> Option<Uuid> {
        self.template_id
    }

    pub fn created_by(&self) -> Uuid {
        self.created_by
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

impl Document for Event {
    const COLLECTION: &'static str = "events";

    fn id(&self) -> Uuid {
        self.id
    }
}
