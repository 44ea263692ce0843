use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::value_objects::ClusterStatus;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::repositories::Document;

const MAX_NAME_LEN: usize = 64;

/// Derives a provider-safe cluster name from a team name
///
/// Lowercase ASCII letters, digits and single hyphens, suffixed with the
/// first eight hex digits of the team id so names stay unique.
pub fn cluster_name(team_name: &str, team_id: Uuid) -> String {
    let mut base = String::new();
    for c in team_name.chars() {
        if c.is_ascii_alphanumeric() {
            base.push(c.to_ascii_lowercase());
        } else if !base.is_empty() && !base.ends_with('-') {
            base.push('-');
        }
    }
    let suffix = team_id.simple().to_string()[..8].to_string();
    let budget = MAX_NAME_LEN - suffix.len() - 1;
    base.truncate(budget);
    let base = base.trim_end_matches('-');

    if base.is_empty() {
        format!("team-{}", suffix)
    } else {
        format!("{}-{}", base, suffix)
    }
}

/// A free-tier database cluster provisioned for a team during an event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtlasCluster {
    id: Uuid,
    team_id: Uuid,
    event_id: Uuid,
    name: String,
    region: String,
    status: ClusterStatus,
    connection_string: Option<String>,
    created_by: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AtlasCluster {
    /// Records a cluster whose creation was accepted by the provider
    pub fn new(team_id: Uuid, event_id: Uuid, name: String, region: String, created_by: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            team_id,
            event_id,
            name,
            region,
            status: ClusterStatus::Creating,
            connection_string: None,
            created_by,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies a status observed at the provider
    pub fn refresh(&mut self, status: ClusterStatus, connection_string: Option<String>) {
        self.status = status;
        if connection_string.is_some() {
            self.connection_string = connection_string;
        }
        self.updated_at = Utc::now();
    }

    pub fn mark_deleted(&mut self) -> DomainResult<()> {
        if self.status == ClusterStatus::Deleted {
            return Err(DomainError::conflict("Cluster is already deleted"));
        }
        self.status = ClusterStatus::Deleted;
        self.connection_string = None;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Anything not yet deleted counts against the one-per-team limit
    pub fn is_active(&self) -> bool {
        self.status != ClusterStatus::Deleted
    }

    // ===== Getters =====

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn team_id(&self) -> Uuid {
        self.team_id
    }

    pub fn event_id(&self) -> Uuid {
        self.event_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn status(&self) -> ClusterStatus {
        self.status
    }

    pub fn connection_string(&self) -> Option<&str> {
        self.connection_string.as_deref()
    }

    pub fn created_by(&self) -> Uuid {
        self.created_by
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Document for AtlasCluster {
    const COLLECTION: &'static str = "clusters";

    fn id(&self) -> Uuid {
        self.id
    }
}
