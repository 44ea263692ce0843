use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::repositories::Document;

/// Sponsorship level, highest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartnerTier {
    Platinum,
    Gold,
    Silver,
    Bronze,
    Community,
}

impl std::fmt::Display for PartnerTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PartnerTier::Platinum => write!(f, "platinum"),
            PartnerTier::Gold => write!(f, "gold"),
            PartnerTier::Silver => write!(f, "silver"),
            PartnerTier::Bronze => write!(f, "bronze"),
            PartnerTier::Community => write!(f, "community"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewPartner {
    pub name: String,
    pub tier: PartnerTier,
    pub website: Option<String>,
    pub logo_url: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub event_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PartnerUpdate {
    pub name: Option<String>,
    pub tier: Option<PartnerTier>,
    pub website: Option<String>,
    pub logo_url: Option<String>,
    pub description: Option<String>,
    pub event_ids: Option<Vec<Uuid>>,
}

fn unique(ids: Vec<Uuid>) -> Vec<Uuid> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

/// Sponsor organisation backing one or more events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Partner {
    id: Uuid,
    name: String,
    tier: PartnerTier,
    website: Option<String>,
    logo_url: Option<String>,
    description: Option<String>,
    event_ids: Vec<Uuid>,
    created_at: DateTime<Utc>,
}

impl Partner {
    pub fn new(details: NewPartner) -> DomainResult<Self> {
        let name = details.name.trim().to_string();
        if name.is_empty() {
            return Err(DomainError::validation("Partner name cannot be empty"));
        }

        let event_ids = unique(details.event_ids);

        Ok(Self {
            id: Uuid::new_v4(),
            name,
            tier: details.tier,
            website: details.website,
            logo_url: details.logo_url,
            description: details.description,
            event_ids,
            created_at: Utc::now(),
        })
    }

    pub fn update(&mut self, update: PartnerUpdate) -> DomainResult<()> {
        if let Some(name) = &update.name {
            if name.trim().is_empty() {
                return Err(DomainError::validation("Partner name cannot be empty"));
            }
        }

        if let Some(name) = update.name {
            self.name = name.trim().to_string();
        }
        if let Some(tier) = update.tier {
            self.tier = tier;
        }
        if let Some(website) = update.website {
            self.website = Some(website);
        }
        if let Some(logo_url) = update.logo_url {
            self.logo_url = Some(logo_url);
        }
        if let Some(description) = update.description {
            self.description = Some(description);
        }
        if let Some(event_ids) = update.event_ids {
            self.event_ids = unique(event_ids);
        }
        Ok(())
    }

    pub fn sponsors(&self, event_id: Uuid) -> bool {
        self.event_ids.contains(&event_id)
    }

    /// Unlinks an event; returns whether it was linked
    pub fn drop_event(&mut self, event_id: Uuid) -> bool {
        let before = self.event_ids.len();
        self.event_ids.retain(|id| *id != event_id);
        self.event_ids.len() != before
    }

    // ===== Getters =====

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tier(&self) -> PartnerTier {
        self.tier
    }

    pub fn website(&self) -> Option<&str> {
        self.website.as_deref()
    }

    pub fn logo_url(&self) -> Option<&str> {
        self.logo_url.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn event_ids(&self) -> &[Uuid] {
        &self.event_ids
    }
}

impl Document for Partner {
    const COLLECTION: &'static str = "partners";

    fn id(&self) -> Uuid {
        self.id
    }
}
