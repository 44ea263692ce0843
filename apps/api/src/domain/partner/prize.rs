use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::nullable;
use crate::domain::repositories::Document;

#[derive(Debug, Clone, Deserialize)]
pub struct NewPrize {
    pub title: String,
    pub description: Option<String>,
    pub partner_id: Option<Uuid>,
    pub value: Option<Decimal>,
    pub quantity: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PrizeUpdate {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "nullable::deserialize")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable::deserialize")]
    pub partner_id: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "nullable::deserialize")]
    pub value: Option<Option<Decimal>>,
    pub quantity: Option<u32>,
}

/// A prize offered at an event, optionally sponsored by a partner
///
/// # Invariants
/// - Title cannot be empty
/// - Value (if any) is not negative
/// - `quantity >= 1` and never below the number of winners
/// - A project wins a given prize at most once
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prize {
    id: Uuid,
    event_id: Uuid,
    partner_id: Option<Uuid>,
    title: String,
    description: Option<String>,
    value: Option<Decimal>,
    quantity: u32,
    winner_project_ids: Vec<Uuid>,
    created_at: DateTime<Utc>,
}

fn check_value(value: Option<Decimal>) -> DomainResult<()> {
    match value {
        Some(v) if v < Decimal::ZERO => {
            Err(DomainError::validation("Prize value cannot be negative"))
        }
        _ => Ok(()),
    }
}

impl Prize {
    pub fn new(event_id: Uuid, details: NewPrize) -> DomainResult<Self> {
        let title = details.title.trim().to_string();
        if title.is_empty() {
            return Err(DomainError::validation("Prize title cannot be empty"));
        }
        check_value(details.value)?;
        let quantity = details.quantity.unwrap_or(1);
        if quantity == 0 {
            return Err(DomainError::validation("Prize quantity must be at least 1"));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            event_id,
            partner_id: details.partner_id,
            title,
            description: details.description,
            value: details.value,
            quantity,
            winner_project_ids: Vec::new(),
            created_at: Utc::now(),
        })
    }

    pub fn update(&mut self, update: PrizeUpdate) -> DomainResult<()> {
        if let Some(title) = &update.title {
            if title.trim().is_empty() {
                return Err(DomainError::validation("Prize title cannot be empty"));
            }
        }
        check_value(update.value.flatten())?;
        if let Some(quantity) = update.quantity {
            if quantity == 0 {
                return Err(DomainError::validation("Prize quantity must be at least 1"));
            }
            if (quantity as usize) < self.winner_project_ids.len() {
                return Err(DomainError::conflict(
                    "Quantity cannot drop below the number of winners",
                ));
            }
        }

        if let Some(title) = update.title {
            self.title = title.trim().to_string();
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(partner_id) = update.partner_id {
            self.partner_id = partner_id;
        }
        if let Some(value) = update.value {
            self.value = value;
        }
        if let Some(quantity) = update.quantity {
            self.quantity = quantity;
        }
        Ok(())
    }

    /// Records a winning project
    pub fn award(&mut self, project_id: Uuid) -> DomainResult<()> {
        if self.winner_project_ids.contains(&project_id) {
            return Err(DomainError::conflict("Project already won this prize"));
        }
        if self.remaining() == 0 {
            return Err(DomainError::conflict("All units of this prize are awarded"));
        }
        self.winner_project_ids.push(project_id);
        Ok(())
    }

    /// Withdraws an award
    pub fn revoke(&mut self, project_id: Uuid) -> DomainResult<()> {
        let before = self.winner_project_ids.len();
        self.winner_project_ids.retain(|id| *id != project_id);
        if self.winner_project_ids.len() == before {
            return Err(DomainError::not_found("Project has not won this prize"));
        }
        Ok(())
    }

    pub fn remaining(&self) -> u32 {
        self.quantity
            .saturating_sub(self.winner_project_ids.len() as u32)
    }

    // ===== Getters =====

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn event_id(&self) -> Uuid {
        self.event_id
    }

    pub fn partner_id(&self) -> Option<Uuid> {
        self.partner_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn value(&self) -> Option<Decimal> {
        self.value
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn winner_project_ids(&self) -> &[Uuid] {
        &self.winner_project_ids
    }
}

impl Document for Prize {
    const COLLECTION: &'static str = "prizes";

    fn id(&self) -> Uuid {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details(quantity: Option<u32>) -> NewPrize {
        NewPrize {
            title: "Best Hack".into(),
            description: None,
            partner_id: None,
            value: Some(Decimal::new(50000, 2)),
            quantity,
        }
    }

    #[test]
    fn create_prize_defaults_to_one_unit() {
        let prize = Prize::new(Uuid::new_v4(), details(None)).unwrap();
        assert_eq!(prize.quantity(), 1);
        assert_eq!(prize.remaining(), 1);
        assert_eq!(prize.value(), Some(Decimal::new(50000, 2)));
    }

    #[test]
    fn negative_value_rejected() {
        let mut d = details(None);
        d.value = Some(Decimal::from(-1));
        assert!(Prize::new(Uuid::new_v4(), d).is_err());
    }

    #[test]
    fn zero_quantity_rejected() {
        assert!(Prize::new(Uuid::new_v4(), details(Some(0))).is_err());
    }

    #[test]
    fn award_until_exhausted() {
        let mut prize = Prize::new(Uuid::new_v4(), details(Some(2))).unwrap();
        let first = Uuid::new_v4();

        prize.award(first).unwrap();
        assert!(matches!(prize.award(first), Err(DomainError::Conflict(_))));

        prize.award(Uuid::new_v4()).unwrap();
        assert_eq!(prize.remaining(), 0);
        assert!(prize.award(Uuid::new_v4()).is_err());
    }

    #[test]
    fn quantity_cannot_drop_below_winners() {
        let mut prize = Prize::new(Uuid::new_v4(), details(Some(2))).unwrap();
        prize.award(Uuid::new_v4()).unwrap();
        prize.award(Uuid::new_v4()).unwrap();

        let result = prize.update(PrizeUpdate {
            quantity: Some(1),
            ..Default::default()
        });
        assert!(result.is_err());
    }

    #[test]
    fn null_clears_sponsor_and_value() {
        let partner = Uuid::new_v4();
        let mut d = details(None);
        d.partner_id = Some(partner);
        let mut prize = Prize::new(Uuid::new_v4(), d).unwrap();

        let keep: PrizeUpdate = serde_json::from_str(r#"{"title": "Grand Prize"}"#).unwrap();
        prize.update(keep).unwrap();
        assert_eq!(prize.partner_id(), Some(partner));

        let clear: PrizeUpdate =
            serde_json::from_str(r#"{"partner_id": null, "value": null}"#).unwrap();
        prize.update(clear).unwrap();
        assert_eq!(prize.partner_id(), None);
        assert_eq!(prize.value(), None);
        assert_eq!(prize.title(), "Grand Prize");
    }

    #[test]
    fn revoke_award() {
        let mut prize = Prize::new(Uuid::new_v4(), details(None)).unwrap();
        let winner = Uuid::new_v4();
        prize.award(winner).unwrap();

        prize.revoke(winner).unwrap();
        assert_eq!(prize.remaining(), 1);
        assert!(prize.revoke(winner).is_err());
    }

    #[test]
    fn value_serializes_as_string() {
        let prize = Prize::new(Uuid::new_v4(), details(None)).unwrap();
        let json = serde_json::to_value(&prize).unwrap();
        assert_eq!(json["value"], "500.00");
    }
}
