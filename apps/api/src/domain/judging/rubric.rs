use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::domain::errors::{DomainError, DomainResult};

/// Per-criterion points awarded by a judge, keyed by criterion key
pub type CriteriaScores = BTreeMap<String, u32>;

/// One scoring dimension of a rubric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criterion {
    pub key: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub weight: f64,
    pub max_score: u32,
}

impl Criterion {
    pub fn new(key: &str, name: &str, weight: f64, max_score: u32) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            description: None,
            weight,
            max_score,
        }
    }
}

/// Scoring rubric of an event
///
/// # Invariants
/// - At least one criterion
/// - Criterion keys are unique and non-empty
/// - Weights are positive and finite, max scores positive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rubric {
    criteria: Vec<Criterion>,
}

impl Rubric {
    pub fn new(criteria: Vec<Criterion>) -> DomainResult<Self> {
        if criteria.is_empty() {
            return Err(DomainError::validation("Rubric needs at least one criterion"));
        }

        let mut keys = HashSet::new();
        for c in &criteria {
            if c.key.trim().is_empty() {
                return Err(DomainError::validation("Criterion key cannot be empty"));
            }
            if !keys.insert(c.key.as_str()) {
                return Err(DomainError::validation(format!(
                    "Duplicate criterion key: {}",
                    c.key
                )));
            }
            if !(c.weight.is_finite() && c.weight > 0.0) {
                return Err(DomainError::validation(format!(
                    "Criterion '{}' weight must be positive",
                    c.key
                )));
            }
            if c.max_score == 0 {
                return Err(DomainError::validation(format!(
                    "Criterion '{}' max score must be positive",
                    c.key
                )));
            }
        }

        Ok(Self { criteria })
    }

    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    /// Checks that a judge scored every criterion and nothing else
    pub fn validate_scores(&self, scores: &CriteriaScores) -> DomainResult<()> {
        for key in scores.keys() {
            if !self.criteria.iter().any(|c| &c.key == key) {
                return Err(DomainError::validation(format!(
                    "Unknown criterion: {}",
                    key
                )));
            }
        }

        for c in &self.criteria {
            match scores.get(&c.key) {
                None => {
                    return Err(DomainError::validation(format!(
                        "Missing score for criterion: {}",
                        c.key
                    )))
                }
                Some(points) if *points > c.max_score => {
                    return Err(DomainError::validation(format!(
                        "Score for '{}' must be between 0 and {}",
                        c.key, c.max_score
                    )))
                }
                Some(_) => {}
            }
        }

        Ok(())
    }

    /// Weighted total normalized to a 0-100 scale
    ///
    /// `Σ(points_i / max_i · weight_i) / Σ weight_i · 100`; missing criteria
    /// count as zero.
    pub fn weighted_total(&self, scores: &CriteriaScores) -> f64 {
        let total_weight: f64 = self.criteria.iter().map(|c| c.weight).sum();
        if total_weight <= 0.0 {
            return 0.0;
        }

        let earned: f64 = self
            .criteria
            .iter()
            .map(|c| {
                let points = scores.get(&c.key).copied().unwrap_or(0);
                f64::from(points) / f64::from(c.max_score) * c.weight
            })
            .sum();

        earned / total_weight * 100.0
    }
}

impl Default for Rubric {
    fn default() -> Self {
        Self {
            criteria: vec![
                Criterion::new("innovation", "Innovation", 1.0, 10),
                Criterion::new("technical", "Technical complexity", 1.0, 10),
                Criterion::new("design", "Design & usability", 1.0, 10),
                Criterion::new("impact", "Impact", 1.0, 10),
                Criterion::new("presentation", "Presentation", 1.0, 10),
            ],
        }
    }
}
