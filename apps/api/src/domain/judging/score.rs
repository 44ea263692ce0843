use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::rubric::{CriteriaScores, Rubric};
use crate::domain::errors::DomainResult;
use crate::domain::repositories::Document;

/// A judge's rubric-based evaluation of a project
///
/// `total` is the rubric's weighted total on a 0-100 scale, fixed at the
/// time of scoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Score {
    pub id: Uuid,
    pub event_id: Uuid,
    pub project_id: Uuid,
    pub judge_id: Uuid,
    pub criteria: CriteriaScores,
    pub comments: Option<String>,
    pub total: f64,
    pub submitted_at: DateTime<Utc>,
}

impl Score {
    /// Validates the points against the rubric and computes the total
    pub fn new(
        rubric: &Rubric,
        event_id: Uuid,
        project_id: Uuid,
        judge_id: Uuid,
        criteria: CriteriaScores,
        comments: Option<String>,
    ) -> DomainResult<Self> {
        rubric.validate_scores(&criteria)?;
        let total = rubric.weighted_total(&criteria);

        Ok(Self {
            id: Uuid::new_v4(),
            event_id,
            project_id,
            judge_id,
            criteria,
            comments: comments.filter(|c| !c.trim().is_empty()),
            total,
            submitted_at: Utc::now(),
        })
    }
}

impl Document for Score {
    const COLLECTION: &'static str = "scores";

    fn id(&self) -> Uuid {
        self.id
    }
}
