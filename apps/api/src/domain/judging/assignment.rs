use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::repositories::Document;

/// A judge's mandate to score one project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JudgeAssignment {
    pub id: Uuid,
    pub event_id: Uuid,
    pub project_id: Uuid,
    pub judge_id: Uuid,
    pub assigned_by: Uuid,
    pub assigned_at: DateTime<Utc>,
}

impl JudgeAssignment {
    pub fn new(event_id: Uuid, project_id: Uuid, judge_id: Uuid, assigned_by: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_id,
            project_id,
            judge_id,
            assigned_by,
            assigned_at: Utc::now(),
        }
    }
}

impl Document for JudgeAssignment {
    const COLLECTION: &'static str = "judge_assignments";

    fn id(&self) -> Uuid {
        self.id
    }
}

/// Plans new `(project_id, judge_id)` pairs so every project reaches
/// `judges_per_project` judges
///
/// Judges are picked least-loaded first (ties broken by id) and existing
/// pairs are never repeated. Projects are served in the given order; when
/// there are fewer judges than requested a project gets every judge
/// available to it.
pub fn plan_assignments(
    project_ids: &[Uuid],
    judge_ids: &[Uuid],
    existing: &[(Uuid, Uuid)],
    judges_per_project: usize,
) -> Vec<(Uuid, Uuid)> {
    let mut load: HashMap<Uuid, usize> = judge_ids.iter().map(|j| (*j, 0)).collect();
    let mut taken: HashSet<(Uuid, Uuid)> = HashSet::new();

    for (project_id, judge_id) in existing {
        taken.insert((*project_id, *judge_id));
        if let Some(count) = load.get_mut(judge_id) {
            *count += 1;
        }
    }

    let mut planned = Vec::new();

    for project_id in project_ids {
        let current = taken.iter().filter(|(p, _)| p == project_id).count();
        let needed = judges_per_project.saturating_sub(current);
        if needed == 0 {
            continue;
        }

        let mut candidates: Vec<Uuid> = judge_ids
            .iter()
            .copied()
            .filter(|j| !taken.contains(&(*project_id, *j)))
            .collect();
        candidates.sort_by_key(|j| (load.get(j).copied().unwrap_or(0), *j));
        candidates.dedup();

        for judge_id in candidates.into_iter().take(needed) {
            taken.insert((*project_id, judge_id));
            *load.entry(judge_id).or_insert(0) += 1;
            planned.push((*project_id, judge_id));
        }
    }

    planned
}
