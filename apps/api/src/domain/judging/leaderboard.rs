use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::Serialize;
use uuid::Uuid;

use super::score::Score;
use crate::domain::project::Project;

/// One ranked row of an event leaderboard
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub project_id: Uuid,
    pub team_id: Uuid,
    pub title: String,
    pub average_score: f64,
    pub score_count: u32,
    pub criteria_averages: BTreeMap<String, f64>,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Aggregates scores into a ranked leaderboard
///
/// Only projects with at least one score appear. Rows are ordered by
/// average score (descending), then number of scores (descending), then
/// title. Averages are rounded to two decimals and equal averages share a
/// rank, with the following rank skipped (1, 2, 2, 4).
pub fn build_leaderboard(projects: &[Project], scores: &[Score]) -> Vec<LeaderboardEntry> {
    let mut entries: Vec<LeaderboardEntry> = projects
        .iter()
        .filter_map(|project| {
            let project_scores: Vec<&Score> = scores
                .iter()
                .filter(|s| s.project_id == project.id())
                .collect();
            if project_scores.is_empty() {
                return None;
            }

            let count = project_scores.len() as f64;
            let average = project_scores.iter().map(|s| s.total).sum::<f64>() / count;

            let mut sums: BTreeMap<String, (f64, u32)> = BTreeMap::new();
            for score in &project_scores {
                for (key, points) in &score.criteria {
                    let entry = sums.entry(key.clone()).or_insert((0.0, 0));
                    entry.0 += f64::from(*points);
                    entry.1 += 1;
                }
            }
            let criteria_averages = sums
                .into_iter()
                .map(|(key, (sum, n))| (key, round2(sum / f64::from(n))))
                .collect();

            Some(LeaderboardEntry {
                rank: 0,
                project_id: project.id(),
                team_id: project.team_id(),
                title: project.title().to_string(),
                average_score: round2(average),
                score_count: project_scores.len() as u32,
                criteria_averages,
            })
        })
        .collect();

    entries.sort_by(|a, b| {
        b.average_score
            .partial_cmp(&a.average_score)
            .unwrap_or(Ordering::Equal)
            .then(b.score_count.cmp(&a.score_count))
            .then_with(|| a.title.cmp(&b.title))
    });

    let mut previous: Option<f64> = None;
    let mut rank = 0;
    for (index, entry) in entries.iter_mut().enumerate() {
        if previous != Some(entry.average_score) {
            rank = index as u32 + 1;
            previous = Some(entry.average_score);
        }
        entry.rank = rank;
    }

    entries
}
