// Dashboard aggregations over already-loaded documents.
// Every status map lists all statuses, including those with a zero count.

use std::collections::{BTreeMap, HashSet};
use std::fmt::Display;

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::cluster::{AtlasCluster, ClusterStatus};
use crate::domain::event::{Event, EventStatus, Participant};
use crate::domain::judging::{JudgeAssignment, Score};
use crate::domain::project::{Project, ProjectStatus};
use crate::domain::team::Team;
use crate::domain::user::{User, UserRole};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamStats {
    pub count: u64,
    pub average_size: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreStats {
    pub count: u64,
    pub average_total: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JudgingProgress {
    pub assignments: u64,
    pub scored: u64,
    pub percent_complete: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GlobalAnalytics {
    pub users_by_role: BTreeMap<String, u64>,
    pub events_by_status: BTreeMap<String, u64>,
    pub total_registrations: u64,
    pub teams: TeamStats,
    pub projects_by_status: BTreeMap<String, u64>,
    pub scores: ScoreStats,
    pub feedback_responses: u64,
    pub clusters_by_status: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventAnalytics {
    pub event_id: Uuid,
    pub total_registrations: u64,
    pub registrations_per_day: BTreeMap<NaiveDate, u64>,
    pub participants_without_team: u64,
    pub teams: TeamStats,
    pub projects_by_status: BTreeMap<String, u64>,
    pub judging: JudgingProgress,
    pub average_score: Option<f64>,
    pub feedback_responses: u64,
}

/// Borrowed inputs for [`global_analytics`]
pub struct PlatformSnapshot<'a> {
    pub users: &'a [User],
    pub events: &'a [Event],
    pub registrations: u64,
    pub teams: &'a [Team],
    pub projects: &'a [Project],
    pub scores: &'a [Score],
    pub feedback_responses: u64,
    pub clusters: &'a [AtlasCluster],
}

/// Borrowed inputs for [`event_analytics`], all scoped to one event
pub struct EventSnapshot<'a> {
    pub event_id: Uuid,
    pub participants: &'a [Participant],
    pub teams: &'a [Team],
    pub projects: &'a [Project],
    pub assignments: &'a [JudgeAssignment],
    pub scores: &'a [Score],
    pub feedback_responses: u64,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn count_by<S, T>(all: &[S], items: &[T], status: impl Fn(&T) -> S) -> BTreeMap<String, u64>
where
    S: Display + PartialEq,
{
    all.iter()
        .map(|s| {
            let n = items.iter().filter(|item| status(item) == *s).count() as u64;
            (s.to_string(), n)
        })
        .collect()
}

fn team_stats(teams: &[Team]) -> TeamStats {
    let count = teams.len() as u64;
    let members: usize = teams.iter().map(Team::size).sum();
    TeamStats {
        count,
        average_size: if count == 0 {
            0.0
        } else {
            round2(members as f64 / count as f64)
        },
    }
}

fn average_total(scores: &[Score]) -> Option<f64> {
    if scores.is_empty() {
        return None;
    }
    let sum: f64 = scores.iter().map(|s| s.total).sum();
    Some(round2(sum / scores.len() as f64))
}

pub fn global_analytics(snapshot: &PlatformSnapshot<'_>) -> GlobalAnalytics {
    GlobalAnalytics {
        users_by_role: count_by(&UserRole::ALL, snapshot.users, User::role),
        events_by_status: count_by(&EventStatus::ALL, snapshot.events, Event::status),
        total_registrations: snapshot.registrations,
        teams: team_stats(snapshot.teams),
        projects_by_status: count_by(&ProjectStatus::ALL, snapshot.projects, Project::status),
        scores: ScoreStats {
            count: snapshot.scores.len() as u64,
            average_total: average_total(snapshot.scores),
        },
        feedback_responses: snapshot.feedback_responses,
        clusters_by_status: count_by(&ClusterStatus::ALL, snapshot.clusters, AtlasCluster::status),
    }
}

pub fn event_analytics(snapshot: &EventSnapshot<'_>) -> EventAnalytics {
    let mut registrations_per_day = BTreeMap::new();
    for participant in snapshot.participants {
        *registrations_per_day
            .entry(participant.registered_at.date_naive())
            .or_insert(0) += 1;
    }

    let on_team: HashSet<Uuid> = snapshot
        .teams
        .iter()
        .flat_map(|t| t.member_ids().iter().copied())
        .collect();
    let participants_without_team = snapshot
        .participants
        .iter()
        .filter(|p| !on_team.contains(&p.user_id))
        .count() as u64;

    let scored_pairs: HashSet<(Uuid, Uuid)> = snapshot
        .scores
        .iter()
        .map(|s| (s.project_id, s.judge_id))
        .collect();
    let assignments = snapshot.assignments.len() as u64;
    let scored = snapshot
        .assignments
        .iter()
        .filter(|a| scored_pairs.contains(&(a.project_id, a.judge_id)))
        .count() as u64;

    EventAnalytics {
        event_id: snapshot.event_id,
        total_registrations: snapshot.participants.len() as u64,
        registrations_per_day,
        participants_without_team,
        teams: team_stats(snapshot.teams),
        projects_by_status: count_by(&ProjectStatus::ALL, snapshot.projects, Project::status),
        judging: JudgingProgress {
            assignments,
            scored,
            percent_complete: if assignments == 0 {
                0.0
            } else {
                round2(scored as f64 / assignments as f64 * 100.0)
            },
        },
        average_score: average_total(snapshot.scores),
        feedback_responses: snapshot.feedback_responses,
    }
}
