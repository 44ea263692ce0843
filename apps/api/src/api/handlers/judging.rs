use std::collections::{BTreeMap, HashSet};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::middleware::{ApiJson, AuthUser};
use crate::domain::event::{Event, EventStatus};
use crate::domain::judging::{
    build_leaderboard, plan_assignments, CriteriaScores, JudgeAssignment, LeaderboardEntry, Score,
};
use crate::domain::project::{Project, ProjectStatus};
use crate::domain::repositories::Filter;
use crate::domain::user::{User, UserRole};
use crate::infrastructure::email::EmailMessage;
use crate::state::AppState;

use super::common::{load, load_visible_event};

#[derive(Debug, Deserialize)]
pub struct AssignRequest {
    pub project_id: Uuid,
    pub judge_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct AutoAssignRequest {
    pub judges_per_project: usize,
}

#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    pub criteria: CriteriaScores,
    pub comments: Option<String>,
}

/// An assignment as seen by its judge
#[derive(Debug, Serialize)]
pub struct MyAssignment {
    #[serde(flatten)]
    pub assignment: JudgeAssignment,
    pub project_title: String,
    pub scored: bool,
}

async fn has_score(state: &AppState, project_id: Uuid, judge_id: Uuid) -> Result<bool, ApiError> {
    Ok(state
        .collection::<Score>()
        .exists(
            Filter::new()
                .eq("project_id", project_id)
                .eq("judge_id", judge_id),
        )
        .await?)
}

/// Marks a submitted project judged once every remaining assignment has a score
async fn settle_project(state: &AppState, project_id: Uuid) -> Result<(), ApiError> {
    let Some(mut project) = state.collection::<Project>().find_by_id(project_id).await? else {
        return Ok(());
    };
    if project.status() != ProjectStatus::Submitted {
        return Ok(());
    }

    let filter = Filter::new().eq("project_id", project_id);
    let assignments = state.collection::<JudgeAssignment>().find(filter.clone()).await?;
    if assignments.is_empty() {
        return Ok(());
    }
    let judged_by: HashSet<Uuid> = state
        .collection::<Score>()
        .find(filter)
        .await?
        .into_iter()
        .map(|s| s.judge_id)
        .collect();

    if assignments.iter().all(|a| judged_by.contains(&a.judge_id)) {
        project.mark_judged()?;
        state.collection::<Project>().save(&project).await?;
        tracing::info!(project_id = %project_id, "Project fully judged");
    }
    Ok(())
}

async fn tell_judge(state: &AppState, judge: &User, event: &Event, count: usize) {
    state
        .notify(EmailMessage::new(
            judge.email().as_str(),
            format!("Judging assignments for {}", event.name()),
            format!(
                "Hi {},\n\nYou have {} new project(s) to judge at {}.\n",
                judge.full_name(),
                count,
                event.name()
            ),
        ))
        .await;
}

/// Assign one judge to one project
///
/// POST /api/events/:id/judging/assignments
pub async fn create_assignment(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(event_id): Path<Uuid>,
    ApiJson(req): ApiJson<AssignRequest>,
) -> Result<(StatusCode, Json<JudgeAssignment>), ApiError> {
    caller.require_staff()?;
    let event: Event = load(&state, event_id, "Event").await?;

    let judge: User = load(&state, req.judge_id, "User").await?;
    if !judge.role().can_judge() {
        return Err(ApiError::bad_request("User is not a judge"));
    }

    let project: Project = load(&state, req.project_id, "Project").await?;
    if project.event_id() != event_id {
        return Err(ApiError::bad_request("Project does not belong to this event"));
    }
    if project.is_draft() {
        return Err(ApiError::bad_request("Draft projects cannot be judged"));
    }
    if project.status() != ProjectStatus::Submitted {
        return Err(ApiError::bad_request("Project has already been judged"));
    }

    let assignments = state.collection::<JudgeAssignment>();
    let duplicate = assignments
        .exists(
            Filter::new()
                .eq("project_id", req.project_id)
                .eq("judge_id", req.judge_id),
        )
        .await?;
    if duplicate {
        return Err(ApiError::conflict("Judge is already assigned to this project"));
    }

    let assignment = JudgeAssignment::new(event_id, req.project_id, req.judge_id, caller.id);
    assignments.insert(&assignment).await?;

    tracing::info!(
        event_id = %event_id,
        project_id = %req.project_id,
        judge_id = %req.judge_id,
        "Judge assigned"
    );
    tell_judge(&state, &judge, &event, 1).await;

    Ok((StatusCode::CREATED, Json(assignment)))
}

/// Spread submitted projects over the judge pool
///
/// POST /api/events/:id/judging/auto-assign
pub async fn auto_assign(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(event_id): Path<Uuid>,
    ApiJson(req): ApiJson<AutoAssignRequest>,
) -> Result<(StatusCode, Json<Vec<JudgeAssignment>>), ApiError> {
    caller.require_staff()?;
    if req.judges_per_project == 0 {
        return Err(ApiError::bad_request("judges_per_project must be at least 1"));
    }
    let event: Event = load(&state, event_id, "Event").await?;

    let project_ids: Vec<Uuid> = state
        .collection::<Project>()
        .find(
            Filter::new()
                .eq("event_id", event_id)
                .eq("status", ProjectStatus::Submitted),
        )
        .await?
        .iter()
        .map(Project::id)
        .collect();

    let judges: Vec<User> = state
        .collection::<User>()
        .find(Filter::new().eq("role", UserRole::Judge))
        .await?
        .into_iter()
        .filter(User::is_active)
        .collect();
    let judge_ids: Vec<Uuid> = judges.iter().map(User::id).collect();

    let assignments = state.collection::<JudgeAssignment>();
    let existing: Vec<(Uuid, Uuid)> = assignments
        .find(Filter::new().eq("event_id", event_id))
        .await?
        .iter()
        .map(|a| (a.project_id, a.judge_id))
        .collect();

    let plan = plan_assignments(&project_ids, &judge_ids, &existing, req.judges_per_project);

    let mut created = Vec::with_capacity(plan.len());
    let mut per_judge: BTreeMap<Uuid, usize> = BTreeMap::new();
    for (project_id, judge_id) in plan {
        let assignment = JudgeAssignment::new(event_id, project_id, judge_id, caller.id);
        assignments.insert(&assignment).await?;
        *per_judge.entry(judge_id).or_default() += 1;
        created.push(assignment);
    }

    tracing::info!(
        event_id = %event_id,
        projects = project_ids.len(),
        judges = judge_ids.len(),
        created = created.len(),
        "Judges auto-assigned"
    );

    for judge in &judges {
        if let Some(count) = per_judge.get(&judge.id()) {
            tell_judge(&state, judge, &event, *count).await;
        }
    }

    Ok((StatusCode::CREATED, Json(created)))
}

/// DELETE /api/judging/assignments/:id
pub async fn delete_assignment(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    caller.require_staff()?;

    let assignment: JudgeAssignment = load(&state, id, "Assignment").await?;
    if has_score(&state, assignment.project_id, assignment.judge_id).await? {
        return Err(ApiError::conflict("Scored assignments cannot be removed"));
    }

    state.collection::<JudgeAssignment>().delete(id).await?;
    tracing::info!(assignment_id = %id, project_id = %assignment.project_id, "Assignment removed");

    // The removed judge may have been the last one outstanding
    settle_project(&state, assignment.project_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/judging/my-assignments
pub async fn my_assignments(
    State(state): State<AppState>,
    caller: AuthUser,
) -> Result<Json<Vec<MyAssignment>>, ApiError> {
    if !caller.role.can_judge() {
        return Err(ApiError::forbidden("Judge access required"));
    }

    let assignments = state
        .collection::<JudgeAssignment>()
        .find(Filter::new().eq("judge_id", caller.id))
        .await?;
    let scored: HashSet<Uuid> = state
        .collection::<Score>()
        .find(Filter::new().eq("judge_id", caller.id))
        .await?
        .into_iter()
        .map(|s| s.project_id)
        .collect();

    let mut mine = Vec::with_capacity(assignments.len());
    for assignment in assignments {
        let project_title = state
            .collection::<Project>()
            .find_by_id(assignment.project_id)
            .await?
            .map(|p| p.title().to_string())
            .unwrap_or_default();
        mine.push(MyAssignment {
            scored: scored.contains(&assignment.project_id),
            project_title,
            assignment,
        });
    }

    Ok(Json(mine))
}

/// Record the caller's rubric score for a project
///
/// POST /api/projects/:id/scores
///
/// # Business Rules
/// - Only judges assigned to the project may score it, once each
/// - The caller must still hold a judging role
/// - The project becomes judged when every assignment has a score
pub async fn submit_score(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(project_id): Path<Uuid>,
    ApiJson(req): ApiJson<ScoreRequest>,
) -> Result<(StatusCode, Json<Score>), ApiError> {
    if !caller.role.can_judge() {
        return Err(ApiError::forbidden("Judge access required"));
    }
    let project: Project = load(&state, project_id, "Project").await?;

    let assignments = state
        .collection::<JudgeAssignment>()
        .find(Filter::new().eq("project_id", project_id))
        .await?;
    if !assignments.iter().any(|a| a.judge_id == caller.id) {
        return Err(ApiError::forbidden("You are not assigned to this project"));
    }
    if has_score(&state, project_id, caller.id).await? {
        return Err(ApiError::conflict("You already scored this project"));
    }

    let event: Event = load(&state, project.event_id(), "Event").await?;
    let score = Score::new(
        event.rubric(),
        event.id(),
        project_id,
        caller.id,
        req.criteria,
        req.comments,
    )?;

    state.collection::<Score>().insert(&score).await?;

    tracing::info!(project_id = %project_id, judge_id = %caller.id, total = score.total, "Score submitted");

    settle_project(&state, project_id).await?;

    Ok((StatusCode::CREATED, Json(score)))
}

/// GET /api/events/:id/leaderboard
pub async fn leaderboard(
    State(state): State<AppState>,
    caller: Option<AuthUser>,
    Path(event_id): Path<Uuid>,
) -> Result<Json<Vec<LeaderboardEntry>>, ApiError> {
    let event = load_visible_event(&state, event_id, caller.as_ref()).await?;

    let staff = caller.as_ref().is_some_and(AuthUser::is_staff);
    if !staff && event.status() != EventStatus::Concluded {
        return Err(ApiError::forbidden(
            "The leaderboard is published once the event concludes",
        ));
    }

    let filter = Filter::new().eq("event_id", event_id);
    let projects = state.collection::<Project>().find(filter.clone()).await?;
    let scores = state.collection::<Score>().find(filter).await?;

    Ok(Json(build_leaderboard(&projects, &scores)))
}
