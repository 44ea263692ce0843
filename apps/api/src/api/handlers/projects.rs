use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::middleware::{ApiJson, AuthUser, OptionalJson};
use crate::domain::event::Event;
use crate::domain::project::{Project, ProjectUpdate};
use crate::domain::repositories::Filter;
use crate::domain::team::Team;
use crate::prompts::{self, library};
use crate::state::AppState;

use super::common::{load, load_visible_event, require_member, require_member_or_staff, team_of};

const SUMMARY_SENTENCES: usize = 2;

#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    pub title: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct BuilderPromptRequest {
    #[serde(default)]
    pub enhance: bool,
}

#[derive(Debug, Serialize)]
pub struct BuilderPromptResponse {
    pub prompt: String,
    pub enhanced: bool,
    pub template: String,
    pub template_version: String,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub project_id: Uuid,
    pub summary: String,
    pub generated: bool,
}

/// Drafts are visible to their own team and staff only
fn can_view(project: &Project, team: &Team, caller: Option<&AuthUser>) -> bool {
    !project.is_draft()
        || caller.is_some_and(|c| c.is_staff() || team.is_member(c.id))
}

async fn load_viewable(
    state: &AppState,
    id: Uuid,
    caller: Option<&AuthUser>,
) -> Result<(Project, Team), ApiError> {
    let project: Project = load(state, id, "Project").await?;
    let team: Team = load(state, project.team_id(), "Team").await?;
    if can_view(&project, &team, caller) {
        Ok((project, team))
    } else {
        Err(ApiError::not_found("Project not found"))
    }
}

/// Start the team's draft project
///
/// POST /api/teams/:id/project
pub async fn create_project(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(team_id): Path<Uuid>,
    ApiJson(req): ApiJson<CreateProjectRequest>,
) -> Result<(StatusCode, Json<Project>), ApiError> {
    let team: Team = load(&state, team_id, "Team").await?;
    require_member(&team, &caller)?;

    let projects = state.collection::<Project>();
    if projects.exists(Filter::new().eq("team_id", team_id)).await? {
        return Err(ApiError::conflict("Team already has a project"));
    }

    let project = Project::new(team.event_id(), team_id, req.title)?;
    projects.insert(&project).await?;

    tracing::info!(project_id = %project.id(), team_id = %team_id, "Project created");

    Ok((StatusCode::CREATED, Json(project)))
}

/// GET /api/projects/:id
pub async fn get_project(
    State(state): State<AppState>,
    caller: Option<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Project>, ApiError> {
    let (project, _) = load_viewable(&state, id, caller.as_ref()).await?;
    Ok(Json(project))
}

/// GET /api/events/:id/projects
pub async fn list_event_projects(
    State(state): State<AppState>,
    caller: Option<AuthUser>,
    Path(event_id): Path<Uuid>,
) -> Result<Json<Vec<Project>>, ApiError> {
    load_visible_event(&state, event_id, caller.as_ref()).await?;

    let projects = state
        .collection::<Project>()
        .find(Filter::new().eq("event_id", event_id))
        .await?;

    let own_team = match &caller {
        Some(c) if !c.is_staff() => team_of(&state, event_id, c.id)
            .await?
            .map(|t| t.id()),
        _ => None,
    };
    let staff = caller.as_ref().is_some_and(AuthUser::is_staff);

    Ok(Json(
        projects
            .into_iter()
            .filter(|p| staff || !p.is_draft() || Some(p.team_id()) == own_team)
            .collect(),
    ))
}

/// Auto-save a draft
///
/// PATCH /api/projects/:id
pub async fn update_project(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
    ApiJson(req): ApiJson<ProjectUpdate>,
) -> Result<Json<Project>, ApiError> {
    let mut project: Project = load(&state, id, "Project").await?;
    let team: Team = load(&state, project.team_id(), "Team").await?;
    require_member(&team, &caller)?;

    project.update(req)?;
    state.collection::<Project>().save(&project).await?;

    Ok(Json(project))
}

/// POST /api/projects/:id/submit
pub async fn submit_project(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Project>, ApiError> {
    let mut project: Project = load(&state, id, "Project").await?;
    let team: Team = load(&state, project.team_id(), "Team").await?;
    require_member(&team, &caller)?;

    let event: Event = load(&state, project.event_id(), "Event").await?;
    if !event.accepts_submissions() {
        return Err(ApiError::bad_request(
            "Projects can only be submitted while the event is in progress",
        ));
    }

    project.submit()?;
    state.collection::<Project>().save(&project).await?;

    tracing::info!(project_id = %id, team_id = %team.id(), "Project submitted");

    Ok(Json(project))
}

/// Build instructions for an AI coding assistant, optionally refined by the LLM
///
/// POST /api/projects/:id/builder-prompt
pub async fn builder_prompt(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
    OptionalJson(req): OptionalJson<BuilderPromptRequest>,
) -> Result<Json<BuilderPromptResponse>, ApiError> {
    let project: Project = load(&state, id, "Project").await?;
    let team: Team = load(&state, project.team_id(), "Team").await?;
    require_member_or_staff(&team, &caller)?;
    let event: Event = load(&state, project.event_id(), "Event").await?;

    let template = library::builder_prompt();
    let prompt = template.render(&prompts::project_variables(&project, &team, &event));

    let mut response = BuilderPromptResponse {
        prompt,
        enhanced: false,
        template: template.name.clone(),
        template_version: template.version.clone(),
    };

    if req.enhance {
        match &state.llm {
            Some(llm) => {
                let refined = llm.generate(&template.system, &response.prompt).await;
                match refined {
                    Ok(text) => {
                        response.prompt = text;
                        response.enhanced = true;
                    }
                    Err(e) => tracing::warn!(
                        project_id = %id,
                        model = llm.model(),
                        error = %e,
                        "Prompt enhancement failed, returning base prompt"
                    ),
                }
            }
            None => tracing::debug!("No LLM configured, returning base prompt"),
        }
    }

    Ok(Json(response))
}

/// GET /api/projects/:id/summary
pub async fn project_summary(
    State(state): State<AppState>,
    caller: Option<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<SummaryResponse>, ApiError> {
    let (project, team) = load_viewable(&state, id, caller.as_ref()).await?;
    let fallback = || prompts::leading_sentences(project.description(), SUMMARY_SENTENCES);

    let Some(llm) = &state.llm else {
        return Ok(Json(SummaryResponse {
            project_id: id,
            summary: fallback(),
            generated: false,
        }));
    };

    let event: Event = load(&state, project.event_id(), "Event").await?;
    let template = library::project_summary();
    let prompt = template.render(&prompts::project_variables(&project, &team, &event));

    let (summary, generated) = match llm.generate(&template.system, &prompt).await {
        Ok(text) => (text, true),
        Err(e) => {
            tracing::warn!(
                project_id = %id,
                model = llm.model(),
                error = %e,
                "Summary generation failed"
            );
            (fallback(), false)
        }
    };

    Ok(Json(SummaryResponse {
        project_id: id,
        summary,
        generated,
    }))
}
