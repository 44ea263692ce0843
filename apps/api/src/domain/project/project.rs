use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::value_objects::ProjectStatus;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::repositories::Document;

/// Partial update of a draft project; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectUpdate {
    pub title: Option<String>,
    pub tagline: Option<String>,
    pub description: Option<String>,
    pub repository_url: Option<String>,
    pub demo_url: Option<String>,
    pub technologies: Option<Vec<String>>,
}

fn check_url(field: &str, url: &str) -> DomainResult<()> {
    if url.is_empty() || url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(DomainError::validation(format!(
            "{} must start with http:// or https://",
            field
        )))
    }
}

/// Project aggregate root
///
/// A team's submission for an event. Each team owns at most one project.
///
/// # Invariants
/// - Title cannot be empty
/// - Only drafts are editable
/// - Submission requires a description and a repository URL
/// - URLs, when present, are http(s)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    id: Uuid,
    event_id: Uuid,
    team_id: Uuid,
    title: String,
    tagline: Option<String>,
    description: String,
    repository_url: Option<String>,
    demo_url: Option<String>,
    technologies: Vec<String>,
    status: ProjectStatus,
    submitted_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Project {
    /// Starts a new draft
    pub fn new(event_id: Uuid, team_id: Uuid, title: String) -> DomainResult<Self> {
        let title = title.trim().to_string();
        if title.is_empty() {
            return Err(DomainError::validation("Project title cannot be empty"));
        }

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            event_id,
            team_id,
            title,
            tagline: None,
            description: String::new(),
            repository_url: None,
            demo_url: None,
            technologies: Vec::new(),
            status: ProjectStatus::Draft,
            submitted_at: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Saves draft edits
    pub fn update(&mut self, update: ProjectUpdate) -> DomainResult<()> {
        if self.status != ProjectStatus::Draft {
            return Err(DomainError::validation(format!(
                "Cannot edit a {} project",
                self.status
            )));
        }
        if let Some(title) = &update.title {
            if title.trim().is_empty() {
                return Err(DomainError::validation("Project title cannot be empty"));
            }
        }
        if let Some(url) = &update.repository_url {
            check_url("Repository URL", url)?;
        }
        if let Some(url) = &update.demo_url {
            check_url("Demo URL", url)?;
        }

        if let Some(title) = update.title {
            self.title = title.trim().to_string();
        }
        if let Some(tagline) = update.tagline {
            self.tagline = Some(tagline);
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(url) = update.repository_url {
            self.repository_url = Some(url).filter(|u| !u.is_empty());
        }
        if let Some(url) = update.demo_url {
            self.demo_url = Some(url).filter(|u| !u.is_empty());
        }
        if let Some(technologies) = update.technologies {
            self.technologies = technologies
                .into_iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect();
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Hands the project in for judging
    pub fn submit(&mut self) -> DomainResult<()> {
        if !self.status.can_transition_to(ProjectStatus::Submitted) {
            return Err(DomainError::validation(format!(
                "Cannot submit a {} project",
                self.status
            )));
        }
        if self.description.trim().is_empty() {
            return Err(DomainError::validation(
                "A description is required before submitting",
            ));
        }
        if self.repository_url.is_none() {
            return Err(DomainError::validation(
                "A repository URL is required before submitting",
            ));
        }

        let now = Utc::now();
        self.status = ProjectStatus::Submitted;
        self.submitted_at = Some(now);
        self.updated_at = now;
        Ok(())
    }

    /// Marks the project as fully judged
    pub fn mark_judged(&mut self) -> DomainResult<()> {
        if !self.status.can_transition_to(ProjectStatus::Judged) {
            return Err(DomainError::validation(format!(
                "Cannot mark a {} project as judged",
                self.status
            )));
        }
        self.status = ProjectStatus::Judged;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Drafts are private to their team
    pub fn is_draft(&self) -> bool {
        self.status == ProjectStatus::Draft
    }

    // ===== Getters =====

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn event_id(&self) -> Uuid {
        self.event_id
    }

    pub fn team_id(&self) -> Uuid {
        self.team_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn tagline(&self) -> Option<&str> {
        self.tagline.as_deref()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn repository_url(&self) -> Option<&str> {
        self.repository_url.as_deref()
    }

    pub fn demo_url(&self) -> Option<&str> {
        self.demo_url.as_deref()
    }

    pub fn technologies(&self) -> &[String] {
        &self.technologies
    }

    pub fn status(&self) -> ProjectStatus {
        self.status
    }

    pub fn submitted_at(&self) -> Option<DateTime<Utc>> {
        self.submitted_at
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

impl Document for Project {
    const COLLECTION: &'static str = "projects";

    fn id(&self) -> Uuid {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> Project {
        Project::new(Uuid::new_v4(), Uuid::new_v4(), "Crab Compiler".into()).unwrap()
    }

    fn complete_draft() -> Project {
        let mut project = draft();
        project
            .update(ProjectUpdate {
                description: Some("Compiles crabs".into()),
                repository_url: Some("https://github.com/crabs/compiler".into()),
                ..Default::default()
            })
            .unwrap();
        project
    }

    #[test]
    fn new_project_is_draft() {
        let project = draft();
        assert_eq!(project.status(), ProjectStatus::Draft);
        assert!(project.submitted_at().is_none());
    }

    #[test]
    fn blank_title_rejected() {
        assert!(Project::new(Uuid::new_v4(), Uuid::new_v4(), "  ".into()).is_err());
    }

    #[test]
    fn update_draft_fields() {
        let mut project = draft();
        project
            .update(ProjectUpdate {
                tagline: Some("Fast".into()),
                technologies: Some(vec!["rust".into(), " ".into(), "wasm".into()]),
                demo_url: Some("http://demo.example".into()),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(project.tagline(), Some("Fast"));
        assert_eq!(project.technologies(), &["rust".to_string(), "wasm".to_string()]);
        assert_eq!(project.demo_url(), Some("http://demo.example"));
    }

    #[test]
    fn empty_url_clears_link() {
        let mut project = complete_draft();
        project
            .update(ProjectUpdate {
                repository_url: Some(String::new()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(project.repository_url(), None);
    }

    #[test]
    fn non_http_url_rejected() {
        let mut project = draft();
        let result = project.update(ProjectUpdate {
            repository_url: Some("ftp://nope".into()),
            ..Default::default()
        });
        assert!(result.is_err());
    }

    #[test]
    fn submit_requires_description_and_repository() {
        let mut project = draft();
        assert!(project.submit().is_err());

        project
            .update(ProjectUpdate {
                description: Some("Something".into()),
                ..Default::default()
            })
            .unwrap();
        let err = project.submit().unwrap_err();
        assert!(err.to_string().contains("repository URL"));
    }

    #[test]
    fn submit_then_locked() {
        let mut project = complete_draft();
        project.submit().unwrap();

        assert_eq!(project.status(), ProjectStatus::Submitted);
        assert!(project.submitted_at().is_some());
        assert!(project
            .update(ProjectUpdate {
                title: Some("Renamed".into()),
                ..Default::default()
            })
            .is_err());
        assert!(project.submit().is_err());
    }

    #[test]
    fn judged_only_after_submission() {
        let mut project = complete_draft();
        assert!(project.mark_judged().is_err());

        project.submit().unwrap();
        project.mark_judged().unwrap();
        assert_eq!(project.status(), ProjectStatus::Judged);
    }
}
