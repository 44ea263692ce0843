use serde::{Deserialize, Serialize};

/// Lifecycle status of a project submission
///
/// # Status Transitions
/// ```text
/// Draft -> Submitted -> Judged
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    /// Still being edited by the team
    Draft,
    /// Handed in and waiting for judges
    Submitted,
    /// Every assigned judge has scored it
    Judged,
}

impl ProjectStatus {
    /// Checks if a transition from current status to next status is valid
    ///
    /// # Example
    /// ```
    /// use hackathon_api::domain::project::ProjectStatus;
    ///
    /// assert!(ProjectStatus::Draft.can_transition_to(ProjectStatus::Submitted));
    /// assert!(!ProjectStatus::Judged.can_transition_to(ProjectStatus::Draft));
    /// ```
    pub fn can_transition_to(&self, next: ProjectStatus) -> bool {
        use ProjectStatus::*;
        matches!((self, next), (Draft, Submitted) | (Submitted, Judged))
    }

    pub const ALL: [ProjectStatus; 3] = [
        ProjectStatus::Draft,
        ProjectStatus::Submitted,
        ProjectStatus::Judged,
    ];
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProjectStatus::Draft => write!(f, "draft"),
            ProjectStatus::Submitted => write!(f, "submitted"),
            ProjectStatus::Judged => write!(f, "judged"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_transitions() {
        assert!(ProjectStatus::Draft.can_transition_to(ProjectStatus::Submitted));
        assert!(ProjectStatus::Submitted.can_transition_to(ProjectStatus::Judged));
    }

    #[test]
    fn invalid_transitions() {
        assert!(!ProjectStatus::Draft.can_transition_to(ProjectStatus::Judged));
        assert!(!ProjectStatus::Submitted.can_transition_to(ProjectStatus::Draft));
        assert!(!ProjectStatus::Judged.can_transition_to(ProjectStatus::Submitted));
    }

    #[test]
    fn status_display() {
        assert_eq!(ProjectStatus::Draft.to_string(), "draft");
        assert_eq!(ProjectStatus::Submitted.to_string(), "submitted");
        assert_eq!(ProjectStatus::Judged.to_string(), "judged");
    }
}
