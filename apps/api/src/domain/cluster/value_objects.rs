use serde::{Deserialize, Serialize};

/// Provisioning state of a team's database cluster
///
/// # Status Transitions
/// ```text
/// Creating -> Ready -> Deleting -> Deleted
///     |         |
///     +-> Failed+
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClusterStatus {
    Creating,
    Ready,
    Deleting,
    Deleted,
    Failed,
}

impl ClusterStatus {
    /// Maps a provider `stateName` onto our status
    ///
    /// ```
    /// use hackathon_api::domain::cluster::ClusterStatus;
    ///
    /// assert_eq!(ClusterStatus::from_provider_state("IDLE"), ClusterStatus::Ready);
    /// assert_eq!(ClusterStatus::from_provider_state("CREATING"), ClusterStatus::Creating);
    /// ```
    pub fn from_provider_state(state: &str) -> Self {
        match state.to_ascii_uppercase().as_str() {
            "IDLE" | "UPDATING" | "REPAIRING" => ClusterStatus::Ready,
            "CREATING" => ClusterStatus::Creating,
            "DELETING" => ClusterStatus::Deleting,
            "DELETED" => ClusterStatus::Deleted,
            _ => ClusterStatus::Failed,
        }
    }

    pub const ALL: [ClusterStatus; 5] = [
        ClusterStatus::Creating,
        ClusterStatus::Ready,
        ClusterStatus::Deleting,
        ClusterStatus::Deleted,
        ClusterStatus::Failed,
    ];
}

impl std::fmt::Display for ClusterStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClusterStatus::Creating => write!(f, "creating"),
            ClusterStatus::Ready => write!(f, "ready"),
            ClusterStatus::Deleting => write!(f, "deleting"),
            ClusterStatus::Deleted => write!(f, "deleted"),
            ClusterStatus::Failed => write!(f, "failed"),
        }
    }
}
