use uuid::Uuid;

/// Domain events that occur within the Team aggregate
///
/// Handlers turn these into notifications for the people involved.
///
/// # Example
/// ```
/// use hackathon_api::domain::team::TeamEvent;
/// use uuid::Uuid;
///
/// let event = TeamEvent::MemberJoined {
///     team_id: Uuid::new_v4(),
///     user_id: Uuid::new_v4(),
/// };
/// assert!(event.user_id().is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TeamEvent {
    /// Fired when a team is formed
    Created {
        team_id: Uuid,
        event_id: Uuid,
        leader_id: Uuid,
    },
    /// Fired when a participant joins
    MemberJoined { team_id: Uuid, user_id: Uuid },
    /// Fired when a member leaves
    MemberLeft { team_id: Uuid, user_id: Uuid },
    /// Fired when the leader left and another member took over
    LeadershipTransferred {
        team_id: Uuid,
        from: Uuid,
        to: Uuid,
    },
    /// Fired when the last member left
    Disbanded { team_id: Uuid },
}

impl TeamEvent {
    /// Returns the team_id for this event
    pub fn team_id(&self) -> Uuid {
        match self {
            TeamEvent::Created { team_id, .. }
            | TeamEvent::MemberJoined { team_id, .. }
            | TeamEvent::MemberLeft { team_id, .. }
            | TeamEvent::LeadershipTransferred { team_id, .. }
            | TeamEvent::Disbanded { team_id } => *team_id,
        }
    }

    /// The user the event is about, if any
    pub fn user_id(&self) -> Option<Uuid> {
        match self {
            TeamEvent::Created { leader_id, .. } => Some(*leader_id),
            TeamEvent::MemberJoined { user_id, .. } | TeamEvent::MemberLeft { user_id, .. } => {
                Some(*user_id)
            }
            TeamEvent::LeadershipTransferred { to, .. } => Some(*to),
            TeamEvent::Disbanded { .. } => None,
        }
    }
}
