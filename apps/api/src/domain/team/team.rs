use super::events::TeamEvent;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::repositories::Document;

/// Partial update of a team's profile
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TeamUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub looking_for_members: Option<bool>,
    pub desired_skills: Option<Vec<String>>,
}

/// Team aggregate root
///
/// A group of participants building one project within an event.
///
/// # Invariants
/// - Name cannot be empty
/// - The leader is always a member
/// - Members are unique and kept in joining order
/// - A team never holds more members than the event's max team size
///
/// # Example
/// ```
/// use hackathon_api::domain::team::Team;
/// use uuid::Uuid;
///
/// let leader = Uuid::new_v4();
/// let (team, events) = Team::new(
///     Uuid::new_v4(),
///     "Rustaceans".to_string(),
///     None,
///     leader,
/// ).expect("valid team");
///
/// assert!(team.is_leader(leader));
/// assert_eq!(events.len(), 1);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    id: Uuid,
    event_id: Uuid,
    name: String,
    description: Option<String>,
    leader_id: Uuid,
    member_ids: Vec<Uuid>,
    looking_for_members: bool,
    desired_skills: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Team {
    /// Creates a new Team with its leader as the only member
    ///
    /// # Returns
    /// * `Ok((Team, Vec<TeamEvent>))` - New team and events generated
    /// * `Err(DomainError)` - If the name is blank
    pub fn new(
        event_id: Uuid,
        name: String,
        description: Option<String>,
        leader_id: Uuid,
    ) -> DomainResult<(Self, Vec<TeamEvent>)> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(DomainError::validation("Team name cannot be empty"));
        }

        let now = Utc::now();
        let team = Self {
            id: Uuid::new_v4(),
            event_id,
            name,
            description,
            leader_id,
            member_ids: vec![leader_id],
            looking_for_members: true,
            desired_skills: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        let events = vec![TeamEvent::Created {
            team_id: team.id,
            event_id,
            leader_id,
        }];

        Ok((team, events))
    }

    /// Adds a participant to the team
    ///
    /// # Business Rules
    /// - The user must not already be a member
    /// - The team must have room under `max_size`
    /// - A team that becomes full stops looking for members
    pub fn add_member(&mut self, user_id: Uuid, max_size: u32) -> DomainResult<TeamEvent> {
        if self.is_member(user_id) {
            return Err(DomainError::conflict("Already a member of this team"));
        }
        if self.is_full(max_size) {
            return Err(DomainError::conflict("Team is full"));
        }

        self.member_ids.push(user_id);
        if self.is_full(max_size) {
            self.looking_for_members = false;
        }
        self.updated_at = Utc::now();

        Ok(TeamEvent::MemberJoined {
            team_id: self.id,
            user_id,
        })
    }

    /// Removes a member from the team
    ///
    /// A departing leader hands over to the longest-standing remaining
    /// member. When the last member leaves the team is disbanded and the
    /// caller is expected to delete it.
    pub fn remove_member(&mut self, user_id: Uuid) -> DomainResult<Vec<TeamEvent>> {
        let position = self
            .member_ids
            .iter()
            .position(|id| *id == user_id)
            .ok_or_else(|| DomainError::validation("Not a member of this team"))?;

        self.member_ids.remove(position);
        self.updated_at = Utc::now();

        let mut events = vec![TeamEvent::MemberLeft {
            team_id: self.id,
            user_id,
        }];

        match self.member_ids.first().copied() {
            None => events.push(TeamEvent::Disbanded { team_id: self.id }),
            Some(next_leader) if self.leader_id == user_id => {
                self.leader_id = next_leader;
                events.push(TeamEvent::LeadershipTransferred {
                    team_id: self.id,
                    from: user_id,
                    to: next_leader,
                });
            }
            Some(_) => {}
        }

        Ok(events)
    }

    pub fn update(&mut self, update: TeamUpdate) -> DomainResult<()> {
        if let Some(name) = &update.name {
            if name.trim().is_empty() {
                return Err(DomainError::validation("Team name cannot be empty"));
            }
        }

        if let Some(name) = update.name {
            self.name = name.trim().to_string();
        }
        if let Some(description) = update.description {
            self.description = Some(description);
        }
        if let Some(looking) = update.looking_for_members {
            self.looking_for_members = looking;
        }
        if let Some(skills) = update.desired_skills {
            self.desired_skills = skills;
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn is_member(&self, user_id: Uuid) -> bool {
        self.member_ids.contains(&user_id)
    }

    pub fn is_leader(&self, user_id: Uuid) -> bool {
        self.leader_id == user_id
    }

    pub fn is_full(&self, max_size: u32) -> bool {
        self.member_ids.len() >= max_size as usize
    }

    pub fn is_disbanded(&self) -> bool {
        self.member_ids.is_empty()
    }

    // ===== Getters =====

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn event_id(&self) -> Uuid {
        self.event_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn leader_id(&self) -> Uuid {
        self.leader_id
    }

    pub fn member_ids(&self) -> &[Uuid] {
        &self.member_ids
    }

    pub fn size(&self) -> usize {
        self.member_ids.len()
    }

    pub fn looking_for_members(&self) -> bool {
        self.looking_for_members
    }

    pub fn desired_skills(&self) -> &[String] {
        &self.desired_skills
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Document for Team {
    const COLLECTION: &'static str = "teams";

    fn id(&self) -> Uuid {
        self.id
    }
}
