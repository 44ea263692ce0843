use serde::{Deserialize, Serialize};

/// Lifecycle status of a hackathon event
///
/// # Status Transitions
/// ```text
/// Draft -> Open -> InProgress -> Concluded
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    /// Being prepared; hidden from the public
    Draft,
    /// Published and accepting registrations
    Open,
    /// Hacking underway; projects may be submitted
    InProgress,
    /// Over; results are public
    Concluded,
}

impl EventStatus {
    /// Checks if a transition from current status to next status is valid
    ///
    /// # Example
    /// ```
    /// use hackathon_api::domain::event::EventStatus;
    ///
    /// assert!(EventStatus::Draft.can_transition_to(EventStatus::Open));
    /// assert!(!EventStatus::Draft.can_transition_to(EventStatus::Concluded));
    /// ```
    pub fn can_transition_to(&self, next: EventStatus) -> bool {
        use EventStatus::*;
        matches!(
            (self, next),
            (Draft, Open) | (Open, InProgress) | (InProgress, Concluded)
        )
    }

    pub const ALL: [EventStatus; 4] = [
        EventStatus::Draft,
        EventStatus::Open,
        EventStatus::InProgress,
        EventStatus::Concluded,
    ];
}

impl std::fmt::Display for EventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventStatus::Draft => write!(f, "draft"),
            EventStatus::Open => write!(f, "open"),
            EventStatus::InProgress => write!(f, "in_progress"),
            EventStatus::Concluded => write!(f, "concluded"),
        }
    }
}

/// Derives a URL slug from an event name
///
/// Lowercases, keeps ASCII letters and digits, and joins the remaining
/// words with single dashes.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;

    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    if slug.is_empty() {
        "event".to_string()
    } else {
        slug
    }
}

/// Picks the first free slug among `base`, `base-2`, `base-3`, ...
pub fn unique_slug(base: &str, taken: &[String]) -> String {
    if !taken.iter().any(|s| s == base) {
        return base.to_string();
    }

    (2..)
        .map(|n| format!("{}-{}", base, n))
        .find(|candidate| !taken.iter().any(|s| s == candidate))
        .unwrap_or_else(|| base.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_transitions_only() {
        assert!(EventStatus::Draft.can_transition_to(EventStatus::Open));
        assert!(EventStatus::Open.can_transition_to(EventStatus::InProgress));
        assert!(EventStatus::InProgress.can_transition_to(EventStatus::Concluded));

        assert!(!EventStatus::Open.can_transition_to(EventStatus::Draft));
        assert!(!EventStatus::Draft.can_transition_to(EventStatus::InProgress));
        assert!(!EventStatus::Concluded.can_transition_to(EventStatus::Open));
        assert!(!EventStatus::Open.can_transition_to(EventStatus::Open));
    }

    #[test]
    fn status_display_matches_serde() {
        for status in EventStatus::ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status));
        }
    }

    #[test]
    fn slugify_names() {
        assert_eq!(slugify("Spring Hack 2025"), "spring-hack-2025");
        assert_eq!(slugify("  AI & ML -- Night!  "), "ai-ml-night");
        assert_eq!(slugify("Ünïcode Jam"), "n-code-jam");
        assert_eq!(slugify("!!!"), "event");
    }

    #[test]
    fn unique_slug_appends_counter() {
        let taken = vec!["hack".to_string(), "hack-2".to_string()];
        assert_eq!(unique_slug("hack", &taken), "hack-3");
        assert_eq!(unique_slug("jam", &taken), "jam");
    }
}
