use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::repositories::Document;

/// Visual settings for a landing page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    pub primary_color: String,
    pub secondary_color: String,
    pub font_family: String,
    #[serde(default)]
    pub dark_mode: bool,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary_color: "#4f46e5".to_string(),
            secondary_color: "#0ea5e9".to_string(),
            font_family: "Inter".to_string(),
            dark_mode: false,
        }
    }
}

fn is_hex_color(value: &str) -> bool {
    value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit())
}

impl Theme {
    fn validate(&self) -> DomainResult<()> {
        for (name, value) in [
            ("primary_color", &self.primary_color),
            ("secondary_color", &self.secondary_color),
        ] {
            if !is_hex_color(value) {
                return Err(DomainError::validation(format!(
                    "{} must be a #rrggbb colour",
                    name
                )));
            }
        }
        if self.font_family.trim().is_empty() {
            return Err(DomainError::validation("Font family cannot be empty"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Hero,
    About,
    Schedule,
    Prizes,
    Sponsors,
    Faq,
    Custom,
}

fn default_visible() -> bool {
    true
}

/// One block of a landing page; `body` may contain `{{event.*}}` placeholders
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub kind: SectionKind,
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default = "default_visible")]
    pub visible: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewTemplate {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemplateUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub theme: Option<Theme>,
    pub sections: Option<Vec<Section>>,
}

/// Reusable landing-page layout
///
/// # Invariants
/// - Name cannot be empty
/// - Theme colours are `#rrggbb`
/// - Section titles cannot be empty
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Template {
    id: Uuid,
    name: String,
    description: Option<String>,
    theme: Theme,
    sections: Vec<Section>,
    created_by: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Template {
    pub fn new(details: NewTemplate, created_by: Uuid) -> DomainResult<Self> {
        let now = Utc::now();
        let template = Self {
            id: Uuid::new_v4(),
            name: details.name.trim().to_string(),
            description: details.description,
            theme: details.theme,
            sections: details.sections,
            created_by,
            created_at: now,
            updated_at: now,
        };
        template.validate()?;
        Ok(template)
    }

    fn validate(&self) -> DomainResult<()> {
        if self.name.is_empty() {
            return Err(DomainError::validation("Template name cannot be empty"));
        }
        self.theme.validate()?;
        if self.sections.iter().any(|s| s.title.trim().is_empty()) {
            return Err(DomainError::validation("Section title cannot be empty"));
        }
        Ok(())
    }

    pub fn update(&mut self, update: TemplateUpdate) -> DomainResult<()> {
        let mut next = self.clone();
        if let Some(name) = update.name {
            next.name = name.trim().to_string();
        }
        if let Some(description) = update.description {
            next.description = Some(description);
        }
        if let Some(theme) = update.theme {
            next.theme = theme;
        }
        if let Some(sections) = update.sections {
            next.sections = sections;
        }
        next.validate()?;
        next.updated_at = Utc::now();

        *self = next;
        Ok(())
    }

    /// Copies the template for `owner` with fresh identity and timestamps
    pub fn clone_for(&self, owner: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: format!("{} (Copy)", self.name),
            description: self.description.clone(),
            theme: self.theme.clone(),
            sections: self.sections.clone(),
            created_by: owner,
            created_at: now,
            updated_at: now,
        }
    }

    // ===== Getters =====

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn created_by(&self) -> Uuid {
        self.created_by
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

impl Document for Template {
    const COLLECTION: &'static str = "templates";

    fn id(&self) -> Uuid {
        self.id
    }
}
