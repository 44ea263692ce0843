// Prompt templates for LLM interactions
//
// Prompts are named and versioned so generated output can be traced back to
// the template that produced it.

use std::collections::HashMap;

use serde::Serialize;

use crate::domain::event::Event;
use crate::domain::placeholders::substitute;
use crate::domain::project::Project;
use crate::domain::team::Team;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromptTemplate {
    pub name: String,
    pub version: String,
    pub system: String,
    pub user_template: String,
}

impl PromptTemplate {
    /// Render the user template with variables
    pub fn render(&self, variables: &HashMap<String, String>) -> String {
        substitute(&self.user_template, variables)
    }
}

fn or_none(value: Option<&str>) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or("(none yet)")
        .to_string()
}

/// Variables describing a project, its team and its event
pub fn project_variables(project: &Project, team: &Team, event: &Event) -> HashMap<String, String> {
    let technologies = if project.technologies().is_empty() {
        "(not chosen yet)".to_string()
    } else {
        project.technologies().join(", ")
    };

    HashMap::from([
        ("project_title".to_string(), project.title().to_string()),
        ("project_tagline".to_string(), project.tagline().unwrap_or_default().to_string()),
        (
            "project_description".to_string(),
            or_none(Some(project.description())),
        ),
        ("technologies".to_string(), technologies),
        ("repository_url".to_string(), or_none(project.repository_url())),
        ("demo_url".to_string(), or_none(project.demo_url())),
        ("team_name".to_string(), team.name().to_string()),
        ("team_size".to_string(), team.size().to_string()),
        ("event_name".to_string(), event.name().to_string()),
        ("event_description".to_string(), or_none(Some(event.description()))),
        (
            "event_ends_at".to_string(),
            event.ends_at().format("%Y-%m-%d %H:%M UTC").to_string(),
        ),
    ])
}

/// First `max` sentences of `text`, used when no LLM summary is available
pub fn leading_sentences(text: &str, max: usize) -> String {
    let mut out = String::new();
    let mut count = 0;
    let mut chars = text.trim().chars().peekable();

    while let Some(c) = chars.next() {
        out.push(c);
        if matches!(c, '.' | '!' | '?') && chars.peek().map_or(true, |n| n.is_whitespace()) {
            count += 1;
            if count == max {
                break;
            }
        }
    }

    out.trim().to_string()
}

pub mod library {
    use super::PromptTemplate;

    /// Instructions handed to an AI coding assistant to scaffold a project
    pub fn builder_prompt() -> PromptTemplate {
        PromptTemplate {
            name: "builder_prompt".to_string(),
            version: "1.1.0".to_string(),
            system: "You are a senior engineer mentoring a hackathon team. \
                     Rewrite the following build instructions so an AI coding assistant \
                     can follow them step by step. Keep every fact, tighten the wording, \
                     order the work so a demo is ready before the deadline, and return \
                     only the improved instructions."
                .to_string(),
            user_template: "You are helping the team \"{{team_name}}\" ({{team_size}} members) \
                            build a project for {{event_name}}.\n\n\
                            Event theme: {{event_description}}\n\
                            Submission deadline: {{event_ends_at}}\n\n\
                            Project: {{project_title}}\n\
                            {{project_tagline}}\n\n\
                            Description:\n{{project_description}}\n\n\
                            Technologies: {{technologies}}\n\
                            Repository: {{repository_url}}\n\
                            Demo: {{demo_url}}\n\n\
                            Please:\n\
                            1. Propose a minimal architecture using the listed technologies\n\
                            2. Break the build into ordered milestones that fit before the deadline\n\
                            3. Scaffold the repository layout and key files\n\
                            4. Call out the riskiest part and how to de-risk it early\n\
                            5. Suggest what to show in a three-minute demo"
                .to_string(),
        }
    }

    pub fn project_summary() -> PromptTemplate {
        PromptTemplate {
            name: "project_summary".to_string(),
            version: "1.0.0".to_string(),
            system: "You summarize hackathon projects for judges. \
                     Reply with at most two plain sentences and no preamble."
                .to_string(),
            user_template: "Project: {{project_title}}\n\
                            Technologies: {{technologies}}\n\n\
                            {{project_description}}"
                .to_string(),
        }
    }
}
