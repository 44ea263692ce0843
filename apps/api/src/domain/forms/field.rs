use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::errors::{DomainError, DomainResult};

/// Answers submitted against a form, keyed by field key
pub type Answers = Map<String, Value>;

/// Input type of a form field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    LongText,
    Email,
    Url,
    Number,
    Checkbox,
    Select { options: Vec<String> },
    MultiSelect { options: Vec<String> },
    /// Integer rating from 1 up to `scale`
    Rating { scale: u8 },
}

/// A single configurable question on a registration or feedback form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormField {
    pub key: String,
    pub label: String,
    pub kind: FieldKind,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
}

impl FormField {
    pub fn new(key: &str, label: &str, kind: FieldKind, required: bool) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            kind,
            required,
            help_text: None,
        }
    }

    /// Checks one answer against the field's kind
    ///
    /// Returns a human-readable problem, or `None` when the answer is fine.
    fn check(&self, answer: &Value) -> Option<String> {
        let ok = match &self.kind {
            FieldKind::Text | FieldKind::LongText => answer.is_string(),
            FieldKind::Email => answer.as_str().is_some_and(|s| s.contains('@') && s.len() >= 3),
            FieldKind::Url => answer
                .as_str()
                .is_some_and(|s| s.starts_with("http://") || s.starts_with("https://")),
            FieldKind::Number => answer.is_number(),
            FieldKind::Checkbox => answer.is_boolean(),
            FieldKind::Select { options } => answer
                .as_str()
                .is_some_and(|s| options.iter().any(|o| o == s)),
            FieldKind::MultiSelect { options } => answer.as_array().is_some_and(|items| {
                items
                    .iter()
                    .all(|i| i.as_str().is_some_and(|s| options.iter().any(|o| o == s)))
            }),
            FieldKind::Rating { scale } => answer
                .as_u64()
                .is_some_and(|n| n >= 1 && n <= u64::from(*scale)),
        };

        if ok {
            None
        } else {
            Some(format!("field '{}' has an invalid value", self.key))
        }
    }
}

/// Whether an answer counts as "not provided"
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Validates a form definition
///
/// # Rules
/// - Keys and labels are non-empty, keys unique
/// - Select fields offer at least one option
/// - Rating scales are between 2 and 10
pub fn validate_fields(fields: &[FormField]) -> DomainResult<()> {
    let mut seen = HashSet::new();

    for field in fields {
        if field.key.trim().is_empty() {
            return Err(DomainError::validation("Form field key cannot be empty"));
        }
        if field.label.trim().is_empty() {
            return Err(DomainError::validation(format!(
                "Form field '{}' needs a label",
                field.key
            )));
        }
        if !seen.insert(field.key.as_str()) {
            return Err(DomainError::validation(format!(
                "Duplicate form field key: {}",
                field.key
            )));
        }
        match &field.kind {
            FieldKind::Select { options } | FieldKind::MultiSelect { options }
                if options.is_empty() =>
            {
                return Err(DomainError::validation(format!(
                    "Form field '{}' needs at least one option",
                    field.key
                )));
            }
            FieldKind::Rating { scale } if !(2..=10).contains(scale) => {
                return Err(DomainError::validation(format!(
                    "Form field '{}' rating scale must be between 2 and 10",
                    field.key
                )));
            }
            _ => {}
        }
    }

    Ok(())
}

/// Validates submitted answers against a form definition
///
/// All problems are collected into one validation error so the caller
/// can fix them in a single round trip.
pub fn validate_answers(fields: &[FormField], answers: &Answers) -> DomainResult<()> {
    let mut problems = Vec::new();

    for key in answers.keys() {
        if !fields.iter().any(|f| &f.key == key) {
            problems.push(format!("field '{}' is not part of this form", key));
        }
    }

    for field in fields {
        match answers.get(&field.key) {
            Some(value) if !is_blank(value) => {
                if let Some(problem) = field.check(value) {
                    problems.push(problem);
                }
            }
            _ if field.required => problems.push(format!("field '{}' is required", field.key)),
            _ => {}
        }
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(DomainError::validation(format!(
            "Invalid answers: {}",
            problems.join("; ")
        )))
    }
}
