use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::field::{validate_answers, validate_fields, Answers, FieldKind, FormField};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::repositories::Document;

/// Who a feedback form is meant for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackAudience {
    /// Registered participants of the event
    Participants,
    /// Users who may judge
    Judges,
    Everyone,
}

/// Post-event feedback questionnaire
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackFormConfig {
    id: Uuid,
    event_id: Uuid,
    title: String,
    description: Option<String>,
    audience: FeedbackAudience,
    questions: Vec<FormField>,
    is_open: bool,
    created_by: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Partial update of a feedback form
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedbackFormUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub audience: Option<FeedbackAudience>,
    pub questions: Option<Vec<FormField>>,
    pub is_open: Option<bool>,
}

impl FeedbackFormConfig {
    /// Creates a closed form; open it once the questions are final
    pub fn new(
        event_id: Uuid,
        title: String,
        description: Option<String>,
        audience: FeedbackAudience,
        questions: Vec<FormField>,
        created_by: Uuid,
    ) -> DomainResult<Self> {
        Self::check_title(&title)?;
        Self::check_questions(&questions)?;

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            event_id,
            title: title.trim().to_string(),
            description,
            audience,
            questions,
            is_open: false,
            created_by,
            created_at: now,
            updated_at: now,
        })
    }

    fn check_title(title: &str) -> DomainResult<()> {
        if title.trim().is_empty() {
            return Err(DomainError::validation("Form title cannot be empty"));
        }
        Ok(())
    }

    fn check_questions(questions: &[FormField]) -> DomainResult<()> {
        if questions.is_empty() {
            return Err(DomainError::validation(
                "Feedback form needs at least one question",
            ));
        }
        validate_fields(questions)
    }

    /// Applies an update
    ///
    /// Questions are frozen once any response exists.
    pub fn update(&mut self, update: FeedbackFormUpdate, has_responses: bool) -> DomainResult<()> {
        if let Some(title) = &update.title {
            Self::check_title(title)?;
        }
        if let Some(questions) = &update.questions {
            if has_responses {
                return Err(DomainError::conflict(
                    "Questions cannot change after responses were submitted",
                ));
            }
            Self::check_questions(questions)?;
        }

        if let Some(title) = update.title {
            self.title = title.trim().to_string();
        }
        if let Some(description) = update.description {
            self.description = Some(description);
        }
        if let Some(audience) = update.audience {
            self.audience = audience;
        }
        if let Some(questions) = update.questions {
            self.questions = questions;
        }
        if let Some(is_open) = update.is_open {
            self.is_open = is_open;
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Validates a response before it is accepted
    pub fn accept(&self, answers: &Answers) -> DomainResult<()> {
        if !self.is_open {
            return Err(DomainError::validation("Feedback form is closed"));
        }
        validate_answers(&self.questions, answers)
    }

    // ===== Getters =====

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn event_id(&self) -> Uuid {
        self.event_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn audience(&self) -> FeedbackAudience {
        self.audience
    }

    pub fn questions(&self) -> &[FormField] {
        &self.questions
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn created_by(&self) -> Uuid {
        self.created_by
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Document for FeedbackFormConfig {
    const COLLECTION: &'static str = "feedback_forms";

    fn id(&self) -> Uuid {
        self.id
    }
}

/// One respondent's answers to a feedback form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackResponse {
    pub id: Uuid,
    pub form_id: Uuid,
    pub event_id: Uuid,
    pub respondent_id: Uuid,
    pub answers: Answers,
    pub submitted_at: DateTime<Utc>,
}

impl FeedbackResponse {
    pub fn new(form: &FeedbackFormConfig, respondent_id: Uuid, answers: Answers) -> Self {
        Self {
            id: Uuid::new_v4(),
            form_id: form.id(),
            event_id: form.event_id(),
            respondent_id,
            answers,
            submitted_at: Utc::now(),
        }
    }
}

impl Document for FeedbackResponse {
    const COLLECTION: &'static str = "feedback_responses";

    fn id(&self) -> Uuid {
        self.id
    }
}

// ===== Summaries =====

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionCount {
    pub option: String,
    pub count: u64,
}

/// Aggregated answers for one question
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestionSummary {
    Rating {
        key: String,
        label: String,
        answered: u64,
        average: Option<f64>,
        /// `distribution[i]` counts answers of rating `i + 1`
        distribution: Vec<u64>,
    },
    Choice {
        key: String,
        label: String,
        answered: u64,
        counts: Vec<OptionCount>,
    },
    Numeric {
        key: String,
        label: String,
        answered: u64,
        average: Option<f64>,
    },
    Checkbox {
        key: String,
        label: String,
        yes: u64,
        no: u64,
    },
    Text {
        key: String,
        label: String,
        answers: Vec<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedbackSummary {
    pub form_id: Uuid,
    pub title: String,
    pub response_count: u64,
    pub questions: Vec<QuestionSummary>,
}

fn average(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

fn summarize_question(field: &FormField, responses: &[FeedbackResponse]) -> QuestionSummary {
    let answers: Vec<&serde_json::Value> = responses
        .iter()
        .filter_map(|r| r.answers.get(&field.key))
        .filter(|v| !v.is_null())
        .collect();
    let key = field.key.clone();
    let label = field.label.clone();

    match &field.kind {
        FieldKind::Rating { scale } => {
            let mut distribution = vec![0u64; usize::from(*scale)];
            let mut values = Vec::new();
            for n in answers.iter().filter_map(|v| v.as_u64()) {
                if n >= 1 && n <= u64::from(*scale) {
                    distribution[(n - 1) as usize] += 1;
                    values.push(n as f64);
                }
            }
            QuestionSummary::Rating {
                key,
                label,
                answered: values.len() as u64,
                average: average(&values),
                distribution,
            }
        }
        FieldKind::Select { options } | FieldKind::MultiSelect { options } => {
            let chosen: Vec<&str> = answers
                .iter()
                .flat_map(|v| match v {
                    serde_json::Value::String(s) => vec![s.as_str()],
                    serde_json::Value::Array(items) => {
                        items.iter().filter_map(|i| i.as_str()).collect()
                    }
                    _ => vec![],
                })
                .collect();
            let counts = options
                .iter()
                .map(|option| OptionCount {
                    option: option.clone(),
                    count: chosen.iter().filter(|c| **c == option.as_str()).count() as u64,
                })
                .collect();
            QuestionSummary::Choice {
                key,
                label,
                answered: answers.len() as u64,
                counts,
            }
        }
        FieldKind::Number => {
            let values: Vec<f64> = answers.iter().filter_map(|v| v.as_f64()).collect();
            QuestionSummary::Numeric {
                key,
                label,
                answered: values.len() as u64,
                average: average(&values),
            }
        }
        FieldKind::Checkbox => {
            let yes = answers.iter().filter(|v| v.as_bool() == Some(true)).count() as u64;
            let no = answers.iter().filter(|v| v.as_bool() == Some(false)).count() as u64;
            QuestionSummary::Checkbox { key, label, yes, no }
        }
        FieldKind::Text | FieldKind::LongText | FieldKind::Email | FieldKind::Url => {
            QuestionSummary::Text {
                key,
                label,
                answers: answers
                    .iter()
                    .filter_map(|v| v.as_str())
                    .filter(|s| !s.trim().is_empty())
                    .map(str::to_string)
                    .collect(),
            }
        }
    }
}

/// Aggregates all responses of a form, question by question
pub fn summarize(form: &FeedbackFormConfig, responses: &[FeedbackResponse]) -> FeedbackSummary {
    FeedbackSummary {
        form_id: form.id(),
        title: form.title().to_string(),
        response_count: responses.len() as u64,
        questions: form
            .questions()
            .iter()
            .map(|q| summarize_question(q, responses))
            .collect(),
    }
}
