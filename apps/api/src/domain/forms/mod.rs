// Configurable forms: registration questions and feedback questionnaires

pub mod feedback;
pub mod field;
pub mod registration;

pub use feedback::{
    summarize, FeedbackAudience, FeedbackFormConfig, FeedbackFormUpdate, FeedbackResponse,
    FeedbackSummary, QuestionSummary,
};
pub use field::{validate_answers, validate_fields, Answers, FieldKind, FormField};
pub use registration::RegistrationFormConfig;
