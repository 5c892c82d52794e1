//! Applicability questionnaire for the Swedish Cybersecurity Act.
//!
//! The core is two stateless computations: [`visible_questions`] decides which questions
//! apply to a partial answer set, and [`assess`] classifies a finished one. Everything else
//! in this module (flat storage records, the submission service and HTTP router) is I/O
//! around those two calls.

pub mod catalog;
pub mod domain;
pub mod engine;
pub mod graph;
pub mod record;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use catalog::{section_title, AnswerType, Question, Visibility};
pub use domain::{
    AnswerSet, AnswerState, AnswerValue, OrganizationType, QuestionId, Ternary, NONE_OPTION,
    UNKNOWN_OPTION,
};
pub use engine::{
    assess, Assessment, AssessmentEngine, EntityCategory, Outcome, RuleFinding, RuleKind,
    UncertaintyReason,
};
pub use graph::{visible_questions, QuestionGraph};
pub use record::FlatRecord;
pub use repository::{
    RepositoryError, SubmissionId, SubmissionRecord, SubmissionRepository, SubmissionView,
};
pub use router::{questionnaire_router, VisibilityRequest};
pub use service::{AssessmentService, SubmissionReceipt, VisibilitySnapshot};
