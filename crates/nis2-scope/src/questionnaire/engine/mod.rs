mod policy;
mod rules;

pub use policy::{Outcome, UncertaintyReason};

use super::domain::{AnswerSet, QuestionId};
use policy::decide_outcome;
use serde::{Deserialize, Serialize};

/// Stateless evaluator applying the applicability and exemption rules to an answer set.
///
/// Total over every answer set: partial, empty or malformed input always yields exactly one
/// outcome.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssessmentEngine;

impl AssessmentEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn assess(&self, answers: &AnswerSet) -> Assessment {
        let (findings, signals) = rules::evaluate_signals(answers);
        let outcome = decide_outcome(&signals);

        Assessment {
            outcome,
            message: outcome.message().to_string(),
            details: outcome.details().to_string(),
            category: None,
            findings,
            uncertainty: signals.uncertainty,
        }
    }
}

/// Assess an answer set with the fixed rule set.
pub fn assess(answers: &AnswerSet) -> Assessment {
    AssessmentEngine::new().assess(answers)
}

/// Regulatory severity tier for covered entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityCategory {
    Essential,
    Important,
}

/// Rule family a finding belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    PublicDirectCoverage,
    SwedishEstablishment,
    SecondaryCriterion,
    Exemption,
    TrustedServiceOverride,
    Uncertainty,
}

/// Single rule that matched during evaluation, kept so outcomes can be explained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleFinding {
    pub rule: RuleKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<QuestionId>,
    pub note: String,
}

/// Immutable result of one assessment. A changed answer requires a new assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assessment {
    pub outcome: Outcome,
    pub message: String,
    pub details: String,
    /// Never derived by the engine; reserved for downstream annotation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<EntityCategory>,
    #[serde(default)]
    pub findings: Vec<RuleFinding>,
    #[serde(default)]
    pub uncertainty: Vec<UncertaintyReason>,
}

impl Assessment {
    pub fn summary(&self) -> String {
        match self.outcome {
            Outcome::Uncertain if !self.uncertainty.is_empty() => {
                let reasons: Vec<String> =
                    self.uncertainty.iter().map(UncertaintyReason::summary).collect();
                format!("{} ({})", self.message, reasons.join("; "))
            }
            _ => self.message.clone(),
        }
    }
}
