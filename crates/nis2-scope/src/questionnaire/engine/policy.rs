use serde::{Deserialize, Serialize};

use super::rules::{CoverageSignals, EXEMPTION_UNKNOWN_THRESHOLD, SECONDARY_UNKNOWN_THRESHOLD};

/// Final classification of an assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    Covered,
    NotCovered,
    Exempt,
    Uncertain,
}

impl Outcome {
    pub const fn label(self) -> &'static str {
        match self {
            Outcome::Covered => "COVERED",
            Outcome::NotCovered => "NOT_COVERED",
            Outcome::Exempt => "EXEMPT",
            Outcome::Uncertain => "UNCERTAIN",
        }
    }

    pub const fn message(self) -> &'static str {
        match self {
            Outcome::Covered => "The Cybersecurity Act applies to your organization.",
            Outcome::NotCovered => {
                "The Cybersecurity Act does not appear to apply to your organization."
            }
            Outcome::Exempt => "Your organization appears to be exempt from the Cybersecurity Act.",
            Outcome::Uncertain => {
                "The applicability of the Cybersecurity Act could not be determined."
            }
        }
    }

    pub const fn details(self) -> &'static str {
        match self {
            Outcome::Covered => {
                "Based on your answers your organization falls within the scope of the Swedish \
                 Cybersecurity Act. It must register with the supervisory authority, carry out \
                 systematic and risk-based information security work, and report significant \
                 incidents within the statutory deadlines."
            }
            Outcome::NotCovered => {
                "Based on your answers none of the applicability criteria of the Swedish \
                 Cybersecurity Act are met. Repeat the assessment if the activities, size or \
                 establishment of your organization change."
            }
            Outcome::Exempt => {
                "Your organization would otherwise fall within the scope of the act, but one of \
                 the exemptions applies. Confirm the exemption with the supervisory authority and \
                 keep documentation supporting it."
            }
            Outcome::Uncertain => {
                "Too many answers were unknown to classify your organization reliably. Gather \
                 the missing information and repeat the assessment, or contact the supervisory \
                 authority for guidance."
            }
        }
    }
}

/// Why an assessment was forced to an uncertain outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum UncertaintyReason {
    UnresolvedOrganizationType,
    UnknownEstablishment,
    UnknownSecondaryCriteria { count: usize },
    UnknownExemptions { count: usize },
}

impl UncertaintyReason {
    pub fn summary(&self) -> String {
        match self {
            UncertaintyReason::UnresolvedOrganizationType => {
                "organization type is unknown and no answer resolves it".to_string()
            }
            UncertaintyReason::UnknownEstablishment => {
                "private organization with unknown establishment in Sweden".to_string()
            }
            UncertaintyReason::UnknownSecondaryCriteria { count } => format!(
                "{count} applicability criteria unknown (threshold {SECONDARY_UNKNOWN_THRESHOLD})"
            ),
            UncertaintyReason::UnknownExemptions { count } => format!(
                "{count} exemption questions unknown (threshold {EXEMPTION_UNKNOWN_THRESHOLD})"
            ),
        }
    }
}

/// First match wins: uncertainty, coverage, exemption, otherwise not covered.
pub(crate) fn decide_outcome(signals: &CoverageSignals) -> Outcome {
    if !signals.uncertainty.is_empty() {
        return Outcome::Uncertain;
    }

    if signals.potentially_covered
        && (!signals.exemption_applies || signals.trusted_service_override)
    {
        return Outcome::Covered;
    }

    if signals.potentially_covered && signals.exemption_applies {
        return Outcome::Exempt;
    }

    Outcome::NotCovered
}

