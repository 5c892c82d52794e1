use super::super::catalog::{
    self, has_swedish_establishment, public_direct_coverage, Visibility, EXEMPTION_QUESTIONS,
};
use super::super::domain::{AnswerSet, OrganizationType, QuestionId};
use super::{RuleFinding, RuleKind, UncertaintyReason};

/// Explicit UNKNOWN answers among the secondary criteria that force an uncertain outcome.
pub(crate) const SECONDARY_UNKNOWN_THRESHOLD: usize = 3;

/// Explicit UNKNOWN answers among the applicable exemption questions that force an uncertain outcome.
pub(crate) const EXEMPTION_UNKNOWN_THRESHOLD: usize = 2;

/// Criteria that bring an establishment in Sweden into scope, in evaluation order.
pub(crate) const SECONDARY_CRITERIA: [QuestionId; 9] = [
    QuestionId::TrustedServicesProvider,
    QuestionId::MediumOrLargeEnterprise,
    QuestionId::Nis2Industries,
    QuestionId::PrivateEducationProvider,
    QuestionId::TelecomProvider,
    QuestionId::DigitalServices,
    QuestionId::SoleProviderCriticalService,
    QuestionId::SevereDisruptionImpact,
    QuestionId::NationallySignificant,
];

pub(crate) struct CoverageSignals {
    pub potentially_covered: bool,
    pub exemption_applies: bool,
    pub trusted_service_override: bool,
    pub uncertainty: Vec<UncertaintyReason>,
}

fn criterion_met(answers: &AnswerSet, id: QuestionId) -> bool {
    let question_is_multi_select = catalog::question(id)
        .map(|question| question.is_multi_select())
        .unwrap_or(false);

    if question_is_multi_select {
        answers.has_selections(id)
    } else {
        answers.is_yes(id)
    }
}

pub(crate) fn evaluate_signals(answers: &AnswerSet) -> (Vec<RuleFinding>, CoverageSignals) {
    let mut findings = Vec::new();

    // Potential coverage.
    let public_direct = public_direct_coverage(answers);
    if public_direct {
        let question = if answers.is_yes(QuestionId::CentralGovernmentCrossBorder) {
            QuestionId::CentralGovernmentCrossBorder
        } else {
            QuestionId::MunicipalOrRegional
        };
        findings.push(RuleFinding {
            rule: RuleKind::PublicDirectCoverage,
            question: Some(question),
            note: "public body covered directly by the act".to_string(),
        });
    }

    let swedish_establishment = has_swedish_establishment(answers);
    if swedish_establishment {
        findings.push(RuleFinding {
            rule: RuleKind::SwedishEstablishment,
            question: Some(QuestionId::SwedishEstablishment),
            note: "main establishment in Sweden".to_string(),
        });
    }

    let met_criteria: Vec<QuestionId> = SECONDARY_CRITERIA
        .into_iter()
        .filter(|id| criterion_met(answers, *id))
        .collect();
    let meets_secondary_criteria = !met_criteria.is_empty();

    let private_potential_coverage = swedish_establishment && meets_secondary_criteria;
    if private_potential_coverage {
        for id in &met_criteria {
            findings.push(RuleFinding {
                rule: RuleKind::SecondaryCriterion,
                question: Some(*id),
                note: format!("applicability criterion met: {id}"),
            });
        }
    }

    let potentially_covered = public_direct || private_potential_coverage;

    // Potential exemption.
    let claimed_exemptions: Vec<QuestionId> = EXEMPTION_QUESTIONS
        .into_iter()
        .filter(|id| answers.is_yes(*id))
        .collect();
    let exemption_applies = !claimed_exemptions.is_empty();
    for id in &claimed_exemptions {
        findings.push(RuleFinding {
            rule: RuleKind::Exemption,
            question: Some(*id),
            note: format!("exemption claimed: {id}"),
        });
    }

    let override_source = [
        QuestionId::TrustedServicesProvider,
        QuestionId::TrustedServicesUnderExemption,
    ]
    .into_iter()
    .find(|id| answers.is_yes(*id));
    let trusted_service_override = override_source.is_some();
    if let Some(id) = override_source {
        if exemption_applies {
            findings.push(RuleFinding {
                rule: RuleKind::TrustedServiceOverride,
                question: Some(id),
                note: "trust service providers are covered regardless of exemptions".to_string(),
            });
        }
    }

    // Uncertainty. Explicit UNKNOWN criteria keep coverage possible for this stage only.
    let possibly_covered = potentially_covered
        || (swedish_establishment
            && SECONDARY_CRITERIA
                .into_iter()
                .any(|id| answers.is_unknown(id)));
    let uncertainty = detect_uncertainty(answers, potentially_covered, possibly_covered);
    for reason in &uncertainty {
        findings.push(RuleFinding {
            rule: RuleKind::Uncertainty,
            question: None,
            note: reason.summary(),
        });
    }

    let signals = CoverageSignals {
        potentially_covered,
        exemption_applies,
        trusted_service_override,
        uncertainty,
    };

    (findings, signals)
}

fn detect_uncertainty(
    answers: &AnswerSet,
    potentially_covered: bool,
    possibly_covered: bool,
) -> Vec<UncertaintyReason> {
    let mut reasons = Vec::new();
    let organization = answers.organization_type();

    let type_resolved_by_answers = [
        QuestionId::CentralGovernmentCrossBorder,
        QuestionId::MunicipalOrRegional,
        QuestionId::SwedishEstablishment,
    ]
    .into_iter()
    .any(|id| answers.is_yes(id));
    if organization == OrganizationType::Unknown && !type_resolved_by_answers {
        reasons.push(UncertaintyReason::UnresolvedOrganizationType);
    }

    let resolves_to_private = organization == OrganizationType::Private
        || (answers.is_no(QuestionId::CentralGovernmentCrossBorder)
            && answers.is_no(QuestionId::MunicipalOrRegional));
    if resolves_to_private && answers.is_unknown(QuestionId::SwedishEstablishment) {
        reasons.push(UncertaintyReason::UnknownEstablishment);
    }

    if possibly_covered {
        let unknown_criteria = SECONDARY_CRITERIA
            .into_iter()
            .filter(|id| answers.is_unknown(*id))
            .count();
        if unknown_criteria >= SECONDARY_UNKNOWN_THRESHOLD {
            reasons.push(UncertaintyReason::UnknownSecondaryCriteria {
                count: unknown_criteria,
            });
        }
    }

    if potentially_covered {
        let mut unknown_exemptions = EXEMPTION_QUESTIONS
            .into_iter()
            .filter(|id| answers.is_unknown(*id))
            .count();
        if Visibility::ExemptionClaimed.evaluate(answers)
            && answers.is_unknown(QuestionId::TrustedServicesUnderExemption)
        {
            unknown_exemptions += 1;
        }
        if unknown_exemptions >= EXEMPTION_UNKNOWN_THRESHOLD {
            reasons.push(UncertaintyReason::UnknownExemptions {
                count: unknown_exemptions,
            });
        }
    }

    reasons
}
