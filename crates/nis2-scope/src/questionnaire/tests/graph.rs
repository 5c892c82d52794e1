use super::common::*;
use crate::questionnaire::catalog::{self, Visibility};
use crate::questionnaire::domain::{AnswerSet, AnswerValue, QuestionId, Ternary};
use crate::questionnaire::graph::{visible_questions, QuestionGraph};

fn ids(answers: &AnswerSet) -> Vec<QuestionId> {
    visible_questions(answers)
        .into_iter()
        .map(|question| question.id)
        .collect()
}

#[test]
fn empty_answers_show_only_the_opening_question() {
    assert_eq!(ids(&AnswerSet::new()), vec![QuestionId::PublicSectorEntity]);
}

#[test]
fn public_answer_reveals_public_subtypes() {
    let answers = AnswerSet::new().with(QuestionId::PublicSectorEntity, Ternary::Yes);

    assert_eq!(
        ids(&answers),
        vec![
            QuestionId::PublicSectorEntity,
            QuestionId::CentralGovernmentCrossBorder,
            QuestionId::MunicipalOrRegional,
        ]
    );
}

#[test]
fn unknown_organization_sees_both_routes() {
    let answers = AnswerSet::new().with(QuestionId::PublicSectorEntity, Ternary::Unknown);

    assert_eq!(
        ids(&answers),
        vec![
            QuestionId::PublicSectorEntity,
            QuestionId::CentralGovernmentCrossBorder,
            QuestionId::MunicipalOrRegional,
            QuestionId::SwedishEstablishment,
        ]
    );
}

#[test]
fn public_body_without_subtype_is_asked_about_establishment() {
    let answers = AnswerSet::new()
        .with(QuestionId::PublicSectorEntity, Ternary::Yes)
        .with(QuestionId::CentralGovernmentCrossBorder, Ternary::No);
    assert!(!ids(&answers).contains(&QuestionId::SwedishEstablishment));

    let answers = answers.with(QuestionId::MunicipalOrRegional, Ternary::No);
    assert!(ids(&answers).contains(&QuestionId::SwedishEstablishment));
}

#[test]
fn sector_selection_reveals_size_and_criticality_questions() {
    let before = ids(&private_swedish_entity());
    assert!(before.contains(&QuestionId::Nis2Industries));
    assert!(!before.contains(&QuestionId::MediumOrLargeEnterprise));

    let none_selected =
        private_swedish_entity().with_selections(QuestionId::Nis2Industries, ["none"]);
    assert!(!ids(&none_selected).contains(&QuestionId::MediumOrLargeEnterprise));

    let selected = private_swedish_entity().with_selections(QuestionId::DigitalServices, ["dns_service"]);
    let after = ids(&selected);
    for id in [
        QuestionId::MediumOrLargeEnterprise,
        QuestionId::SoleProviderCriticalService,
        QuestionId::SevereDisruptionImpact,
        QuestionId::NationallySignificant,
    ] {
        assert!(after.contains(&id), "{id} visible");
    }
}

#[test]
fn exemption_claim_reveals_trusted_service_reask() {
    let answers = municipality();
    assert!(!ids(&answers).contains(&QuestionId::TrustedServicesUnderExemption));

    let answers = answers.with(QuestionId::ExcludedAssembly, Ternary::Yes);
    assert_eq!(
        ids(&answers).last(),
        Some(&QuestionId::TrustedServicesUnderExemption)
    );
}

#[test]
fn visible_questions_follow_declaration_order() {
    let visible = visible_questions(&covered_private_entity());
    let ranks: Vec<usize> = visible
        .iter()
        .map(|question| catalog::declaration_index(question.id).expect("declared"))
        .collect();

    let mut sorted = ranks.clone();
    sorted.sort_unstable();
    assert_eq!(ranks, sorted);
}

#[test]
fn hidden_answers_are_kept_when_visibility_changes() {
    let mut answers = private_swedish_entity().with(QuestionId::TelecomProvider, Ternary::Yes);
    answers.insert(
        QuestionId::SwedishEstablishment,
        AnswerValue::choice(Ternary::No),
    );

    assert!(!ids(&answers).contains(&QuestionId::TelecomProvider));
    assert!(answers.contains(QuestionId::TelecomProvider));
}

#[test]
fn complete_answers_have_nothing_pending() {
    let graph = QuestionGraph::new();
    assert!(graph.is_complete(&covered_private_entity()));

    let partial = private_swedish_entity();
    let pending: Vec<QuestionId> = graph
        .pending(&partial)
        .into_iter()
        .map(|question| question.id)
        .collect();
    assert_eq!(pending.first(), Some(&QuestionId::TrustedServicesProvider));
    assert!(!graph.is_complete(&partial));
}

#[test]
fn appending_an_answer_only_hides_questions_that_read_it() {
    let samples = [
        AnswerSet::new(),
        private_swedish_entity(),
        municipality(),
        covered_private_entity(),
        AnswerSet::new().with(QuestionId::PublicSectorEntity, Ternary::Unknown),
    ];
    let values = [
        AnswerValue::choice(Ternary::Yes),
        AnswerValue::choice(Ternary::No),
        AnswerValue::choice(Ternary::Unknown),
        AnswerValue::selections(["energy"]),
        AnswerValue::selections(["none"]),
    ];

    for base in &samples {
        let before = visible_questions(base);
        for id in QuestionId::ALL {
            for value in &values {
                let mut extended = base.clone();
                extended.insert(id, value.clone());
                let after = visible_questions(&extended);

                for question in &before {
                    if question.visibility.references().contains(&id) {
                        continue;
                    }
                    assert!(
                        after.iter().any(|visible| visible.id == question.id),
                        "{} disappeared after answering {id}",
                        question.id
                    );
                }
            }
        }
    }
}

#[test]
fn predicates_read_only_declared_references() {
    let answers = covered_private_entity();
    for question in catalog::questions() {
        let expected = question.visibility.evaluate(&answers);
        let mut narrowed = AnswerSet::new();
        for id in question.visibility.references() {
            if let Some(value) = answers.get(*id) {
                narrowed.insert(*id, value.clone());
            }
        }
        assert_eq!(
            question.visibility.evaluate(&narrowed),
            expected,
            "{} reads an undeclared answer",
            question.id
        );
    }
    assert!(Visibility::Always.references().is_empty());
}

#[test]
fn reclamp_keeps_current_question_when_still_visible() {
    let graph = QuestionGraph::new();
    let visible = graph.visible_questions(&covered_private_entity());

    let position = graph.reclamp(QuestionId::TelecomProvider, &visible);

    assert_eq!(
        position.map(|index| visible[index].id),
        Some(QuestionId::TelecomProvider)
    );
}

#[test]
fn reclamp_moves_to_next_later_question() {
    let graph = QuestionGraph::new();
    let answers = private_swedish_entity().with_selections(QuestionId::Nis2Industries, ["energy"]);
    let mut changed = answers.clone();
    changed.insert(
        QuestionId::Nis2Industries,
        AnswerValue::selections(["none"]),
    );
    let visible = graph.visible_questions(&changed);

    let position = graph.reclamp(QuestionId::SevereDisruptionImpact, &visible);

    assert_eq!(
        position.map(|index| visible[index].id),
        Some(QuestionId::SecuritySensitiveActivity)
    );
}

#[test]
fn reclamp_falls_back_to_last_visible_question() {
    let graph = QuestionGraph::new();
    let answers = municipality().with(QuestionId::ExcludedAssembly, Ternary::Yes);
    let mut changed = answers.clone();
    changed.insert(
        QuestionId::ExcludedAssembly,
        AnswerValue::choice(Ternary::No),
    );
    let visible = graph.visible_questions(&changed);

    let position = graph.reclamp(QuestionId::TrustedServicesUnderExemption, &visible);

    assert_eq!(position, Some(visible.len() - 1));
    assert_eq!(graph.reclamp(QuestionId::PublicSectorEntity, &[]), None);
}
