use super::common::*;
use crate::questionnaire::domain::{AnswerSet, QuestionId, Ternary};
use crate::questionnaire::engine::Outcome;
use crate::questionnaire::repository::{RepositoryError, SubmissionId, SubmissionRepository};
use crate::questionnaire::AssessmentService;
use std::sync::Arc;

#[test]
fn submit_stores_flat_answers_and_assessment() {
    let (service, repository) = build_service();

    let receipt = service.submit(&covered_private_entity());

    assert!(receipt.persisted);
    assert!(receipt.complete);
    assert_eq!(receipt.assessment.outcome, Outcome::Covered);
    let stored = repository
        .fetch(&receipt.submission_id)
        .expect("fetch succeeds")
        .expect("record present");
    assert_eq!(stored.answers.get(QuestionId::SwedishEstablishment), Some("yes"));
    assert_eq!(
        stored.answers.get(QuestionId::Nis2Industries),
        Some(r#"["energy"]"#)
    );
    assert_eq!(
        stored.answers.to_answers(),
        covered_private_entity()
    );
}

#[test]
fn submit_marks_partial_sessions_incomplete() {
    let (service, _) = build_service();

    let receipt = service.submit(&private_swedish_entity());

    assert!(!receipt.complete);
    assert_eq!(receipt.assessment.outcome, Outcome::NotCovered);
}

#[test]
fn submit_returns_assessment_when_storage_fails() {
    let service = AssessmentService::new(Arc::new(UnavailableRepository));

    let receipt = service.submit(&municipality());

    assert!(!receipt.persisted);
    assert_eq!(receipt.assessment.outcome, Outcome::Covered);
    assert_eq!(service.pending_fallback(), 1);
    let cached = service
        .get(&receipt.submission_id)
        .expect("cached record readable");
    assert_eq!(cached.assessment, receipt.assessment);
}

#[test]
fn fallback_cache_is_bounded() {
    let service = AssessmentService::with_fallback_capacity(Arc::new(UnavailableRepository), 2);

    let first = service.submit(&municipality());
    service.submit(&municipality());
    service.submit(&municipality());

    assert_eq!(service.pending_fallback(), 2);
    match service.get(&first.submission_id) {
        Err(RepositoryError::Unavailable(_)) => {}
        other => panic!("expected oldest submission to be dropped, got {other:?}"),
    }
}

#[test]
fn flush_fallback_stores_cached_submissions_once_repository_recovers() {
    let repository = Arc::new(FlakyRepository::default());
    let service = AssessmentService::new(repository.clone());

    let receipt = service.submit(&covered_private_entity());
    assert!(!receipt.persisted);
    match service.flush_fallback() {
        Err(RepositoryError::Unavailable(_)) => {}
        other => panic!("expected unavailable error, got {other:?}"),
    }
    assert_eq!(service.pending_fallback(), 1);

    repository.recover();
    let stored = service.flush_fallback().expect("flush succeeds");

    assert_eq!(stored, 1);
    assert_eq!(service.pending_fallback(), 0);
    assert!(repository
        .fetch(&receipt.submission_id)
        .expect("fetch succeeds")
        .is_some());
}

#[test]
fn submit_retries_cached_submissions_first() {
    let repository = Arc::new(FlakyRepository::default());
    let service = AssessmentService::new(repository.clone());

    let cached = service.submit(&municipality());
    assert!(!cached.persisted);

    repository.recover();
    let receipt = service.submit(&covered_private_entity());

    assert!(receipt.persisted);
    assert_eq!(service.pending_fallback(), 0);
    assert!(repository
        .fetch(&cached.submission_id)
        .expect("fetch succeeds")
        .is_some());
}

#[test]
fn recent_includes_cached_submissions() {
    let repository = Arc::new(FlakyRepository::default());
    let service = AssessmentService::new(repository.clone());

    let cached = service.submit(&municipality());
    repository.recover();

    let recent = service.recent(20).expect("recent succeeds");

    assert_eq!(service.pending_fallback(), 1);
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].submission_id, cached.submission_id);
}

#[test]
fn get_propagates_not_found() {
    let (service, _) = build_service();

    match service.get(&SubmissionId("missing".to_string())) {
        Err(RepositoryError::NotFound) => {}
        other => panic!("expected not found error, got {other:?}"),
    }
}

#[test]
fn recent_lists_newest_first() {
    let (service, _) = build_service();
    let earlier = service.submit(&municipality());
    service.submit(&covered_private_entity());

    let recent = service.recent(2).expect("recent succeeds");

    assert_eq!(recent.len(), 2);
    assert!(recent[0].submitted_at >= recent[1].submitted_at);
    assert!(recent
        .iter()
        .any(|record| record.submission_id == earlier.submission_id));
}

#[test]
fn visible_snapshot_reclamps_position() {
    let (service, _) = build_service();
    let answers = AnswerSet::new()
        .with(QuestionId::PublicSectorEntity, Ternary::No)
        .with(QuestionId::SwedishEstablishment, Ternary::No);

    let snapshot = service.visible(&answers, Some(QuestionId::TelecomProvider));

    assert_eq!(snapshot.questions.len(), 2);
    assert!(snapshot.complete);
    assert!(snapshot.pending.is_empty());
    assert_eq!(snapshot.position, Some(1));
}
