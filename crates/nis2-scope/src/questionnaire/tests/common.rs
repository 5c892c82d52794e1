use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::questionnaire::domain::{AnswerSet, QuestionId, Ternary};
use crate::questionnaire::repository::{
    RepositoryError, SubmissionId, SubmissionRecord, SubmissionRepository,
};
use crate::questionnaire::{questionnaire_router, AssessmentService};

pub(super) fn private_swedish_entity() -> AnswerSet {
    AnswerSet::new()
        .with(QuestionId::PublicSectorEntity, Ternary::No)
        .with(QuestionId::SwedishEstablishment, Ternary::Yes)
}

pub(super) fn covered_private_entity() -> AnswerSet {
    private_swedish_entity()
        .with(QuestionId::TrustedServicesProvider, Ternary::No)
        .with_selections(QuestionId::Nis2Industries, ["energy"])
        .with_selections(QuestionId::DigitalServices, ["none"])
        .with(QuestionId::TelecomProvider, Ternary::No)
        .with(QuestionId::PrivateEducationProvider, Ternary::No)
        .with(QuestionId::MediumOrLargeEnterprise, Ternary::Yes)
        .with(QuestionId::SoleProviderCriticalService, Ternary::No)
        .with(QuestionId::SevereDisruptionImpact, Ternary::No)
        .with(QuestionId::NationallySignificant, Ternary::No)
        .with(QuestionId::SecuritySensitiveActivity, Ternary::No)
        .with(QuestionId::PrivateSecuritySensitiveOnly, Ternary::No)
        .with(QuestionId::ExcludedGovernmentBody, Ternary::No)
        .with(QuestionId::ExcludedAssembly, Ternary::No)
}

pub(super) fn municipality() -> AnswerSet {
    AnswerSet::new()
        .with(QuestionId::PublicSectorEntity, Ternary::Yes)
        .with(QuestionId::CentralGovernmentCrossBorder, Ternary::No)
        .with(QuestionId::MunicipalOrRegional, Ternary::Yes)
}

pub(super) fn build_service() -> (AssessmentService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = AssessmentService::new(repository.clone());
    (service, repository)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<SubmissionId, SubmissionRecord>>>,
}

impl SubmissionRepository for MemoryRepository {
    fn insert(&self, record: SubmissionRecord) -> Result<SubmissionRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.submission_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.submission_id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &SubmissionId) -> Result<Option<SubmissionRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn recent(&self, limit: usize) -> Result<Vec<SubmissionRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut records: Vec<SubmissionRecord> = guard.values().cloned().collect();
        records.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        records.truncate(limit);
        Ok(records)
    }
}

/// Repository that fails until `recover` is called.
#[derive(Default)]
pub(super) struct FlakyRepository {
    pub(super) online: Mutex<bool>,
    pub(super) inner: MemoryRepository,
}

impl FlakyRepository {
    pub(super) fn recover(&self) {
        *self.online.lock().expect("flag mutex poisoned") = true;
    }

    fn check(&self) -> Result<(), RepositoryError> {
        if *self.online.lock().expect("flag mutex poisoned") {
            Ok(())
        } else {
            Err(RepositoryError::Unavailable("database offline".to_string()))
        }
    }
}

impl SubmissionRepository for FlakyRepository {
    fn insert(&self, record: SubmissionRecord) -> Result<SubmissionRecord, RepositoryError> {
        self.check()?;
        self.inner.insert(record)
    }

    fn fetch(&self, id: &SubmissionId) -> Result<Option<SubmissionRecord>, RepositoryError> {
        self.check()?;
        self.inner.fetch(id)
    }

    fn recent(&self, limit: usize) -> Result<Vec<SubmissionRecord>, RepositoryError> {
        self.check()?;
        self.inner.recent(limit)
    }
}

pub(super) struct UnavailableRepository;

impl SubmissionRepository for UnavailableRepository {
    fn insert(&self, _record: SubmissionRecord) -> Result<SubmissionRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &SubmissionId) -> Result<Option<SubmissionRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn recent(&self, _limit: usize) -> Result<Vec<SubmissionRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn router_with_service(service: AssessmentService<MemoryRepository>) -> axum::Router {
    questionnaire_router(Arc::new(service))
}
