use metrics_exporter_prometheus::PrometheusHandle;
use nis2_scope::error::AppError;
use nis2_scope::questionnaire::{
    AnswerSet, QuestionId, RepositoryError, SubmissionId, SubmissionRecord, SubmissionRepository,
};
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemorySubmissionRepository {
    records: Arc<Mutex<HashMap<SubmissionId, SubmissionRecord>>>,
}

impl SubmissionRepository for InMemorySubmissionRepository {
    fn insert(&self, record: SubmissionRecord) -> Result<SubmissionRecord, RepositoryError> {
        let mut guard = self.records.lock().map_err(|_| poisoned())?;
        if guard.contains_key(&record.submission_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.submission_id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &SubmissionId) -> Result<Option<SubmissionRecord>, RepositoryError> {
        let guard = self.records.lock().map_err(|_| poisoned())?;
        Ok(guard.get(id).cloned())
    }

    fn recent(&self, limit: usize) -> Result<Vec<SubmissionRecord>, RepositoryError> {
        let guard = self.records.lock().map_err(|_| poisoned())?;
        let mut records: Vec<SubmissionRecord> = guard.values().cloned().collect();
        records.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        records.truncate(limit);
        Ok(records)
    }
}

fn poisoned() -> RepositoryError {
    RepositoryError::Unavailable("in-memory store poisoned".to_string())
}

pub(crate) fn parse_question_id(raw: &str) -> Result<QuestionId, String> {
    QuestionId::from_token(raw.trim())
        .ok_or_else(|| format!("'{raw}' is not a known question id"))
}

/// Read an answer set from a JSON object keyed by question id.
pub(crate) fn load_answers(path: &Path) -> Result<AnswerSet, AppError> {
    let raw = std::fs::read_to_string(path)?;
    let answers = serde_json::from_str(&raw)?;
    Ok(answers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nis2_scope::questionnaire::{assess, AnswerState, AssessmentService, Outcome, Ternary};

    #[test]
    fn parse_question_id_trims_tokens() {
        assert_eq!(
            parse_question_id(" swedish_establishment "),
            Ok(QuestionId::SwedishEstablishment)
        );
        assert!(parse_question_id("swedish").is_err());
    }

    #[test]
    fn load_answers_reads_json_files() {
        let path = std::env::temp_dir().join(format!("nis2-answers-{}.json", std::process::id()));
        std::fs::write(
            &path,
            r#"{"public_sector_entity": "no", "swedish_establishment": "no"}"#,
        )
        .expect("write answers");

        let answers = load_answers(&path).expect("answers load");
        std::fs::remove_file(&path).ok();

        assert_eq!(
            answers.state(QuestionId::SwedishEstablishment),
            AnswerState::No
        );
        assert_eq!(
            answers,
            AnswerSet::new()
                .with(QuestionId::PublicSectorEntity, Ternary::No)
                .with(QuestionId::SwedishEstablishment, Ternary::No)
        );
        assert_eq!(assess(&answers).outcome, Outcome::NotCovered);
    }

    #[test]
    fn load_answers_reports_missing_files() {
        let path = std::env::temp_dir().join("nis2-answers-missing-file.json");
        match load_answers(&path) {
            Err(AppError::Io(_)) => {}
            other => panic!("expected io error, got {other:?}"),
        }
    }

    #[test]
    fn repository_rejects_duplicate_ids() {
        let repository = InMemorySubmissionRepository::default();
        let service = AssessmentService::new(Arc::new(repository.clone()));
        let receipt = service.submit(&AnswerSet::new());
        let record = repository
            .fetch(&receipt.submission_id)
            .expect("fetch succeeds")
            .expect("record stored");

        match repository.insert(record) {
            Err(RepositoryError::Conflict) => {}
            other => panic!("expected conflict, got {other:?}"),
        }
    }
}
