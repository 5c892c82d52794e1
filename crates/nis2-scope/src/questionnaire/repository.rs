use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::engine::{Assessment, Outcome};
use super::record::FlatRecord;

/// Identifier wrapper for stored submissions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubmissionId(pub String);

/// Repository record holding the flat answers and the assessment computed from them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub submission_id: SubmissionId,
    pub submitted_at: DateTime<Utc>,
    pub answers: FlatRecord,
    pub assessment: Assessment,
    pub complete: bool,
}

impl SubmissionRecord {
    pub fn summary_view(&self) -> SubmissionView {
        SubmissionView {
            submission_id: self.submission_id.clone(),
            submitted_at: self.submitted_at,
            outcome: self.assessment.outcome,
            message: self.assessment.message.clone(),
            complete: self.complete,
        }
    }
}

/// Storage abstraction so the service can be exercised without a database.
pub trait SubmissionRepository: Send + Sync {
    fn insert(&self, record: SubmissionRecord) -> Result<SubmissionRecord, RepositoryError>;
    fn fetch(&self, id: &SubmissionId) -> Result<Option<SubmissionRecord>, RepositoryError>;
    fn recent(&self, limit: usize) -> Result<Vec<SubmissionRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Compact representation of a stored submission for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionView {
    pub submission_id: SubmissionId,
    pub submitted_at: DateTime<Utc>,
    pub outcome: Outcome,
    pub message: String,
    pub complete: bool,
}
