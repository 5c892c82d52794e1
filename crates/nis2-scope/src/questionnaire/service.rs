use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use serde::Serialize;

use super::catalog::Question;
use super::domain::{AnswerSet, QuestionId};
use super::engine::{Assessment, AssessmentEngine};
use super::graph::QuestionGraph;
use super::record::FlatRecord;
use super::repository::{RepositoryError, SubmissionId, SubmissionRecord, SubmissionRepository};

const DEFAULT_FALLBACK_CAPACITY: usize = 64;

/// Service composing the question graph, the assessment engine and submission storage.
pub struct AssessmentService<R> {
    graph: QuestionGraph,
    engine: AssessmentEngine,
    repository: Arc<R>,
    fallback: Mutex<VecDeque<SubmissionRecord>>,
    fallback_capacity: usize,
}

static SUBMISSION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_submission_id() -> SubmissionId {
    let id = SUBMISSION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SubmissionId(format!("sub-{id:06}"))
}

/// Visible questions for a partial answer set plus the re-clamped navigation position.
#[derive(Debug, Clone, Serialize)]
pub struct VisibilitySnapshot {
    pub questions: Vec<&'static Question>,
    pub pending: Vec<QuestionId>,
    pub complete: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,
}

/// Result of a submission. The assessment is returned even when storage failed.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionReceipt {
    pub submission_id: SubmissionId,
    pub assessment: Assessment,
    pub complete: bool,
    pub persisted: bool,
}

impl<R> AssessmentService<R>
where
    R: SubmissionRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self::with_fallback_capacity(repository, DEFAULT_FALLBACK_CAPACITY)
    }

    pub fn with_fallback_capacity(repository: Arc<R>, fallback_capacity: usize) -> Self {
        Self {
            graph: QuestionGraph::new(),
            engine: AssessmentEngine::new(),
            repository,
            fallback: Mutex::new(VecDeque::new()),
            fallback_capacity: fallback_capacity.max(1),
        }
    }

    pub fn graph(&self) -> &QuestionGraph {
        &self.graph
    }

    pub fn visible(&self, answers: &AnswerSet, current: Option<QuestionId>) -> VisibilitySnapshot {
        let questions = self.graph.visible_questions(answers);
        let pending: Vec<QuestionId> = self
            .graph
            .pending(answers)
            .into_iter()
            .map(|question| question.id)
            .collect();
        let position = current.and_then(|id| self.graph.reclamp(id, &questions));

        VisibilitySnapshot {
            complete: pending.is_empty(),
            questions,
            pending,
            position,
        }
    }

    pub fn assess(&self, answers: &AnswerSet) -> Assessment {
        self.engine.assess(answers)
    }

    /// Assess and store a finished session.
    ///
    /// Cached submissions are retried first. Storage failures never block the result: the
    /// record is kept in a bounded in-process cache and the receipt reports `persisted: false`.
    pub fn submit(&self, answers: &AnswerSet) -> SubmissionReceipt {
        if self.pending_fallback() > 0 {
            if let Err(error) = self.flush_fallback() {
                tracing::debug!(%error, "fallback cache still waiting for storage");
            }
        }

        let assessment = self.engine.assess(answers);
        let complete = self.graph.is_complete(answers);
        let record = SubmissionRecord {
            submission_id: next_submission_id(),
            submitted_at: Utc::now(),
            answers: FlatRecord::from_answers(answers),
            assessment,
            complete,
        };

        let submission_id = record.submission_id.clone();
        let assessment = record.assessment.clone();

        let persisted = match self.repository.insert(record.clone()) {
            Ok(_) => {
                tracing::info!(
                    submission = %submission_id.0,
                    outcome = assessment.outcome.label(),
                    complete,
                    "assessment stored"
                );
                true
            }
            Err(error) => {
                tracing::warn!(
                    submission = %submission_id.0,
                    %error,
                    "storing assessment failed, keeping it in the fallback cache"
                );
                self.cache(record);
                false
            }
        };

        SubmissionReceipt {
            submission_id,
            assessment,
            complete,
            persisted,
        }
    }

    /// Fetch a stored submission, falling back to the local cache.
    pub fn get(&self, id: &SubmissionId) -> Result<SubmissionRecord, RepositoryError> {
        if let Some(record) = self
            .lock_fallback()
            .iter()
            .find(|record| &record.submission_id == id)
            .cloned()
        {
            return Ok(record);
        }

        self.repository.fetch(id)?.ok_or(RepositoryError::NotFound)
    }

    /// Latest submissions, newest first, including those still waiting in the fallback cache.
    pub fn recent(&self, limit: usize) -> Result<Vec<SubmissionRecord>, RepositoryError> {
        let mut records: Vec<SubmissionRecord> = self.lock_fallback().iter().cloned().collect();
        for record in self.repository.recent(limit)? {
            if !records
                .iter()
                .any(|cached| cached.submission_id == record.submission_id)
            {
                records.push(record);
            }
        }

        records.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        records.truncate(limit);
        Ok(records)
    }

    /// Number of submissions waiting in the fallback cache.
    pub fn pending_fallback(&self) -> usize {
        self.lock_fallback().len()
    }

    /// Retry storing cached submissions; returns how many were stored.
    pub fn flush_fallback(&self) -> Result<usize, RepositoryError> {
        let mut fallback = self.lock_fallback();
        let mut stored = 0;

        while let Some(record) = fallback.pop_front() {
            match self.repository.insert(record.clone()) {
                Ok(_) | Err(RepositoryError::Conflict) => stored += 1,
                Err(error) => {
                    fallback.push_front(record);
                    if stored == 0 {
                        return Err(error);
                    }
                    break;
                }
            }
        }

        if stored > 0 {
            tracing::info!(stored, remaining = fallback.len(), "flushed fallback cache");
        }
        Ok(stored)
    }

    fn cache(&self, record: SubmissionRecord) {
        let mut fallback = self.lock_fallback();
        if fallback.len() >= self.fallback_capacity {
            if let Some(dropped) = fallback.pop_front() {
                tracing::warn!(
                    submission = %dropped.submission_id.0,
                    "fallback cache full, dropping oldest submission"
                );
            }
        }
        fallback.push_back(record);
    }

    fn lock_fallback(&self) -> std::sync::MutexGuard<'_, VecDeque<SubmissionRecord>> {
        self.fallback.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
