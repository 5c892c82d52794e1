use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::catalog::section_title;
use super::domain::{AnswerSet, QuestionId};
use super::repository::{
    RepositoryError, SubmissionId, SubmissionRecord, SubmissionRepository, SubmissionView,
};
use super::service::AssessmentService;

const RECENT_SUBMISSIONS_LIMIT: usize = 20;

/// Body accepted by the visibility endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct VisibilityRequest {
    #[serde(default)]
    pub answers: AnswerSet,
    /// Question the respondent is currently viewing, used to re-clamp the position.
    #[serde(default)]
    pub current: Option<QuestionId>,
}

/// Router builder exposing the questionnaire, assessment and submission endpoints.
pub fn questionnaire_router<R>(service: Arc<AssessmentService<R>>) -> Router
where
    R: SubmissionRepository + 'static,
{
    Router::new()
        .route("/api/v1/questionnaire/questions", get(questions_handler::<R>))
        .route("/api/v1/questionnaire/visible", post(visible_handler::<R>))
        .route(
            "/api/v1/questionnaire/assessment",
            post(assessment_handler::<R>),
        )
        .route(
            "/api/v1/questionnaire/submissions",
            post(submit_handler::<R>).get(recent_handler::<R>),
        )
        .route(
            "/api/v1/questionnaire/submissions/:submission_id",
            get(submission_handler::<R>),
        )
        .with_state(service)
}

pub(crate) async fn questions_handler<R>(
    State(service): State<Arc<AssessmentService<R>>>,
) -> Response
where
    R: SubmissionRepository + 'static,
{
    let questions: Vec<serde_json::Value> = service
        .graph()
        .questions()
        .iter()
        .map(|question| {
            json!({
                "question": question,
                "section_title": section_title(question.section),
            })
        })
        .collect();

    (StatusCode::OK, Json(json!({ "questions": questions }))).into_response()
}

pub(crate) async fn visible_handler<R>(
    State(service): State<Arc<AssessmentService<R>>>,
    Json(request): Json<VisibilityRequest>,
) -> Response
where
    R: SubmissionRepository + 'static,
{
    let snapshot = service.visible(&request.answers, request.current);
    (StatusCode::OK, Json(snapshot)).into_response()
}

pub(crate) async fn assessment_handler<R>(
    State(service): State<Arc<AssessmentService<R>>>,
    Json(answers): Json<AnswerSet>,
) -> Response
where
    R: SubmissionRepository + 'static,
{
    let assessment = service.assess(&answers);
    (StatusCode::OK, Json(assessment)).into_response()
}

pub(crate) async fn submit_handler<R>(
    State(service): State<Arc<AssessmentService<R>>>,
    Json(answers): Json<AnswerSet>,
) -> Response
where
    R: SubmissionRepository + 'static,
{
    let receipt = service.submit(&answers);
    let status = if receipt.persisted {
        StatusCode::CREATED
    } else {
        StatusCode::ACCEPTED
    };
    (status, Json(receipt)).into_response()
}

pub(crate) async fn recent_handler<R>(State(service): State<Arc<AssessmentService<R>>>) -> Response
where
    R: SubmissionRepository + 'static,
{
    match service.recent(RECENT_SUBMISSIONS_LIMIT) {
        Ok(records) => {
            let submissions: Vec<SubmissionView> =
                records.iter().map(SubmissionRecord::summary_view).collect();
            (StatusCode::OK, Json(json!({ "submissions": submissions }))).into_response()
        }
        Err(err) => {
            let payload = json!({
                "error": err.to_string(),
            });
            (StatusCode::SERVICE_UNAVAILABLE, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn submission_handler<R>(
    State(service): State<Arc<AssessmentService<R>>>,
    Path(submission_id): Path<String>,
) -> Response
where
    R: SubmissionRepository + 'static,
{
    let id = SubmissionId(submission_id);
    match service.get(&id) {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(RepositoryError::NotFound) => {
            let payload = json!({
                "submission_id": id.0,
                "error": "submission not found",
            });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}
