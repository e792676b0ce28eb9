use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::answers::AnswerSet;
use super::evaluation::EvaluationError;
use super::service::{SubmissionRequest, SurveyService, SurveyServiceError};

/// Answers collected so far for a calculator.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct AnswersPayload {
    #[serde(default)]
    pub(crate) answers: AnswerSet,
}

/// Router builder exposing schema export, visibility, review and submission.
pub fn survey_router(service: Arc<SurveyService>) -> Router {
    Router::new()
        .route("/api/v1/calculators", get(list_handler))
        .route("/api/v1/calculators/:name", get(definition_handler))
        .route(
            "/api/v1/calculators/:name/visibility",
            post(visibility_handler),
        )
        .route("/api/v1/calculators/:name/review", post(review_handler))
        .route("/api/v1/submissions", post(submit_handler))
        .with_state(service)
}

fn status_for(error: &SurveyServiceError) -> StatusCode {
    match error {
        SurveyServiceError::NotFound { .. } => StatusCode::NOT_FOUND,
        SurveyServiceError::Evaluation(EvaluationError::UnboundSymbol { .. }) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        SurveyServiceError::Evaluation(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

fn error_response(error: &SurveyServiceError) -> Response {
    (status_for(error), axum::Json(error.failure())).into_response()
}

pub(crate) async fn list_handler(State(service): State<Arc<SurveyService>>) -> Response {
    (StatusCode::OK, axum::Json(service.definitions())).into_response()
}

pub(crate) async fn definition_handler(
    State(service): State<Arc<SurveyService>>,
    Path(name): Path<String>,
) -> Response {
    match service.calculator(&name) {
        Ok(calculator) => (StatusCode::OK, axum::Json(calculator.definition())).into_response(),
        Err(error) => error_response(&error),
    }
}

pub(crate) async fn visibility_handler(
    State(service): State<Arc<SurveyService>>,
    Path(name): Path<String>,
    axum::Json(payload): axum::Json<AnswersPayload>,
) -> Response {
    match service.visibility(&name, &payload.answers) {
        Ok(steps) => (StatusCode::OK, axum::Json(json!({ "steps": steps }))).into_response(),
        Err(error) => error_response(&error),
    }
}

pub(crate) async fn review_handler(
    State(service): State<Arc<SurveyService>>,
    Path(name): Path<String>,
    axum::Json(payload): axum::Json<AnswersPayload>,
) -> Response {
    match service.review(&name, &payload.answers) {
        Ok(issues) => (StatusCode::OK, axum::Json(json!({ "issues": issues }))).into_response(),
        Err(error) => error_response(&error),
    }
}

pub(crate) async fn submit_handler(
    State(service): State<Arc<SurveyService>>,
    axum::Json(request): axum::Json<SubmissionRequest>,
) -> Response {
    match service.submit(&request) {
        Ok(result) => (StatusCode::OK, axum::Json(result)).into_response(),
        Err(error) => error_response(&error),
    }
}
