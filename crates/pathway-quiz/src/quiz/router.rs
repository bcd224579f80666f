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
use tracing::warn;

use super::repository::{RepositoryError, SessionId, SessionRepository};
use super::service::{QuizService, QuizServiceError};
use super::session::QuizCommand;

#[derive(Debug, Default, Deserialize)]
pub struct StartSessionRequest {
    #[serde(default)]
    pub quiz_id: Option<String>,
}

/// Router builder exposing the quiz flow as HTTP commands.
pub fn quiz_router<R>(service: Arc<QuizService<R>>) -> Router
where
    R: SessionRepository + 'static,
{
    Router::new()
        .route("/api/v1/quiz/catalog", get(catalog_handler::<R>))
        .route("/api/v1/quiz/sessions", post(start_handler::<R>))
        .route(
            "/api/v1/quiz/sessions/:session_id",
            get(view_handler::<R>).delete(end_handler::<R>),
        )
        .route(
            "/api/v1/quiz/sessions/:session_id/commands",
            post(command_handler::<R>),
        )
        .route(
            "/api/v1/quiz/sessions/:session_id/results",
            get(results_handler::<R>),
        )
        .with_state(service)
}

pub(crate) async fn catalog_handler<R>(State(service): State<Arc<QuizService<R>>>) -> Response
where
    R: SessionRepository + 'static,
{
    let catalog = service.catalog();
    let payload = json!({
        "questions": catalog.questions(),
        "outcomes": catalog.outcomes(),
    });
    (StatusCode::OK, Json(payload)).into_response()
}

pub(crate) async fn start_handler<R>(
    State(service): State<Arc<QuizService<R>>>,
    request: Option<Json<StartSessionRequest>>,
) -> Response
where
    R: SessionRepository + 'static,
{
    let request = request.map(|Json(request)| request).unwrap_or_default();
    match service.start(request.quiz_id.as_deref()) {
        Ok(snapshot) => (StatusCode::CREATED, Json(snapshot)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn view_handler<R>(
    State(service): State<Arc<QuizService<R>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: SessionRepository + 'static,
{
    match service.view(&SessionId(session_id)) {
        Ok(snapshot) => (StatusCode::OK, Json(snapshot)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn command_handler<R>(
    State(service): State<Arc<QuizService<R>>>,
    Path(session_id): Path<String>,
    Json(command): Json<QuizCommand>,
) -> Response
where
    R: SessionRepository + 'static,
{
    match service.dispatch(&SessionId(session_id), command) {
        Ok(snapshot) => (StatusCode::OK, Json(snapshot)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn results_handler<R>(
    State(service): State<Arc<QuizService<R>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: SessionRepository + 'static,
{
    match service.results(&SessionId(session_id)) {
        Ok(results) => (StatusCode::OK, Json(results)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn end_handler<R>(
    State(service): State<Arc<QuizService<R>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: SessionRepository + 'static,
{
    match service.end(&SessionId(session_id)) {
        Ok(()) | Err(QuizServiceError::Repository(RepositoryError::NotFound)) => {
            StatusCode::NO_CONTENT.into_response()
        }
        Err(err) => error_response(err),
    }
}

fn error_response(err: QuizServiceError) -> Response {
    let status = match &err {
        QuizServiceError::Session(_) => StatusCode::UNPROCESSABLE_ENTITY,
        QuizServiceError::NotComplete
        | QuizServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        QuizServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        QuizServiceError::Repository(RepositoryError::Unavailable(_)) => {
            warn!(error = %err, "session repository unavailable");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({ "error": err.to_string() });
    (status, Json(payload)).into_response()
}
