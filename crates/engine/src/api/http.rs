//! HTTP routes.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;

use gamenight_shared::{
    Command, CommandFailure, CommandReply, ContextView, ErrorKind, StatusView,
};

use crate::api::commands::dispatch;
use crate::app::App;

/// Create all HTTP routes.
pub fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/", get(health))
        .route("/api/health", get(health))
        .route("/api/commands", post(run_command))
        .route("/api/status", get(get_status))
        .route("/api/context", get(get_context))
}

async fn health() -> &'static str {
    "OK"
}

async fn run_command(
    State(app): State<Arc<App>>,
    Json(command): Json<Command>,
) -> Result<Json<CommandReply>, ApiError> {
    let response = dispatch(&app, command).await?;
    Ok(Json(CommandReply::from(response)))
}

async fn get_status(State(app): State<Arc<App>>) -> Json<StatusView> {
    Json(app.use_cases.status.status.execute().await)
}

async fn get_context(State(app): State<Arc<App>>) -> Result<Json<ContextView>, ApiError> {
    let context = app
        .use_cases
        .status
        .context
        .execute()
        .await
        .map_err(|e| ApiError::Command(CommandFailure::from(e)))?;
    Ok(Json(context))
}

#[derive(Debug)]
pub enum ApiError {
    Command(CommandFailure),
}

fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::ValidationError | ErrorKind::UnknownPosition | ErrorKind::NoConnection => {
            StatusCode::BAD_REQUEST
        }
        ErrorKind::NotYourTurn | ErrorKind::NarratorOnly => StatusCode::CONFLICT,
        ErrorKind::StateInvariantViolation => StatusCode::INTERNAL_SERVER_ERROR,
        ErrorKind::StorageError => StatusCode::SERVICE_UNAVAILABLE,
    }
}

impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ApiError::Command(failure) => {
                (status_for(failure.kind), Json(failure)).into_response()
            }
        }
    }
}

impl From<CommandFailure> for ApiError {
    fn from(failure: CommandFailure) -> Self {
        ApiError::Command(failure)
    }
}
