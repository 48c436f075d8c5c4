use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use log::error;

use crate::errors::{engine_error, EngineError};
use crate::store::SqliteStore;

pub mod circuits;
pub mod matches;
pub mod players;
pub mod tournaments;

pub struct AppState {
    pub store: SqliteStore,
}

/// Runs blocking store work off the async executor
pub(crate) async fn run_blocking<T, F>(work: F) -> anyhow::Result<T>
where
    F: FnOnce() -> anyhow::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work).await?
}

pub(crate) fn error_response(err: anyhow::Error) -> Response {
    match engine_error(&err) {
        Some(
            e @ (EngineError::TournamentNotFound(_)
            | EngineError::MatchNotFound(_)
            | EngineError::PlayerNotFound(_)
            | EngineError::CircuitNotFound(_)),
        ) => (StatusCode::NOT_FOUND, e.to_string()).into_response(),
        Some(e @ EngineError::InvalidResults(_)) => {
            (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()).into_response()
        }
        Some(e @ (EngineError::SamePlayer(_) | EngineError::InvalidCircuitDates { .. })) => {
            (StatusCode::BAD_REQUEST, e.to_string()).into_response()
        }
        Some(e) => (StatusCode::CONFLICT, e.to_string()).into_response(),
        None => {
            error!("Request failed: {err:#}");
            (StatusCode::INTERNAL_SERVER_ERROR, format!("Query Error: {err}")).into_response()
        }
    }
}
