use axum::{
    extract::{Path, State},
    response::{IntoResponse, Json},
};
use std::sync::Arc;

use super::{error_response, run_blocking, AppState};
use crate::api::models::{ResultItem, SubmitResultsRequest};
use crate::domain::MatchId;
use crate::services::rounds::RoundService;

pub async fn submit_results(
    State(state): State<Arc<AppState>>,
    Path(match_id): Path<MatchId>,
    Json(request): Json<SubmitResultsRequest>,
) -> impl IntoResponse {
    let service = RoundService::new(state.store.clone());
    let submission = request.into_submission(match_id);

    match run_blocking(move || service.submit_results(&submission)).await {
        Ok(results) => {
            let items: Vec<ResultItem> = results.into_iter().map(ResultItem::from).collect();
            Json(items).into_response()
        }
        Err(e) => error_response(e),
    }
}
