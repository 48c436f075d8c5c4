use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use std::sync::Arc;

use super::{error_response, run_blocking, AppState};
use crate::api::models::{HeadToHeadResponse, PlayerStatsResponse};
use crate::domain::PlayerId;
use crate::services::head_to_head::HeadToHeadService;
use crate::services::player_stats::PlayerStatsService;

pub async fn get_head_to_head_comparison(
    State(state): State<Arc<AppState>>,
    Path((player1_id, player2_id)): Path<(PlayerId, PlayerId)>,
) -> impl IntoResponse {
    let service = HeadToHeadService::new(state.store.clone());

    match run_blocking(move || service.compare(player1_id, player2_id)).await {
        Ok(Some(record)) => Json(HeadToHeadResponse::from(record)).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            format!("Player {player1_id} or {player2_id} not found"),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn get_player_stats(
    State(state): State<Arc<AppState>>,
    Path(player_id): Path<PlayerId>,
) -> impl IntoResponse {
    let service = PlayerStatsService::new(state.store.clone());

    match run_blocking(move || service.statistics(player_id)).await {
        Ok(stats) => Json(PlayerStatsResponse::from(stats)).into_response(),
        Err(e) => error_response(e),
    }
}
