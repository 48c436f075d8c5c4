use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::api::handlers::{
    circuits::{get_circuit_standings, get_circuits},
    matches::submit_results,
    players::{get_head_to_head_comparison, get_player_stats},
    tournaments::{generate_round, get_rounds, get_standings, get_tournaments},
    AppState,
};

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/tournaments", get(get_tournaments))
        .route("/api/tournaments/:id/standings", get(get_standings))
        .route("/api/tournaments/:id/rounds", get(get_rounds).post(generate_round))
        .route("/api/matches/:id/results", post(submit_results))
        .route("/api/compare/:player1_id/:player2_id", get(get_head_to_head_comparison))
        .route("/api/players/:id/stats", get(get_player_stats))
        .route("/api/circuits", get(get_circuits))
        .route("/api/circuits/:id/standings", get(get_circuit_standings))
        .with_state(state)
}
