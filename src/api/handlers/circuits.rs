use axum::{
    extract::{Path, State},
    response::{IntoResponse, Json},
};
use std::sync::Arc;

use super::{error_response, run_blocking, AppState};
use crate::api::models::{CircuitItem, CircuitStandingsResponse};
use crate::domain::CircuitId;
use crate::services::circuits::CircuitService;

pub async fn get_circuits(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let service = CircuitService::new(state.store.clone());
    match run_blocking(move || service.circuits()).await {
        Ok(circuits) => {
            let items: Vec<CircuitItem> = circuits.into_iter().map(CircuitItem::from).collect();
            Json(items).into_response()
        }
        Err(e) => error_response(e),
    }
}

pub async fn get_circuit_standings(
    State(state): State<Arc<AppState>>,
    Path(circuit_id): Path<CircuitId>,
) -> impl IntoResponse {
    let service = CircuitService::new(state.store.clone());
    match run_blocking(move || service.overview(circuit_id)).await {
        Ok(overview) => Json(CircuitStandingsResponse::from(overview)).into_response(),
        Err(e) => error_response(e),
    }
}
