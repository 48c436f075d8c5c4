use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

use super::{error_response, run_blocking, AppState};
use crate::api::models::{ranked, GenerateRoundParams, RoundItem, TournamentItem};
use crate::domain::TournamentId;
use crate::services::rounds::RoundService;
use crate::store::Store;

pub async fn get_tournaments(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let store = state.store.clone();
    match run_blocking(move || store.list_tournaments()).await {
        Ok(tournaments) => {
            let items: Vec<TournamentItem> = tournaments.into_iter().map(TournamentItem::from).collect();
            Json(items).into_response()
        }
        Err(e) => error_response(e),
    }
}

pub async fn get_standings(
    State(state): State<Arc<AppState>>,
    Path(tournament_id): Path<TournamentId>,
) -> impl IntoResponse {
    let service = RoundService::new(state.store.clone());
    match run_blocking(move || service.standings(tournament_id)).await {
        Ok(standings) => Json(ranked(standings)).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn get_rounds(
    State(state): State<Arc<AppState>>,
    Path(tournament_id): Path<TournamentId>,
) -> impl IntoResponse {
    let service = RoundService::new(state.store.clone());
    match run_blocking(move || service.rounds(tournament_id)).await {
        Ok(rounds) => {
            let items: Vec<RoundItem> = rounds.into_iter().map(RoundItem::from).collect();
            Json(items).into_response()
        }
        Err(e) => error_response(e),
    }
}

/// Generates the first round if there is none, otherwise the next one.
/// `?seed=` makes the pairing reproducible.
pub async fn generate_round(
    State(state): State<Arc<AppState>>,
    Path(tournament_id): Path<TournamentId>,
    Query(params): Query<GenerateRoundParams>,
) -> impl IntoResponse {
    let service = RoundService::new(state.store.clone());
    let generated = run_blocking(move || {
        let mut rng = match params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let round = service.generate_round(tournament_id, &mut rng)?;
        let overview = service
            .rounds(tournament_id)?
            .into_iter()
            .find(|r| r.round.id == round.id);
        Ok(overview)
    })
    .await;

    match generated {
        Ok(Some(overview)) => {
            info!("Round {} generated over HTTP", overview.round.round_number);
            (StatusCode::CREATED, Json(RoundItem::from(overview))).into_response()
        }
        Ok(None) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        Err(e) => error_response(e),
    }
}
