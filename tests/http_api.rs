use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::NaiveDate;
use serde_json::{json, Value};
use tower::ServiceExt;

use swiss_tournament::api::handlers::AppState;
use swiss_tournament::api::routes::create_router;
use swiss_tournament::config::settings::DefaultsSettings;
use swiss_tournament::database::{NewCircuit, NewPlayer};
use swiss_tournament::services::circuits::CircuitService;
use swiss_tournament::services::tournaments::TournamentService;
use swiss_tournament::store::SqliteStore;

fn app_with_tournament(player_count: usize) -> (Router, i64) {
    let store = SqliteStore::in_memory().unwrap();
    let admin = TournamentService::new(store.clone(), DefaultsSettings::default());
    let tournament = admin
        .create("League", NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(), 2, None)
        .unwrap();
    for i in 1..=player_count {
        let player = admin.add_player(&NewPlayer::named(&format!("Player {i}"))).unwrap();
        admin.register(tournament.id, player.id).unwrap();
    }

    (create_router(Arc::new(AppState { store })), tournament.id)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => request
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn test_list_tournaments() {
    let (app, tournament_id) = app_with_tournament(0);
    let (status, body) = send(&app, "GET", "/api/tournaments", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["id"], tournament_id);
    assert_eq!(body[0]["status"], "draft");
    assert_eq!(body[0]["playersPerMatch"], 2);
    assert_eq!(body[0]["tournamentType"], "qualifier");
    assert_eq!(body[0]["circuitId"], Value::Null);
}

#[tokio::test]
async fn test_round_results_and_standings() {
    let (app, tournament_id) = app_with_tournament(3);

    let (status, round) = send(&app, "POST", &format!("/api/tournaments/{tournament_id}/rounds?seed=7"), None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(round["roundNumber"], 1);
    let matches = round["matches"].as_array().unwrap();
    assert_eq!(matches.len(), 2);
    assert_eq!(matches[1]["isBye"], true);

    let game = &matches[0];
    let players = game["playerIds"].as_array().unwrap();
    let (winner, loser) = (players[0].as_i64().unwrap(), players[1].as_i64().unwrap());
    let (status, results) = send(
        &app,
        "POST",
        &format!("/api/matches/{}/results", game["id"]),
        Some(json!({ "scores": [
            { "playerId": winner, "points": 15 },
            { "playerId": loser, "points": 9 }
        ]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(results[0]["playerId"], winner);
    assert_eq!(results[0]["position"], 1);
    assert_eq!(results[0]["tournamentPoints"], 1.0);

    let (status, standings) = send(&app, "GET", &format!("/api/tournaments/{tournament_id}/standings"), None).await;
    assert_eq!(status, StatusCode::OK);
    let standings = standings.as_array().unwrap();
    assert_eq!(standings.len(), 3);
    assert_eq!(standings[0]["rank"], 1);
    assert_eq!(standings[0]["totalPoints"], 1.0);
    assert_eq!(standings[2]["playerId"], loser);

    let (status, rounds) = send(&app, "GET", &format!("/api/tournaments/{tournament_id}/rounds"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rounds[0]["status"], "completed");

    let (status, compare) = send(&app, "GET", &format!("/api/compare/{winner}/{loser}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(compare["stats"]["totalMatches"], 1);
    assert_eq!(compare["stats"]["player1Wins"], 1);
    assert_eq!(compare["matches"][0]["tournamentName"], "League");
}

#[tokio::test]
async fn test_errors_map_to_status_codes() {
    let (app, tournament_id) = app_with_tournament(1);

    let (status, _) = send(&app, "GET", "/api/tournaments/999/standings", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "POST", &format!("/api/tournaments/{tournament_id}/rounds"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(
        &app,
        "POST",
        "/api/matches/77/results",
        Some(json!({ "scores": [] })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "GET", "/api/compare/1/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "GET", "/api/compare/1/1", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "GET", "/api/circuits/5/standings", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "GET", "/api/players/999/stats", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_circuits_and_player_stats() {
    let store = SqliteStore::in_memory().unwrap();
    let circuit = CircuitService::new(store.clone())
        .create(&NewCircuit { name: "Winter".to_string(), ..Default::default() })
        .unwrap();
    let player = TournamentService::new(store.clone(), DefaultsSettings::default())
        .add_player(&NewPlayer::named("Ann"))
        .unwrap();
    let app = create_router(Arc::new(AppState { store }));

    let (status, circuits) = send(&app, "GET", "/api/circuits", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(circuits[0]["id"], circuit.id);
    assert_eq!(circuits[0]["name"], "Winter");

    let (status, overview) = send(&app, "GET", &format!("/api/circuits/{}/standings", circuit.id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(overview["circuit"]["name"], "Winter");
    assert_eq!(overview["standings"], json!([]));

    let (status, stats) = send(&app, "GET", &format!("/api/players/{}/stats", player.id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["player"]["name"], "Ann");
    assert_eq!(stats["overall"]["tournaments"], 0);
    assert_eq!(stats["bestPosition"], 0);
    assert_eq!(stats["recentTournaments"], json!([]));
}
