use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use super::models::{NewTournament, Tournament};
use crate::domain::{
    ByeSelection, CircuitId, PlayerId, TournamentConfig, TournamentId, TournamentStatus,
};

const TOURNAMENT_COLUMNS: &str =
    "id, name, date, status, players_per_match, number_of_rounds, tournament_type, circuit_id, created_at";

pub fn insert_tournament(conn: &Connection, tournament: &NewTournament) -> Result<Tournament> {
    let sql = format!(
        "INSERT INTO tournaments (name, date, players_per_match, number_of_rounds, tournament_type, circuit_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6) RETURNING {TOURNAMENT_COLUMNS}"
    );

    conn.query_row(
        &sql,
        params![
            tournament.name,
            tournament.date,
            tournament.players_per_match,
            tournament.number_of_rounds,
            tournament.tournament_type(),
            tournament.circuit_id
        ],
        parse_tournament_row,
    )
    .context("Failed to insert new tournament")
}

fn parse_tournament_row(row: &rusqlite::Row) -> rusqlite::Result<Tournament> {
    Ok(Tournament {
        id: row.get(0)?,
        name: row.get(1)?,
        date: row.get(2)?,
        status: row.get(3)?,
        players_per_match: row.get(4)?,
        number_of_rounds: row.get(5)?,
        tournament_type: row.get(6)?,
        circuit_id: row.get(7)?,
        created_at: row.get(8)?,
    })
}

pub fn find_by_id(conn: &Connection, id: TournamentId) -> Result<Option<Tournament>> {
    let sql = format!("SELECT {TOURNAMENT_COLUMNS} FROM tournaments WHERE id = ?1");

    conn.query_row(&sql, params![id], parse_tournament_row)
        .optional()
        .context("Failed to query tournament by id")
}

pub fn list_all(conn: &Connection) -> Result<Vec<Tournament>> {
    let sql = format!("SELECT {TOURNAMENT_COLUMNS} FROM tournaments ORDER BY date DESC, id DESC");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], parse_tournament_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

/// Tournaments counting towards a circuit, oldest first
pub fn list_by_circuit(conn: &Connection, circuit_id: CircuitId) -> Result<Vec<Tournament>> {
    let sql = format!("SELECT {TOURNAMENT_COLUMNS} FROM tournaments WHERE circuit_id = ?1 ORDER BY date, id");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![circuit_id], parse_tournament_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

/// Tournaments the player is registered for, oldest first
pub fn list_by_player(conn: &Connection, player_id: PlayerId) -> Result<Vec<Tournament>> {
    let sql = format!(
        "SELECT {TOURNAMENT_COLUMNS} FROM tournaments
         WHERE id IN (SELECT tournament_id FROM tournament_players WHERE player_id = ?1)
         ORDER BY date, id"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![player_id], parse_tournament_row)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to query tournaments of player")?;

    Ok(rows)
}

pub fn update_status(conn: &Connection, id: TournamentId, status: TournamentStatus) -> Result<()> {
    conn.execute(
        "UPDATE tournaments SET status = ?1 WHERE id = ?2",
        params![status, id],
    )
    .context("Failed to update tournament status")?;
    Ok(())
}

pub fn find_config(conn: &Connection, tournament_id: TournamentId) -> Result<Option<TournamentConfig>> {
    let sql = "SELECT avoid_rematches, scoring_system, tiebreak_criteria, bye_selection FROM tournament_configs WHERE tournament_id = ?1";

    let raw = conn
        .query_row(sql, params![tournament_id], |row| {
            Ok((
                row.get::<_, bool>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, ByeSelection>(3)?,
            ))
        })
        .optional()
        .context("Failed to query tournament config")?;

    let Some((avoid_rematches, scoring_json, criteria_json, bye_selection)) = raw else {
        return Ok(None);
    };

    Ok(Some(TournamentConfig {
        avoid_rematches,
        scoring_system: serde_json::from_str(&scoring_json)
            .context("Failed to parse scoring system")?,
        tiebreak_criteria: serde_json::from_str(&criteria_json)
            .context("Failed to parse tiebreak criteria")?,
        bye_selection,
    }))
}

/// Inserts or replaces the whole config row
pub fn save_config(conn: &Connection, tournament_id: TournamentId, config: &TournamentConfig) -> Result<()> {
    let scoring_json = serde_json::to_string(&config.scoring_system)?;
    let criteria_json = serde_json::to_string(&config.tiebreak_criteria)?;

    conn.execute(
        "INSERT INTO tournament_configs (tournament_id, avoid_rematches, scoring_system, tiebreak_criteria, bye_selection)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(tournament_id) DO UPDATE SET
            avoid_rematches = excluded.avoid_rematches,
            scoring_system = excluded.scoring_system,
            tiebreak_criteria = excluded.tiebreak_criteria,
            bye_selection = excluded.bye_selection",
        params![
            tournament_id,
            config.avoid_rematches,
            scoring_json,
            criteria_json,
            config.bye_selection
        ],
    )
    .context("Failed to save tournament config")?;
    Ok(())
}
