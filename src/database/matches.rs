use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use super::models::{Match, MatchResult};
use crate::domain::{MatchId, MatchStatus, PlayerId, RoundId};

const MATCH_COLUMNS: &str = "id, round_id, match_number, status, first_player_id, completed_at";

pub fn insert_match(
    conn: &Connection,
    round_id: RoundId,
    match_number: u32,
    status: MatchStatus,
) -> Result<Match> {
    let completed_at = (status == MatchStatus::Completed).then(|| Utc::now().naive_utc());
    let sql = format!(
        "INSERT INTO matches (round_id, match_number, status, completed_at) VALUES (?1, ?2, ?3, ?4) RETURNING {MATCH_COLUMNS}"
    );

    conn.query_row(
        &sql,
        params![round_id, match_number, status, completed_at],
        parse_match_row,
    )
    .with_context(|| format!("Failed to insert match {match_number} of round {round_id}"))
}

fn parse_match_row(row: &rusqlite::Row) -> rusqlite::Result<Match> {
    Ok(Match {
        id: row.get(0)?,
        round_id: row.get(1)?,
        match_number: row.get(2)?,
        status: row.get(3)?,
        first_player_id: row.get(4)?,
        completed_at: row.get(5)?,
    })
}

pub fn find_by_id(conn: &Connection, id: MatchId) -> Result<Option<Match>> {
    let sql = format!("SELECT {MATCH_COLUMNS} FROM matches WHERE id = ?1");

    conn.query_row(&sql, params![id], parse_match_row)
        .optional()
        .context("Failed to query match by id")
}

pub fn list_by_round(conn: &Connection, round_id: RoundId) -> Result<Vec<Match>> {
    let sql = format!("SELECT {MATCH_COLUMNS} FROM matches WHERE round_id = ?1 ORDER BY match_number");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![round_id], parse_match_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn mark_completed(conn: &Connection, id: MatchId, first_player_id: Option<PlayerId>) -> Result<()> {
    conn.execute(
        "UPDATE matches SET status = ?1, first_player_id = ?2, completed_at = ?3 WHERE id = ?4",
        params![MatchStatus::Completed, first_player_id, Utc::now().naive_utc(), id],
    )
    .context("Failed to mark match completed")?;
    Ok(())
}

pub fn set_players(conn: &Connection, match_id: MatchId, player_ids: &[PlayerId]) -> Result<()> {
    conn.execute("DELETE FROM match_players WHERE match_id = ?1", params![match_id])?;

    let mut stmt =
        conn.prepare("INSERT INTO match_players (match_id, player_id, seat) VALUES (?1, ?2, ?3)")?;
    for (seat, player_id) in player_ids.iter().enumerate() {
        stmt.execute(params![match_id, player_id, seat as i64 + 1])
            .with_context(|| format!("Failed to assign player {player_id} to match {match_id}"))?;
    }

    Ok(())
}

/// Assigned roster in seat order
pub fn list_players(conn: &Connection, match_id: MatchId) -> Result<Vec<PlayerId>> {
    let mut stmt =
        conn.prepare("SELECT player_id FROM match_players WHERE match_id = ?1 ORDER BY seat")?;
    let rows = stmt
        .query_map(params![match_id], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn insert_result(conn: &Connection, result: &MatchResult) -> Result<()> {
    conn.execute(
        "INSERT INTO match_results (match_id, player_id, position, points, tournament_points) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            result.match_id,
            result.player_id,
            result.position,
            result.points,
            result.tournament_points
        ],
    )
    .with_context(|| {
        format!(
            "Failed to insert result for player {} in match {}",
            result.player_id, result.match_id
        )
    })?;
    Ok(())
}

pub fn delete_results(conn: &Connection, match_id: MatchId) -> Result<usize> {
    conn.execute("DELETE FROM match_results WHERE match_id = ?1", params![match_id])
        .context("Failed to delete match results")
}

fn parse_result_row(row: &rusqlite::Row) -> rusqlite::Result<MatchResult> {
    Ok(MatchResult {
        match_id: row.get(0)?,
        player_id: row.get(1)?,
        position: row.get(2)?,
        points: row.get(3)?,
        tournament_points: row.get(4)?,
    })
}

/// Results ordered by position
pub fn list_results(conn: &Connection, match_id: MatchId) -> Result<Vec<MatchResult>> {
    let mut stmt = conn.prepare(
        "SELECT match_id, player_id, position, points, tournament_points FROM match_results WHERE match_id = ?1 ORDER BY position, rowid",
    )?;
    let rows = stmt
        .query_map(params![match_id], parse_result_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}
