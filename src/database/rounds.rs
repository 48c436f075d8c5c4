use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use super::models::Round;
use crate::domain::{RoundId, RoundStatus, TournamentId};

const ROUND_COLUMNS: &str = "id, tournament_id, round_number, status, started_at, completed_at";

pub fn insert_round(
    conn: &Connection,
    tournament_id: TournamentId,
    round_number: u32,
    status: RoundStatus,
) -> Result<Round> {
    let sql = format!(
        "INSERT INTO rounds (tournament_id, round_number, status) VALUES (?1, ?2, ?3) RETURNING {ROUND_COLUMNS}"
    );

    conn.query_row(&sql, params![tournament_id, round_number, status], parse_round_row)
        .with_context(|| format!("Failed to insert round {round_number} for tournament {tournament_id}"))
}

fn parse_round_row(row: &rusqlite::Row) -> rusqlite::Result<Round> {
    Ok(Round {
        id: row.get(0)?,
        tournament_id: row.get(1)?,
        round_number: row.get(2)?,
        status: row.get(3)?,
        started_at: row.get(4)?,
        completed_at: row.get(5)?,
    })
}

pub fn find_by_id(conn: &Connection, id: RoundId) -> Result<Option<Round>> {
    let sql = format!("SELECT {ROUND_COLUMNS} FROM rounds WHERE id = ?1");

    conn.query_row(&sql, params![id], parse_round_row)
        .optional()
        .context("Failed to query round by id")
}

/// Rounds ordered by round number
pub fn list_by_tournament(conn: &Connection, tournament_id: TournamentId) -> Result<Vec<Round>> {
    let sql = format!(
        "SELECT {ROUND_COLUMNS} FROM rounds WHERE tournament_id = ?1 ORDER BY round_number"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![tournament_id], parse_round_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

/// Stamps `started_at` / `completed_at` the first time a round enters that state
pub fn update_status(conn: &Connection, id: RoundId, status: RoundStatus) -> Result<()> {
    let now = Utc::now().naive_utc();
    let sql = match status {
        RoundStatus::Pending => "UPDATE rounds SET status = ?1 WHERE id = ?2",
        RoundStatus::InProgress => {
            "UPDATE rounds SET status = ?1, started_at = COALESCE(started_at, ?3) WHERE id = ?2"
        }
        RoundStatus::Completed => {
            "UPDATE rounds SET status = ?1, started_at = COALESCE(started_at, ?3), completed_at = COALESCE(completed_at, ?3) WHERE id = ?2"
        }
    };

    let result = if status == RoundStatus::Pending {
        conn.execute(sql, params![status, id])
    } else {
        conn.execute(sql, params![status, id, now])
    };

    result.context("Failed to update round status")?;
    Ok(())
}

/// Sets the round `completed` when none of its matches is pending, `in_progress` otherwise
pub fn settle_status(conn: &Connection, id: RoundId) -> Result<RoundStatus> {
    let pending: u32 = conn
        .query_row(
            "SELECT COUNT(*) FROM matches WHERE round_id = ?1 AND status != 'completed'",
            params![id],
            |row| row.get(0),
        )
        .context("Failed to count pending matches")?;

    let status = if pending == 0 {
        RoundStatus::Completed
    } else {
        RoundStatus::InProgress
    };
    update_status(conn, id, status)?;
    Ok(status)
}
