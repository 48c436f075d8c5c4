use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use super::models::{NewPlayer, Player};
use crate::domain::{PlayerId, TournamentId};

const PLAYER_COLUMNS: &str = "id, name, bga_username, email, phone, created_at";

pub fn insert_player(conn: &Connection, player: &NewPlayer) -> Result<Player> {
    let sql = format!(
        "INSERT INTO players (name, bga_username, email, phone) VALUES (?1, ?2, ?3, ?4) RETURNING {PLAYER_COLUMNS}"
    );

    conn.query_row(
        &sql,
        params![player.name, player.bga_username, player.email, player.phone],
        parse_player_row,
    )
    .context("Failed to insert new player")
}

fn parse_player_row(row: &rusqlite::Row) -> rusqlite::Result<Player> {
    Ok(Player {
        id: row.get(0)?,
        name: row.get(1)?,
        bga_username: row.get(2)?,
        email: row.get(3)?,
        phone: row.get(4)?,
        created_at: row.get(5)?,
    })
}

pub fn find_by_id(conn: &Connection, id: PlayerId) -> Result<Option<Player>> {
    let sql = format!("SELECT {PLAYER_COLUMNS} FROM players WHERE id = ?1");

    conn.query_row(&sql, params![id], parse_player_row)
        .optional()
        .context("Failed to query player by id")
}

pub fn list_all(conn: &Connection) -> Result<Vec<Player>> {
    let sql = format!("SELECT {PLAYER_COLUMNS} FROM players ORDER BY name, id");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], parse_player_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

/// Registered players in registration order
pub fn list_by_tournament(conn: &Connection, tournament_id: TournamentId) -> Result<Vec<Player>> {
    let sql = "SELECT p.id, p.name, p.bga_username, p.email, p.phone, p.created_at
        FROM players p
        JOIN tournament_players tp ON tp.player_id = p.id
        WHERE tp.tournament_id = ?1
        ORDER BY tp.rowid";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![tournament_id], parse_player_row)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to list tournament players")?;

    Ok(rows)
}

/// Registering twice is a no-op
pub fn register(conn: &Connection, tournament_id: TournamentId, player_id: PlayerId) -> Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO tournament_players (tournament_id, player_id) VALUES (?1, ?2)",
        params![tournament_id, player_id],
    )
    .with_context(|| format!("Failed to register player {player_id} in tournament {tournament_id}"))?;
    Ok(())
}

pub fn unregister(conn: &Connection, tournament_id: TournamentId, player_id: PlayerId) -> Result<bool> {
    let removed = conn
        .execute(
            "DELETE FROM tournament_players WHERE tournament_id = ?1 AND player_id = ?2",
            params![tournament_id, player_id],
        )
        .context("Failed to unregister player")?;
    Ok(removed > 0)
}
