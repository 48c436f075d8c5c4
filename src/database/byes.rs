use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use super::models::PlayerBye;
use crate::domain::{PlayerId, TournamentId};

pub fn insert_bye(
    conn: &Connection,
    tournament_id: TournamentId,
    player_id: PlayerId,
    round_number: u32,
) -> Result<()> {
    conn.execute(
        "INSERT INTO player_byes (tournament_id, player_id, round_number) VALUES (?1, ?2, ?3)",
        params![tournament_id, player_id, round_number],
    )
    .with_context(|| format!("Failed to record bye for player {player_id} in round {round_number}"))?;
    Ok(())
}

pub fn list_by_tournament(conn: &Connection, tournament_id: TournamentId) -> Result<Vec<PlayerBye>> {
    let mut stmt = conn.prepare(
        "SELECT tournament_id, player_id, round_number FROM player_byes WHERE tournament_id = ?1 ORDER BY round_number, player_id",
    )?;
    let rows = stmt
        .query_map(params![tournament_id], |row| {
            Ok(PlayerBye {
                tournament_id: row.get(0)?,
                player_id: row.get(1)?,
                round_number: row.get(2)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}
