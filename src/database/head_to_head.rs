use anyhow::Result;
use rusqlite::{params, Connection};

use super::models::HeadToHeadMatchRow;
use crate::domain::PlayerId;

/// Every match, across all tournaments, in which both players have a result
pub fn list_shared_matches(
    conn: &Connection,
    player1_id: PlayerId,
    player2_id: PlayerId,
) -> Result<Vec<HeadToHeadMatchRow>> {
    let sql = "
        SELECT
            t.id,
            t.name,
            r.round_number,
            r1.position,
            r2.position,
            r1.points,
            r2.points
        FROM match_results r1
        JOIN match_results r2 ON r2.match_id = r1.match_id AND r2.player_id = ?2
        JOIN matches m ON m.id = r1.match_id
        JOIN rounds r ON r.id = m.round_id
        JOIN tournaments t ON t.id = r.tournament_id
        WHERE r1.player_id = ?1
        ORDER BY t.date DESC, t.id DESC, r.round_number DESC, m.match_number
    ";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params![player1_id, player2_id], |row| {
        Ok(HeadToHeadMatchRow {
            tournament_id: row.get(0)?,
            tournament_name: row.get(1)?,
            round_number: row.get(2)?,
            p1_position: row.get(3)?,
            p2_position: row.get(4)?,
            p1_points: row.get(5)?,
            p2_points: row.get(6)?,
        })
    })?.collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}
