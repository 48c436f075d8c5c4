use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use super::models::{Circuit, CircuitStandingRow, NewCircuit};
use crate::domain::CircuitId;

const CIRCUIT_COLUMNS: &str = "id, name, description, start_date, end_date, created_at";

pub fn insert_circuit(conn: &Connection, circuit: &NewCircuit) -> Result<Circuit> {
    let sql = format!(
        "INSERT INTO circuits (name, description, start_date, end_date) VALUES (?1, ?2, ?3, ?4) RETURNING {CIRCUIT_COLUMNS}"
    );

    conn.query_row(
        &sql,
        params![circuit.name, circuit.description, circuit.start_date, circuit.end_date],
        parse_circuit_row,
    )
    .context("Failed to insert new circuit")
}

fn parse_circuit_row(row: &rusqlite::Row) -> rusqlite::Result<Circuit> {
    Ok(Circuit {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        start_date: row.get(3)?,
        end_date: row.get(4)?,
        created_at: row.get(5)?,
    })
}

pub fn find_by_id(conn: &Connection, id: CircuitId) -> Result<Option<Circuit>> {
    let sql = format!("SELECT {CIRCUIT_COLUMNS} FROM circuits WHERE id = ?1");

    conn.query_row(&sql, params![id], parse_circuit_row)
        .optional()
        .context("Failed to query circuit by id")
}

pub fn list_all(conn: &Connection) -> Result<Vec<Circuit>> {
    let sql = format!("SELECT {CIRCUIT_COLUMNS} FROM circuits ORDER BY start_date DESC, id DESC");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], parse_circuit_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

/// Tournament points summed over the completed tournaments of the circuit,
/// best total first, then most match wins
pub fn standings(conn: &Connection, circuit_id: CircuitId) -> Result<Vec<CircuitStandingRow>> {
    let sql = "SELECT p.id, p.name,
            SUM(mr.tournament_points) AS total_points,
            COUNT(DISTINCT t.id) AS tournaments_played,
            COUNT(DISTINCT CASE WHEN mr.position = 1 THEN mr.match_id END) AS wins
        FROM match_results mr
        JOIN matches m ON m.id = mr.match_id
        JOIN rounds r ON r.id = m.round_id
        JOIN tournaments t ON t.id = r.tournament_id
        JOIN players p ON p.id = mr.player_id
        WHERE t.circuit_id = ?1 AND t.status = 'completed'
        GROUP BY p.id, p.name
        ORDER BY total_points DESC, wins DESC, p.name, p.id";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![circuit_id], |row| {
            Ok(CircuitStandingRow {
                player_id: row.get(0)?,
                player_name: row.get(1)?,
                total_points: row.get(2)?,
                tournaments_played: row.get(3)?,
                wins: row.get(4)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to query circuit standings")?;

    Ok(rows)
}
