use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};

use crate::domain::{
    ByeSelection, CircuitId, MatchId, MatchStatus, PlayerId, Position, RoundId, RoundStatus,
    TournamentId, TournamentStatus, TournamentType,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub bga_username: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Default)]
pub struct NewPlayer {
    pub name: String,
    pub bga_username: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl NewPlayer {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub date: NaiveDate,
    pub status: TournamentStatus,
    pub players_per_match: u32,
    pub number_of_rounds: Option<u32>,
    pub tournament_type: TournamentType,
    pub circuit_id: Option<CircuitId>,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone)]
pub struct NewTournament {
    pub name: String,
    pub date: NaiveDate,
    pub players_per_match: u32,
    pub number_of_rounds: Option<u32>,
    /// Circuit this tournament counts towards; `None` for a qualifier
    pub circuit_id: Option<CircuitId>,
}

impl NewTournament {
    pub fn tournament_type(&self) -> TournamentType {
        match self.circuit_id {
            Some(_) => TournamentType::Circuit,
            None => TournamentType::Qualifier,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Circuit {
    pub id: CircuitId,
    pub name: String,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Default)]
pub struct NewCircuit {
    pub name: String,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Cumulative result of one player over the completed tournaments of a circuit
#[derive(Debug, Clone, PartialEq)]
pub struct CircuitStandingRow {
    pub player_id: PlayerId,
    pub player_name: String,
    pub total_points: f64,
    pub tournaments_played: u32,
    /// Matches finished in first place, byes included
    pub wins: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Round {
    pub id: RoundId,
    pub tournament_id: TournamentId,
    pub round_number: u32,
    pub status: RoundStatus,
    pub started_at: Option<NaiveDateTime>,
    pub completed_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    pub id: MatchId,
    pub round_id: RoundId,
    pub match_number: u32,
    pub status: MatchStatus,
    pub first_player_id: Option<PlayerId>,
    pub completed_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub match_id: MatchId,
    pub player_id: PlayerId,
    pub position: Position,
    pub points: i64,
    pub tournament_points: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerBye {
    pub tournament_id: TournamentId,
    pub player_id: PlayerId,
    pub round_number: u32,
}

/// One row of a cross-tournament head-to-head query
#[derive(Debug, Clone)]
pub struct HeadToHeadMatchRow {
    pub tournament_id: TournamentId,
    pub tournament_name: String,
    pub round_number: u32,
    pub p1_position: Position,
    pub p2_position: Position,
    pub p1_points: i64,
    pub p2_points: i64,
}

macro_rules! text_column {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl ToSql for $ty {
                fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                    Ok(ToSqlOutput::from(self.as_str()))
                }
            }

            impl FromSql for $ty {
                fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                    value
                        .as_str()?
                        .parse()
                        .map_err(|e| FromSqlError::Other(Box::new(e)))
                }
            }
        )+
    };
}

text_column!(TournamentStatus, TournamentType, RoundStatus, MatchStatus, ByeSelection);
