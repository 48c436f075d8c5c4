use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::{MatchId, PlayerId, Position, TiebreakKind};

/// Raw score entered for one player of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreEntry {
    pub player_id: PlayerId,
    pub points: i64,
}

impl ScoreEntry {
    pub fn new(player_id: PlayerId, points: i64) -> Self {
        Self { player_id, points }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PositionedEntry {
    pub player_id: PlayerId,
    pub position: Position,
    pub points: i64,
}

/// One player's line in a played match
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResultEntry {
    pub player_id: PlayerId,
    pub position: Position,
    pub points: i64,
    pub tournament_points: f64,
}

/// A match that has results, with the round it belongs to
#[derive(Debug, Clone, PartialEq)]
pub struct MatchRecord {
    pub match_id: MatchId,
    pub round_number: u32,
    pub results: Vec<ResultEntry>,
}

impl MatchRecord {
    pub fn result_of(&self, player_id: PlayerId) -> Option<&ResultEntry> {
        self.results.iter().find(|r| r.player_id == player_id)
    }

    pub fn opponents_of(&self, player_id: PlayerId) -> impl Iterator<Item = &ResultEntry> {
        self.results.iter().filter(move |r| r.player_id != player_id)
    }
}

/// Registered player as seen by the standings calculator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contestant {
    pub id: PlayerId,
    pub name: String,
}

impl Contestant {
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self { id, name: name.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Standing {
    pub player_id: PlayerId,
    pub player_name: String,
    pub total_points: f64,
    pub wins: u32,
    pub tiebreak_values: BTreeMap<TiebreakKind, f64>,
}

impl Standing {
    pub fn tiebreak(&self, kind: TiebreakKind) -> f64 {
        self.tiebreak_values.get(&kind).copied().unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannedMatch {
    Regular(Vec<PlayerId>),
    Bye(PlayerId),
}

/// Output of the pairing engine, in match-number order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoundPlan {
    pub matches: Vec<PlannedMatch>,
}

impl RoundPlan {
    pub fn push_match(&mut self, players: Vec<PlayerId>) {
        self.matches.push(PlannedMatch::Regular(players));
    }

    pub fn push_bye(&mut self, player_id: PlayerId) {
        self.matches.push(PlannedMatch::Bye(player_id));
    }

    pub fn byes(&self) -> Vec<PlayerId> {
        self.matches
            .iter()
            .filter_map(|m| match m {
                PlannedMatch::Bye(p) => Some(*p),
                PlannedMatch::Regular(_) => None,
            })
            .collect()
    }

    pub fn regular_matches(&self) -> Vec<&[PlayerId]> {
        self.matches
            .iter()
            .filter_map(|m| match m {
                PlannedMatch::Regular(players) => Some(players.as_slice()),
                PlannedMatch::Bye(_) => None,
            })
            .collect()
    }
}
