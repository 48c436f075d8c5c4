use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub type PlayerId = i64;
pub type TournamentId = i64;
pub type RoundId = i64;
pub type MatchId = i64;
pub type CircuitId = i64;

/// Finishing position inside a single match (1-based)
pub type Position = u32;

/// Tournament lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentStatus {
    Draft,
    InProgress,
    Completed,
}

/// Qualifiers stand alone; circuit tournaments feed a circuit's cumulative ranking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentType {
    #[default]
    Qualifier,
    Circuit,
}

/// Round lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundStatus {
    Pending,
    InProgress,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Pending,
    Completed,
}

/// How the player receiving a bye is chosen from the candidate set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ByeSelection {
    /// Last candidate in standings order
    #[default]
    Worst,
    /// Uniformly random candidate
    Random,
    /// Last candidate that has never had a bye in this tournament
    RoundRobin,
}

/// Closed set of tiebreak criteria
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TiebreakKind {
    Wins,
    OpponentPointsDropWorst,
    OpponentPointsDropBestWorst,
    HeadToHead,
    PointDifference,
}

impl TiebreakKind {
    pub const ALL: [TiebreakKind; 5] = [
        TiebreakKind::Wins,
        TiebreakKind::OpponentPointsDropWorst,
        TiebreakKind::OpponentPointsDropBestWorst,
        TiebreakKind::HeadToHead,
        TiebreakKind::PointDifference,
    ];

    /// Column header for standings tables
    pub fn label(&self) -> &'static str {
        match self {
            TiebreakKind::Wins => "W",
            TiebreakKind::OpponentPointsDropWorst => "OPP-W",
            TiebreakKind::OpponentPointsDropBestWorst => "OPP-BW",
            TiebreakKind::HeadToHead => "H2H",
            TiebreakKind::PointDifference => "DIFF",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TiebreakCriterion {
    #[serde(rename = "id")]
    pub kind: TiebreakKind,
    pub enabled: bool,
    pub order: u32,
}

impl TiebreakCriterion {
    pub fn new(kind: TiebreakKind, enabled: bool, order: u32) -> Self {
        Self { kind, enabled, order }
    }
}

/// Enabled criteria sorted by their configured order
pub fn enabled_in_order(criteria: &[TiebreakCriterion]) -> Vec<TiebreakKind> {
    let mut enabled: Vec<&TiebreakCriterion> = criteria.iter().filter(|c| c.enabled).collect();
    enabled.sort_by_key(|c| c.order);
    enabled.into_iter().map(|c| c.kind).collect()
}

/// Position -> tournament points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoringSystem(pub BTreeMap<Position, f64>);

impl ScoringSystem {
    pub fn from_pairs(pairs: &[(Position, f64)]) -> Self {
        Self(pairs.iter().copied().collect())
    }

    /// Default table for a match size; unknown sizes use the two-player table
    pub fn default_for(players_per_match: u32) -> Self {
        match players_per_match {
            3 => Self::from_pairs(&[(1, 3.0), (2, 1.0), (3, 0.0)]),
            4 => Self::from_pairs(&[(1, 6.0), (2, 4.0), (3, 2.0), (4, 0.0)]),
            _ => Self::from_pairs(&[(1, 1.0), (2, 0.0)]),
        }
    }

    /// Unmapped positions score nothing
    pub fn points_for(&self, position: Position) -> f64 {
        self.0.get(&position).copied().unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TournamentConfig {
    pub avoid_rematches: bool,
    pub scoring_system: ScoringSystem,
    pub tiebreak_criteria: Vec<TiebreakCriterion>,
    #[serde(default)]
    pub bye_selection: ByeSelection,
}

impl TournamentConfig {
    pub fn default_for(players_per_match: u32) -> Self {
        Self {
            avoid_rematches: true,
            scoring_system: ScoringSystem::default_for(players_per_match),
            tiebreak_criteria: default_tiebreak_criteria(),
            bye_selection: ByeSelection::Worst,
        }
    }

    pub fn enabled_criteria(&self) -> Vec<TiebreakKind> {
        enabled_in_order(&self.tiebreak_criteria)
    }
}

pub fn default_tiebreak_criteria() -> Vec<TiebreakCriterion> {
    TiebreakKind::ALL
        .iter()
        .enumerate()
        .map(|(idx, &kind)| TiebreakCriterion::new(kind, true, idx as u32 + 1))
        .collect()
}

/// Round limit when a tournament has no fixed number of rounds
pub fn calculate_number_of_rounds(num_players: usize) -> u32 {
    match num_players {
        0..=2 => 1,
        3..=4 => 2,
        5..=8 => 3,
        9..=16 => 4,
        17..=32 => 5,
        33..=64 => 6,
        _ => 7,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {}: {}", self.kind, self.value)
    }
}

impl std::error::Error for ParseEnumError {}

macro_rules! string_enum {
    ($ty:ident, $kind:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $ty {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($ty::$variant => $text,)+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.pad(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($ty::$variant),)+
                    other => Err(ParseEnumError { kind: $kind, value: other.to_string() }),
                }
            }
        }
    };
}

string_enum!(TournamentStatus, "tournament status", {
    Draft => "draft",
    InProgress => "in_progress",
    Completed => "completed",
});

string_enum!(TournamentType, "tournament type", {
    Qualifier => "qualifier",
    Circuit => "circuit",
});

string_enum!(RoundStatus, "round status", {
    Pending => "pending",
    InProgress => "in_progress",
    Completed => "completed",
});

string_enum!(MatchStatus, "match status", {
    Pending => "pending",
    Completed => "completed",
});

string_enum!(ByeSelection, "bye selection", {
    Worst => "worst",
    Random => "random",
    RoundRobin => "round_robin",
});

string_enum!(TiebreakKind, "tiebreak criterion", {
    Wins => "wins",
    OpponentPointsDropWorst => "opponent_points_drop_worst",
    OpponentPointsDropBestWorst => "opponent_points_drop_best_worst",
    HeadToHead => "head_to_head",
    PointDifference => "point_difference",
});
