use std::collections::{HashMap, HashSet};

use super::types::MatchRecord;
use crate::domain::PlayerId;

pub type OpponentHistory = HashMap<PlayerId, HashSet<PlayerId>>;

/// Snapshot of every played match of one tournament.
///
/// Totals are summed once at construction; a snapshot is built per request so
/// it always reflects the full history at call time.
#[derive(Debug, Clone, Default)]
pub struct TournamentHistory {
    matches: Vec<MatchRecord>,
    totals: HashMap<PlayerId, f64>,
}

impl TournamentHistory {
    pub fn new(mut matches: Vec<MatchRecord>) -> Self {
        matches.sort_by_key(|m| m.round_number);

        let mut totals = HashMap::new();
        for record in &matches {
            for result in &record.results {
                *totals.entry(result.player_id).or_insert(0.0) += result.tournament_points;
            }
        }

        Self { matches, totals }
    }

    pub fn matches(&self) -> &[MatchRecord] {
        &self.matches
    }

    /// Matches the player has a result in, oldest round first
    pub fn matches_of(&self, player_id: PlayerId) -> impl Iterator<Item = &MatchRecord> {
        self.matches
            .iter()
            .filter(move |m| m.result_of(player_id).is_some())
    }

    pub fn total_points(&self, player_id: PlayerId) -> f64 {
        self.totals.get(&player_id).copied().unwrap_or(0.0)
    }

    pub fn wins(&self, player_id: PlayerId) -> u32 {
        self.matches_of(player_id)
            .filter(|m| m.result_of(player_id).is_some_and(|r| r.position == 1))
            .count() as u32
    }

    /// Everyone each player has shared a match with
    pub fn opponents(&self) -> OpponentHistory {
        let mut opponents: OpponentHistory = HashMap::new();
        for record in &self.matches {
            for result in &record.results {
                let faced = opponents.entry(result.player_id).or_default();
                faced.extend(record.opponents_of(result.player_id).map(|o| o.player_id));
            }
        }
        opponents
    }
}
