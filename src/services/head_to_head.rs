use anyhow::Result;
use log::info;

use crate::database::{HeadToHeadMatchRow, Player};
use crate::domain::PlayerId;
use crate::errors::EngineError;
use crate::store::Store;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeadToHeadStats {
    pub total_matches: u32,
    pub player1_wins: u32,
    pub player2_wins: u32,
    pub ties: u32,
    pub player1_points: i64,
    pub player2_points: i64,
}

impl HeadToHeadStats {
    fn add(&mut self, row: &HeadToHeadMatchRow) {
        self.total_matches += 1;
        self.player1_points += row.p1_points;
        self.player2_points += row.p2_points;
        match row.p1_position.cmp(&row.p2_position) {
            std::cmp::Ordering::Less => self.player1_wins += 1,
            std::cmp::Ordering::Greater => self.player2_wins += 1,
            std::cmp::Ordering::Equal => self.ties += 1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HeadToHeadRecord {
    pub player1: Player,
    pub player2: Player,
    pub matches: Vec<HeadToHeadMatchRow>,
    pub stats: HeadToHeadStats,
}

/// Every match two players shared, across all tournaments
pub struct HeadToHeadService<S: Store> {
    store: S,
}

impl<S: Store> HeadToHeadService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// `None` when either player does not exist
    pub fn compare(&self, player1_id: PlayerId, player2_id: PlayerId) -> Result<Option<HeadToHeadRecord>> {
        if player1_id == player2_id {
            return Err(EngineError::SamePlayer(player1_id).into());
        }

        let (Some(player1), Some(player2)) = (
            self.store.get_player(player1_id)?,
            self.store.get_player(player2_id)?,
        ) else {
            return Ok(None);
        };

        let matches = self.store.list_head_to_head(player1_id, player2_id)?;
        let stats = matches.iter().fold(HeadToHeadStats::default(), |mut stats, row| {
            stats.add(row);
            stats
        });
        info!(
            "{} vs {}: {} shared matches",
            player1.name, player2.name, stats.total_matches
        );

        Ok(Some(HeadToHeadRecord { player1, player2, matches, stats }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::NewPlayer;
    use crate::errors::engine_error;
    use crate::store::SqliteStore;

    fn row(p1_position: u32, p2_position: u32, p1_points: i64, p2_points: i64) -> HeadToHeadMatchRow {
        HeadToHeadMatchRow {
            tournament_id: 1,
            tournament_name: "Spring".to_string(),
            round_number: 1,
            p1_position,
            p2_position,
            p1_points,
            p2_points,
        }
    }

    #[test]
    fn test_stats_count_wins_ties_and_points() {
        let mut stats = HeadToHeadStats::default();
        for r in [row(1, 2, 10, 4), row(3, 1, 2, 9), row(1, 1, 5, 5), row(2, 4, 7, 1)] {
            stats.add(&r);
        }

        assert_eq!(
            stats,
            HeadToHeadStats {
                total_matches: 4,
                player1_wins: 2,
                player2_wins: 1,
                ties: 1,
                player1_points: 24,
                player2_points: 19,
            }
        );
    }

    #[test]
    fn test_compare_rejects_same_player() {
        let store = SqliteStore::in_memory().unwrap();
        let player = store.create_player(&NewPlayer::named("Solo")).unwrap();
        let service = HeadToHeadService::new(store);

        let err = service.compare(player.id, player.id).unwrap_err();
        assert_eq!(engine_error(&err), Some(&EngineError::SamePlayer(player.id)));
    }

    #[test]
    fn test_compare_unknown_player_is_none() {
        let store = SqliteStore::in_memory().unwrap();
        let player = store.create_player(&NewPlayer::named("Solo")).unwrap();
        let service = HeadToHeadService::new(store);

        assert!(service.compare(player.id, player.id + 1).unwrap().is_none());
    }
}
