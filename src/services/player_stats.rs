use anyhow::Result;
use log::debug;

use crate::database::{Player, Tournament};
use crate::domain::{PlayerId, TournamentStatus, TournamentType};
use crate::errors::EngineError;
use crate::services::rounds::RoundService;
use crate::store::{load_history, Store};

const RECENT_TOURNAMENTS: usize = 10;

/// Finishes in one kind of tournament
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FinishStats {
    pub tournaments: u32,
    /// Tournaments finished first
    pub titles: u32,
    pub average_position: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TournamentFinish {
    pub tournament: Tournament,
    /// 1-based place in the final standings
    pub position: usize,
    pub points: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerStatistics {
    pub player: Player,
    pub overall: FinishStats,
    pub qualifier: FinishStats,
    pub circuit: FinishStats,
    /// Regular matches with recorded results, byes excluded
    pub matches_played: u32,
    /// 0 when the player has no completed tournament
    pub best_position: usize,
    pub worst_position: usize,
    /// Newest first
    pub recent: Vec<TournamentFinish>,
}

/// Career summary of a player over every completed tournament they entered
pub struct PlayerStatsService<S: Store + Clone> {
    store: S,
}

impl<S: Store + Clone> PlayerStatsService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn statistics(&self, player_id: PlayerId) -> Result<PlayerStatistics> {
        let player = self
            .store
            .get_player(player_id)?
            .ok_or(EngineError::PlayerNotFound(player_id))?;
        let rounds = RoundService::new(self.store.clone());

        let mut finishes = Vec::new();
        let mut matches_played = 0;
        for tournament in self.store.list_player_tournaments(player_id)? {
            if tournament.status != TournamentStatus::Completed {
                continue;
            }

            let standings = rounds.standings(tournament.id)?;
            let Some(idx) = standings.iter().position(|s| s.player_id == player_id) else {
                continue;
            };
            matches_played += load_history(&self.store, tournament.id)?
                .matches_of(player_id)
                .filter(|record| record.results.len() > 1)
                .count() as u32;

            finishes.push(TournamentFinish {
                position: idx + 1,
                points: standings[idx].total_points,
                tournament,
            });
        }
        debug!("Player {} finished {} tournaments", player_id, finishes.len());

        let of_type = |kind: TournamentType| -> Vec<&TournamentFinish> {
            finishes.iter().filter(|f| f.tournament.tournament_type == kind).collect()
        };

        Ok(PlayerStatistics {
            overall: finish_stats(&finishes.iter().collect::<Vec<_>>()),
            qualifier: finish_stats(&of_type(TournamentType::Qualifier)),
            circuit: finish_stats(&of_type(TournamentType::Circuit)),
            matches_played,
            best_position: finishes.iter().map(|f| f.position).min().unwrap_or(0),
            worst_position: finishes.iter().map(|f| f.position).max().unwrap_or(0),
            recent: finishes.iter().rev().take(RECENT_TOURNAMENTS).cloned().collect(),
            player,
        })
    }
}

fn finish_stats(finishes: &[&TournamentFinish]) -> FinishStats {
    if finishes.is_empty() {
        return FinishStats::default();
    }

    let total: usize = finishes.iter().map(|f| f.position).sum();
    FinishStats {
        tournaments: finishes.len() as u32,
        titles: finishes.iter().filter(|f| f.position == 1).count() as u32,
        average_position: total as f64 / finishes.len() as f64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn finish(position: usize) -> TournamentFinish {
        TournamentFinish {
            tournament: Tournament {
                id: position as i64,
                name: "Open".to_string(),
                date: NaiveDate::from_ymd_opt(2024, 2, 2).unwrap(),
                status: TournamentStatus::Completed,
                players_per_match: 2,
                number_of_rounds: None,
                tournament_type: TournamentType::Qualifier,
                circuit_id: None,
                created_at: None,
            },
            position,
            points: 0.0,
        }
    }

    #[test]
    fn test_finish_stats() {
        let finishes = [finish(1), finish(4), finish(1)];
        let stats = finish_stats(&finishes.iter().collect::<Vec<_>>());

        assert_eq!(stats, FinishStats { tournaments: 3, titles: 2, average_position: 2.0 });
        assert_eq!(finish_stats(&[]), FinishStats::default());
    }
}
