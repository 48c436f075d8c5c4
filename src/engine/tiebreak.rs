use std::cmp::Ordering;

use super::history::TournamentHistory;
use crate::domain::{PlayerId, TiebreakKind};

/// Scalar tiebreak value of one player for one criterion.
///
/// `HeadToHead` is pairwise by nature and evaluates to 0 here; the standings
/// calculator resolves it with [`head_to_head`] inside each tie group.
pub fn evaluate(history: &TournamentHistory, player_id: PlayerId, kind: TiebreakKind) -> f64 {
    match kind {
        TiebreakKind::Wins => history.wins(player_id) as f64,
        TiebreakKind::OpponentPointsDropWorst => opponent_points(history, player_id, false),
        TiebreakKind::OpponentPointsDropBestWorst => opponent_points(history, player_id, true),
        TiebreakKind::HeadToHead => 0.0,
        TiebreakKind::PointDifference => point_difference(history, player_id) as f64,
    }
}

/// Sum of every faced opponent's current tournament total, one entry per
/// opponent per match, minus the lowest entry (and the highest one too when
/// `drop_best` is set). Each drop needs at least two entries left.
pub fn opponent_points(history: &TournamentHistory, player_id: PlayerId, drop_best: bool) -> f64 {
    let mut points: Vec<f64> = history
        .matches_of(player_id)
        .flat_map(|m| m.opponents_of(player_id))
        .map(|opponent| history.total_points(opponent.player_id))
        .collect();

    points.sort_by(|a, b| b.total_cmp(a));

    if points.len() > 1 {
        points.pop();
    }
    if drop_best && points.len() > 1 {
        points.remove(0);
    }

    points.iter().sum()
}

/// +1 if `player_id` finished ahead of `other_id` in the first match they
/// shared, -1 if behind, 0 if level or they never met
pub fn head_to_head(history: &TournamentHistory, player_id: PlayerId, other_id: PlayerId) -> i32 {
    let shared = history.matches_of(player_id).find_map(|m| {
        let own = m.result_of(player_id)?;
        let other = m.result_of(other_id)?;
        Some((own.position, other.position))
    });

    match shared {
        Some((own, other)) => match own.cmp(&other) {
            Ordering::Less => 1,
            Ordering::Greater => -1,
            Ordering::Equal => 0,
        },
        None => 0,
    }
}

/// Σ over played matches of own raw points minus all opponents' raw points
pub fn point_difference(history: &TournamentHistory, player_id: PlayerId) -> i64 {
    history
        .matches_of(player_id)
        .map(|m| {
            let own = m.result_of(player_id).map(|r| r.points).unwrap_or(0);
            let against: i64 = m.opponents_of(player_id).map(|o| o.points).sum();
            own - against
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::types::{MatchRecord, ResultEntry};

    fn record(match_id: i64, round_number: u32, results: &[(PlayerId, u32, i64, f64)]) -> MatchRecord {
        MatchRecord {
            match_id,
            round_number,
            results: results
                .iter()
                .map(|&(player_id, position, points, tournament_points)| ResultEntry {
                    player_id,
                    position,
                    points,
                    tournament_points,
                })
                .collect(),
        }
    }

    /// Four players, two rounds of 1v1:
    /// R1: 1 beats 2 (30-10), 3 beats 4 (25-20)
    /// R2: 1 beats 3 (15-5),  2 beats 4 (40-0)
    /// Totals: 1 -> 2, 2 -> 1, 3 -> 1, 4 -> 0
    fn two_round_history() -> TournamentHistory {
        TournamentHistory::new(vec![
            record(1, 1, &[(1, 1, 30, 1.0), (2, 2, 10, 0.0)]),
            record(2, 1, &[(3, 1, 25, 1.0), (4, 2, 20, 0.0)]),
            record(3, 2, &[(1, 1, 15, 1.0), (3, 2, 5, 0.0)]),
            record(4, 2, &[(2, 1, 40, 1.0), (4, 2, 0, 0.0)]),
        ])
    }

    #[test]
    fn test_wins() {
        let history = two_round_history();
        assert_eq!(evaluate(&history, 1, TiebreakKind::Wins), 2.0);
        assert_eq!(evaluate(&history, 4, TiebreakKind::Wins), 0.0);
    }

    #[test]
    fn test_opponent_points_drop_worst() {
        let history = two_round_history();
        // player 4 faced 3 (1 pt) and 2 (1 pt): drop one -> 1
        assert_eq!(evaluate(&history, 4, TiebreakKind::OpponentPointsDropWorst), 1.0);
        // player 2 faced 1 (2 pts) and 4 (0 pts): drop 0 -> 2
        assert_eq!(evaluate(&history, 2, TiebreakKind::OpponentPointsDropWorst), 2.0);
    }

    #[test]
    fn test_opponent_points_single_value_is_kept() {
        let history = TournamentHistory::new(vec![record(1, 1, &[(1, 1, 3, 1.0), (2, 2, 1, 0.0)])]);
        assert_eq!(evaluate(&history, 2, TiebreakKind::OpponentPointsDropWorst), 1.0);
        assert_eq!(evaluate(&history, 2, TiebreakKind::OpponentPointsDropBestWorst), 1.0);
    }

    #[test]
    fn test_opponent_points_drop_best_and_worst() {
        // Player 1 meets 2, 3 and 4 in a single three-round event; totals 3, 2, 0 after all rounds
        let history = TournamentHistory::new(vec![
            record(1, 1, &[(1, 2, 0, 0.0), (2, 1, 1, 1.0)]),
            record(2, 1, &[(3, 1, 1, 1.0), (4, 2, 0, 0.0)]),
            record(3, 2, &[(1, 2, 0, 0.0), (3, 1, 1, 1.0)]),
            record(4, 2, &[(2, 1, 1, 1.0), (4, 2, 0, 0.0)]),
            record(5, 3, &[(1, 1, 1, 1.0), (4, 2, 0, 0.0)]),
            record(6, 3, &[(2, 1, 1, 1.0), (3, 2, 0, 0.0)]),
        ]);
        assert_eq!(history.total_points(2), 3.0);
        assert_eq!(history.total_points(3), 2.0);
        assert_eq!(history.total_points(4), 0.0);

        assert_eq!(evaluate(&history, 1, TiebreakKind::OpponentPointsDropWorst), 5.0);
        assert_eq!(evaluate(&history, 1, TiebreakKind::OpponentPointsDropBestWorst), 2.0);
    }

    #[test]
    fn test_opponent_points_use_totals_at_evaluation_time() {
        let mut matches = vec![record(1, 1, &[(1, 1, 3, 1.0), (2, 2, 1, 0.0)])];
        let before = TournamentHistory::new(matches.clone());
        assert_eq!(opponent_points(&before, 1, false), 0.0);

        matches.push(record(2, 2, &[(2, 1, 9, 1.0), (3, 2, 0, 0.0)]));
        let after = TournamentHistory::new(matches);
        assert_eq!(opponent_points(&after, 1, false), 1.0);
    }

    #[test]
    fn test_head_to_head() {
        let history = two_round_history();
        assert_eq!(head_to_head(&history, 1, 2), 1);
        assert_eq!(head_to_head(&history, 2, 1), -1);
        assert_eq!(head_to_head(&history, 1, 4), 0);
        assert_eq!(evaluate(&history, 1, TiebreakKind::HeadToHead), 0.0);
    }

    #[test]
    fn test_point_difference() {
        let history = two_round_history();
        // 1: (30-10) + (15-5) = 30
        assert_eq!(evaluate(&history, 1, TiebreakKind::PointDifference), 30.0);
        // 4: (20-25) + (0-40) = -45
        assert_eq!(evaluate(&history, 4, TiebreakKind::PointDifference), -45.0);
    }

    #[test]
    fn test_point_difference_multiplayer() {
        let history = TournamentHistory::new(vec![record(
            1,
            1,
            &[(1, 1, 50, 6.0), (2, 2, 30, 4.0), (3, 3, 10, 2.0)],
        )]);
        assert_eq!(point_difference(&history, 1), 10);
        assert_eq!(point_difference(&history, 3), -70);
    }

    #[test]
    fn test_unknown_player_scores_zero_everywhere() {
        let history = two_round_history();
        for kind in TiebreakKind::ALL {
            assert_eq!(evaluate(&history, 42, kind), 0.0);
        }
        assert_eq!(evaluate(&TournamentHistory::default(), 1, TiebreakKind::Wins), 0.0);
    }
}
