use std::cmp::Ordering;

use super::types::{PositionedEntry, ScoreEntry};
use crate::domain::{PlayerId, Position};

/// Turns raw match points into finishing positions.
///
/// Higher points finish ahead. Tied players share a position (standard
/// competition ranking: 1, 1, 3). The player who started the match is ordered
/// after the others in a tie, and in a two-player tie they take 2nd place
/// outright. In larger tie groups the starter only moves down in order and
/// still shares the group's position.
pub fn resolve_positions(
    entries: &[ScoreEntry],
    first_player_id: Option<PlayerId>,
) -> Vec<PositionedEntry> {
    let mut sorted = entries.to_vec();
    sorted.sort_by(|a, b| {
        b.points
            .cmp(&a.points)
            .then_with(|| starter_last(a, b, first_player_id))
    });

    if let Some(starter) = two_player_tie_starter(&sorted, first_player_id) {
        return sorted
            .iter()
            .map(|entry| PositionedEntry {
                player_id: entry.player_id,
                position: if entry.player_id == starter { 2 } else { 1 },
                points: entry.points,
            })
            .collect();
    }

    competition_ranking(&sorted)
}

fn starter_last(a: &ScoreEntry, b: &ScoreEntry, first_player_id: Option<PlayerId>) -> Ordering {
    let is_starter = |e: &ScoreEntry| Some(e.player_id) == first_player_id;
    is_starter(a).cmp(&is_starter(b))
}

fn two_player_tie_starter(sorted: &[ScoreEntry], first_player_id: Option<PlayerId>) -> Option<PlayerId> {
    let starter = first_player_id?;
    match sorted {
        [a, b] if a.points == b.points && (a.player_id == starter || b.player_id == starter) => {
            Some(starter)
        }
        _ => None,
    }
}

fn competition_ranking(sorted: &[ScoreEntry]) -> Vec<PositionedEntry> {
    let mut positioned = Vec::with_capacity(sorted.len());
    let mut current: Position = 1;

    for (idx, entry) in sorted.iter().enumerate() {
        if idx > 0 && sorted[idx - 1].points != entry.points {
            current = idx as Position + 1;
        }
        positioned.push(PositionedEntry {
            player_id: entry.player_id,
            position: current,
            points: entry.points,
        });
    }

    positioned
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(scores: &[(PlayerId, i64)]) -> Vec<ScoreEntry> {
        scores.iter().map(|&(id, pts)| ScoreEntry::new(id, pts)).collect()
    }

    fn position_of(resolved: &[PositionedEntry], player_id: PlayerId) -> Position {
        resolved
            .iter()
            .find(|e| e.player_id == player_id)
            .map(|e| e.position)
            .unwrap()
    }

    #[test]
    fn test_empty_input() {
        assert!(resolve_positions(&[], None).is_empty());
        assert!(resolve_positions(&[], Some(1)).is_empty());
    }

    #[test]
    fn test_distinct_points_strictly_increasing_positions() {
        let resolved = resolve_positions(&entries(&[(1, 10), (2, 40), (3, 25), (4, 5)]), None);
        let order: Vec<_> = resolved.iter().map(|e| (e.player_id, e.position)).collect();
        assert_eq!(order, vec![(2, 1), (3, 2), (1, 3), (4, 4)]);
    }

    #[test]
    fn test_competition_ranking_skips_after_tie() {
        let resolved = resolve_positions(&entries(&[(1, 30), (2, 30), (3, 20), (4, 20)]), None);
        assert_eq!(position_of(&resolved, 1), 1);
        assert_eq!(position_of(&resolved, 2), 1);
        assert_eq!(position_of(&resolved, 3), 3);
        assert_eq!(position_of(&resolved, 4), 3);
    }

    #[test]
    fn test_two_player_tie_starter_loses() {
        let resolved = resolve_positions(&entries(&[(7, 50), (9, 50)]), Some(7));
        assert_eq!(position_of(&resolved, 7), 2);
        assert_eq!(position_of(&resolved, 9), 1);
        assert_eq!(resolved[0].player_id, 9);

        let resolved = resolve_positions(&entries(&[(7, 50), (9, 50)]), Some(9));
        assert_eq!(position_of(&resolved, 9), 2);
        assert_eq!(position_of(&resolved, 7), 1);
    }

    #[test]
    fn test_two_player_tie_without_starter_is_shared() {
        let resolved = resolve_positions(&entries(&[(7, 50), (9, 50)]), None);
        assert_eq!(position_of(&resolved, 7), 1);
        assert_eq!(position_of(&resolved, 9), 1);
    }

    #[test]
    fn test_starter_irrelevant_without_tie() {
        let resolved = resolve_positions(&entries(&[(7, 60), (9, 50)]), Some(7));
        assert_eq!(position_of(&resolved, 7), 1);
        assert_eq!(position_of(&resolved, 9), 2);
    }

    #[test]
    fn test_larger_tie_only_reorders_starter() {
        let resolved = resolve_positions(&entries(&[(1, 20), (2, 20), (3, 20), (4, 5)]), Some(1));
        let order: Vec<_> = resolved.iter().map(|e| e.player_id).collect();
        assert_eq!(order, vec![2, 3, 1, 4]);
        assert_eq!(position_of(&resolved, 1), 1);
        assert_eq!(position_of(&resolved, 2), 1);
        assert_eq!(position_of(&resolved, 4), 4);
    }
}
