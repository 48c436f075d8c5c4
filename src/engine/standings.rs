use std::cmp::Ordering;
use std::collections::BTreeMap;

use super::history::TournamentHistory;
use super::tiebreak;
use super::types::{Contestant, Standing};
use crate::domain::TiebreakKind;

/// Ranks every registered player by total points, then by each criterion of
/// `criteria` in the given order (callers pass only the enabled ones).
///
/// Head-to-head is scored as a mini-league inside the tie group: the sum of
/// pairwise results against every player level on points and on all criteria
/// ranked before it. For a two-way tie this is the direct result.
pub fn calculate_standings(
    players: &[Contestant],
    history: &TournamentHistory,
    criteria: &[TiebreakKind],
) -> Vec<Standing> {
    let mut standings: Vec<Standing> = players
        .iter()
        .map(|player| base_standing(player, history, criteria))
        .collect();

    if let Some(h2h_idx) = criteria.iter().position(|&k| k == TiebreakKind::HeadToHead) {
        apply_head_to_head(&mut standings, history, &criteria[..h2h_idx]);
    }

    sort_standings(&mut standings, criteria);
    standings
}

fn base_standing(player: &Contestant, history: &TournamentHistory, criteria: &[TiebreakKind]) -> Standing {
    let tiebreak_values: BTreeMap<TiebreakKind, f64> = criteria
        .iter()
        .map(|&kind| (kind, tiebreak::evaluate(history, player.id, kind)))
        .collect();

    Standing {
        player_id: player.id,
        player_name: player.name.clone(),
        total_points: history.total_points(player.id),
        wins: history.wins(player.id),
        tiebreak_values,
    }
}

fn apply_head_to_head(standings: &mut [Standing], history: &TournamentHistory, preceding: &[TiebreakKind]) {
    let scores: Vec<f64> = standings
        .iter()
        .map(|standing| {
            standings
                .iter()
                .filter(|other| other.player_id != standing.player_id)
                .filter(|other| level_on(standing, other, preceding))
                .map(|other| tiebreak::head_to_head(history, standing.player_id, other.player_id))
                .sum::<i32>() as f64
        })
        .collect();

    for (standing, score) in standings.iter_mut().zip(scores) {
        standing.tiebreak_values.insert(TiebreakKind::HeadToHead, score);
    }
}

fn level_on(a: &Standing, b: &Standing, criteria: &[TiebreakKind]) -> bool {
    compare_standings(a, b, criteria) == Ordering::Equal
}

/// Stable lexicographic sort: total points desc, then each criterion desc
pub fn sort_standings(standings: &mut [Standing], criteria: &[TiebreakKind]) {
    standings.sort_by(|a, b| compare_standings(a, b, criteria));
}

fn compare_standings(a: &Standing, b: &Standing, criteria: &[TiebreakKind]) -> Ordering {
    criteria.iter().fold(
        b.total_points.total_cmp(&a.total_points),
        |ordering, &kind| ordering.then_with(|| b.tiebreak(kind).total_cmp(&a.tiebreak(kind))),
    )
}
