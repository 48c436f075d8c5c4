use std::collections::{BTreeMap, HashSet};

use log::{debug, warn};
use rand::seq::SliceRandom;
use rand::Rng;

use super::history::OpponentHistory;
use super::types::{RoundPlan, Standing};
use crate::domain::{ByeSelection, PlayerId};

/// Everything the next-round pairing needs besides the standings
#[derive(Debug, Clone)]
pub struct PairingContext {
    pub players_per_match: usize,
    pub avoid_rematches: bool,
    pub bye_selection: ByeSelection,
    pub opponents: OpponentHistory,
    /// Players that already had a bye in this tournament
    pub had_bye: HashSet<PlayerId>,
}

impl PairingContext {
    fn have_met(&self, a: PlayerId, b: PlayerId) -> bool {
        self.opponents.get(&a).is_some_and(|faced| faced.contains(&b))
    }
}

/// Random first round: shuffle, then cut into groups of `players_per_match`.
/// A lone trailing player gets a bye; a larger short group plays as is.
pub fn pair_first_round<R: Rng + ?Sized>(
    players: &[PlayerId],
    players_per_match: usize,
    rng: &mut R,
) -> RoundPlan {
    let mut shuffled = players.to_vec();
    shuffled.shuffle(rng);

    let mut plan = RoundPlan::default();
    for group in shuffled.chunks(players_per_match.max(2)) {
        match group {
            [single] => plan.push_bye(*single),
            _ => plan.push_match(group.to_vec()),
        }
    }

    plan
}

/// Pairs the next round from the current standings.
///
/// Players are banded by `floor(total_points)`, best band first, standings
/// order kept inside a band. Each band is paired on its own; a band that does
/// not divide into full groups hands out a bye (see [`select_bye`]).
pub fn pair_next_round<R: Rng + ?Sized>(
    standings: &[Standing],
    context: &PairingContext,
    rng: &mut R,
) -> RoundPlan {
    let mut had_bye = context.had_bye.clone();
    let mut plan = RoundPlan::default();

    for band in score_bands(standings) {
        pair_band(band, context, &mut had_bye, &mut plan, rng);
    }

    plan
}

fn score_bands(standings: &[Standing]) -> Vec<Vec<PlayerId>> {
    let mut bands: BTreeMap<i64, Vec<PlayerId>> = BTreeMap::new();
    for standing in standings {
        let band = standing.total_points.floor() as i64;
        bands.entry(band).or_default().push(standing.player_id);
    }
    bands.into_values().rev().collect()
}

fn pair_band<R: Rng + ?Sized>(
    mut band: Vec<PlayerId>,
    context: &PairingContext,
    had_bye: &mut HashSet<PlayerId>,
    plan: &mut RoundPlan,
    rng: &mut R,
) {
    let group_size = context.players_per_match.max(2);
    let remainder = band.len() % group_size;
    let mut byes = Vec::new();

    if remainder == 1 {
        let idx = select_bye(&band, context.bye_selection, had_bye, rng);
        byes.push(band.remove(idx));
    } else if remainder > 1 {
        let trailing_start = band.len() - remainder;
        let idx = select_bye(&band[trailing_start..], context.bye_selection, had_bye, rng);
        byes.push(band.remove(trailing_start + idx));
        if remainder - 1 == 1 {
            byes.push(band.remove(trailing_start));
        }
    }

    let mut start = 0;
    while start < band.len() {
        let end = (start + group_size).min(band.len());
        if context.avoid_rematches && end - start == 2 {
            avoid_rematch(&mut band, start, end, context);
        }
        plan.push_match(band[start..end].to_vec());
        start = end;
    }

    for player_id in byes {
        debug!("Player {player_id} receives a bye");
        had_bye.insert(player_id);
        plan.push_bye(player_id);
    }
}

/// Swaps the second player of a repeat pairing with the first later player in
/// the band who has not met the first one. Keeps the rematch if nobody fits.
fn avoid_rematch(band: &mut [PlayerId], start: usize, end: usize, context: &PairingContext) {
    let first = band[start];
    if !context.have_met(first, band[start + 1]) {
        return;
    }

    match (end..band.len()).find(|&j| !context.have_met(first, band[j])) {
        Some(j) => {
            debug!("Swapping {} for {} to avoid a rematch with {first}", band[start + 1], band[j]);
            band.swap(start + 1, j);
        }
        None => warn!("No alternative opponent for {first}; rematch against {} kept", band[start + 1]),
    }
}

/// Index into `candidates` (standings order) of the player who gets the bye
pub fn select_bye<R: Rng + ?Sized>(
    candidates: &[PlayerId],
    selection: ByeSelection,
    had_bye: &HashSet<PlayerId>,
    rng: &mut R,
) -> usize {
    let last = candidates.len().saturating_sub(1);
    match selection {
        ByeSelection::Worst => last,
        ByeSelection::Random => rng.gen_range(0..candidates.len().max(1)),
        ByeSelection::RoundRobin => candidates
            .iter()
            .rposition(|p| !had_bye.contains(p))
            .unwrap_or(last),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::types::PlannedMatch;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::{BTreeMap, HashMap};

    fn standing(player_id: PlayerId, total_points: f64) -> Standing {
        Standing {
            player_id,
            player_name: format!("P{player_id}"),
            total_points,
            wins: 0,
            tiebreak_values: BTreeMap::new(),
        }
    }

    fn context(players_per_match: usize, bye_selection: ByeSelection) -> PairingContext {
        PairingContext {
            players_per_match,
            avoid_rematches: true,
            bye_selection,
            opponents: HashMap::new(),
            had_bye: HashSet::new(),
        }
    }

    fn met(pairs: &[(PlayerId, PlayerId)]) -> OpponentHistory {
        let mut opponents: OpponentHistory = HashMap::new();
        for &(a, b) in pairs {
            opponents.entry(a).or_default().insert(b);
            opponents.entry(b).or_default().insert(a);
        }
        opponents
    }

    fn assert_each_player_once(plan: &RoundPlan, expected: usize) {
        let mut seen = HashSet::new();
        for m in &plan.matches {
            match m {
                PlannedMatch::Regular(players) => {
                    for p in players {
                        assert!(seen.insert(*p), "player {p} placed twice");
                    }
                }
                PlannedMatch::Bye(p) => assert!(seen.insert(*p), "player {p} placed twice"),
            }
        }
        assert_eq!(seen.len(), expected);
    }

    #[test]
    fn test_first_round_even_split() {
        let mut rng = StdRng::seed_from_u64(7);
        let players: Vec<PlayerId> = (1..=8).collect();
        let plan = pair_first_round(&players, 2, &mut rng);

        assert_eq!(plan.matches.len(), 4);
        assert!(plan.byes().is_empty());
        assert_each_player_once(&plan, 8);
    }

    #[test]
    fn test_first_round_five_players_one_bye() {
        let mut rng = StdRng::seed_from_u64(11);
        let players: Vec<PlayerId> = (1..=5).collect();
        let plan = pair_first_round(&players, 2, &mut rng);

        assert_eq!(plan.regular_matches().len(), 2);
        assert_eq!(plan.byes().len(), 1);
        assert!(matches!(plan.matches.last(), Some(PlannedMatch::Bye(_))));
        assert_each_player_once(&plan, 5);
    }

    #[test]
    fn test_first_round_short_group_plays() {
        let mut rng = StdRng::seed_from_u64(3);
        let players: Vec<PlayerId> = (1..=6).collect();
        let plan = pair_first_round(&players, 4, &mut rng);

        let sizes: Vec<usize> = plan.regular_matches().iter().map(|m| m.len()).collect();
        assert_eq!(sizes, vec![4, 2]);
        assert!(plan.byes().is_empty());
    }

    #[test]
    fn test_first_round_is_deterministic_per_seed() {
        let players: Vec<PlayerId> = (1..=10).collect();
        let a = pair_first_round(&players, 2, &mut StdRng::seed_from_u64(99));
        let b = pair_first_round(&players, 2, &mut StdRng::seed_from_u64(99));
        assert_eq!(a, b);
    }

    #[test]
    fn test_next_round_pairs_within_bands() {
        let standings = vec![
            standing(1, 2.0),
            standing(2, 2.0),
            standing(3, 1.0),
            standing(4, 1.0),
            standing(5, 0.0),
            standing(6, 0.0),
        ];
        let plan = pair_next_round(&standings, &context(2, ByeSelection::Worst), &mut StdRng::seed_from_u64(1));

        assert_eq!(
            plan.matches,
            vec![
                PlannedMatch::Regular(vec![1, 2]),
                PlannedMatch::Regular(vec![3, 4]),
                PlannedMatch::Regular(vec![5, 6]),
            ]
        );
    }

    #[test]
    fn test_fractional_points_share_a_band() {
        let standings = vec![standing(1, 1.5), standing(2, 1.0), standing(3, 0.5), standing(4, 0.0)];
        let plan = pair_next_round(&standings, &context(2, ByeSelection::Worst), &mut StdRng::seed_from_u64(1));
        assert_eq!(plan.regular_matches(), vec![&[1, 2][..], &[3, 4][..]]);
    }

    #[test]
    fn test_odd_band_worst_gets_bye() {
        let standings = vec![standing(1, 1.0), standing(2, 1.0), standing(3, 1.0), standing(4, 0.0), standing(5, 0.0)];
        let plan = pair_next_round(&standings, &context(2, ByeSelection::Worst), &mut StdRng::seed_from_u64(1));

        assert_eq!(
            plan.matches,
            vec![
                PlannedMatch::Regular(vec![1, 2]),
                PlannedMatch::Bye(3),
                PlannedMatch::Regular(vec![4, 5]),
            ]
        );
    }

    #[test]
    fn test_round_robin_skips_players_with_bye() {
        let standings = vec![standing(1, 1.0), standing(2, 1.0), standing(3, 1.0)];
        let mut ctx = context(2, ByeSelection::RoundRobin);
        ctx.had_bye.insert(3);
        let plan = pair_next_round(&standings, &ctx, &mut StdRng::seed_from_u64(1));

        assert_eq!(plan.byes(), vec![2]);
        assert_eq!(plan.regular_matches(), vec![&[1, 3][..]]);
    }

    #[test]
    fn test_round_robin_falls_back_to_worst() {
        let standings = vec![standing(1, 1.0), standing(2, 1.0), standing(3, 1.0)];
        let mut ctx = context(2, ByeSelection::RoundRobin);
        ctx.had_bye.extend([1, 2, 3]);
        let plan = pair_next_round(&standings, &ctx, &mut StdRng::seed_from_u64(1));
        assert_eq!(plan.byes(), vec![3]);
    }

    #[test]
    fn test_round_robin_tracks_byes_across_bands() {
        // Byes handed out in a higher band already count when the next band picks
        let standings = vec![standing(1, 1.0), standing(2, 0.0), standing(3, 0.0), standing(4, 0.0)];
        let mut ctx = context(2, ByeSelection::RoundRobin);
        ctx.had_bye.insert(4);
        let plan = pair_next_round(&standings, &ctx, &mut StdRng::seed_from_u64(1));

        assert_eq!(plan.byes(), vec![1, 3]);
        assert_eq!(plan.regular_matches(), vec![&[2, 4][..]]);
    }

    #[test]
    fn test_random_bye_comes_from_band() {
        let standings = vec![standing(1, 1.0), standing(2, 1.0), standing(3, 1.0)];
        for seed in 0..20 {
            let plan = pair_next_round(&standings, &context(2, ByeSelection::Random), &mut StdRng::seed_from_u64(seed));
            let bye = plan.byes();
            assert_eq!(bye.len(), 1);
            assert!([1, 2, 3].contains(&bye[0]));
            assert_each_player_once(&plan, 3);
        }
    }

    #[test]
    fn test_rematch_is_swapped() {
        let standings = vec![standing(1, 1.0), standing(2, 1.0), standing(3, 1.0), standing(4, 1.0)];
        let mut ctx = context(2, ByeSelection::Worst);
        ctx.opponents = met(&[(1, 2)]);
        let plan = pair_next_round(&standings, &ctx, &mut StdRng::seed_from_u64(1));

        assert_eq!(plan.regular_matches(), vec![&[1, 3][..], &[2, 4][..]]);
    }

    #[test]
    fn test_rematch_kept_when_no_alternative() {
        let standings = vec![standing(1, 1.0), standing(2, 1.0), standing(3, 1.0), standing(4, 1.0)];
        let mut ctx = context(2, ByeSelection::Worst);
        ctx.opponents = met(&[(1, 2), (1, 3), (1, 4)]);
        let plan = pair_next_round(&standings, &ctx, &mut StdRng::seed_from_u64(1));

        assert_eq!(plan.regular_matches(), vec![&[1, 2][..], &[3, 4][..]]);
    }

    #[test]
    fn test_rematches_allowed_when_disabled() {
        let standings = vec![standing(1, 1.0), standing(2, 1.0), standing(3, 1.0), standing(4, 1.0)];
        let mut ctx = context(2, ByeSelection::Worst);
        ctx.avoid_rematches = false;
        ctx.opponents = met(&[(1, 2)]);
        let plan = pair_next_round(&standings, &ctx, &mut StdRng::seed_from_u64(1));

        assert_eq!(plan.regular_matches(), vec![&[1, 2][..], &[3, 4][..]]);
    }

    #[test]
    fn test_multiplayer_band_remainder() {
        // Band of 6 with groups of 4: one full group, trailing two -> one bye and one lone bye
        let standings: Vec<Standing> = (1..=6).map(|id| standing(id, 3.0)).collect();
        let plan = pair_next_round(&standings, &context(4, ByeSelection::Worst), &mut StdRng::seed_from_u64(1));

        assert_eq!(plan.regular_matches(), vec![&[1, 2, 3, 4][..]]);
        assert_eq!(plan.byes(), vec![6, 5]);
        assert_each_player_once(&plan, 6);
    }

    #[test]
    fn test_multiplayer_band_short_group_plays() {
        // Band of 7 with groups of 4: trailing three lose one to a bye and play as a pair
        let standings: Vec<Standing> = (1..=7).map(|id| standing(id, 0.0)).collect();
        let plan = pair_next_round(&standings, &context(4, ByeSelection::Worst), &mut StdRng::seed_from_u64(1));

        assert_eq!(plan.regular_matches(), vec![&[1, 2, 3, 4][..], &[5, 6][..]]);
        assert_eq!(plan.byes(), vec![7]);
    }

    #[test]
    fn test_select_bye_policies() {
        let candidates = [10, 20, 30];
        let had_bye: HashSet<PlayerId> = [30].into_iter().collect();
        let mut rng = StdRng::seed_from_u64(5);

        assert_eq!(select_bye(&candidates, ByeSelection::Worst, &had_bye, &mut rng), 2);
        assert_eq!(select_bye(&candidates, ByeSelection::RoundRobin, &had_bye, &mut rng), 1);
        assert!(select_bye(&candidates, ByeSelection::Random, &had_bye, &mut rng) < 3);
    }
}
