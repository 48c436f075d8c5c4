use std::collections::HashSet;

use anyhow::{Context, Result};
use log::{debug, info};
use rand::Rng;

use crate::database::{Match, MatchResult, Round, Tournament};
use crate::domain::{
    calculate_number_of_rounds, MatchId, PlayerId, RoundStatus, TournamentConfig, TournamentId,
    TournamentStatus,
};
use crate::engine::{
    calculate_standings, pair_first_round, pair_next_round, resolve_positions, Contestant,
    PairingContext, RoundPlan, ScoreEntry, Standing,
};
use crate::errors::{store_context, EngineError};
use crate::store::{load_history, MatchResults, NewRound, Store};

/// Raw scores for one match as entered by a human
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSubmission {
    pub match_id: MatchId,
    pub scores: Vec<ScoreEntry>,
    pub first_player_id: Option<PlayerId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchOverview {
    pub game: Match,
    pub player_ids: Vec<PlayerId>,
    pub results: Vec<MatchResult>,
}

impl MatchOverview {
    pub fn is_bye(&self) -> bool {
        self.player_ids.len() == 1
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoundOverview {
    pub round: Round,
    pub matches: Vec<MatchOverview>,
}

/// Generates rounds, records results and ranks players of a tournament
pub struct RoundService<S: Store> {
    store: S,
}

impl<S: Store> RoundService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// First round if the tournament has none, otherwise the next one
    pub fn generate_round<R: Rng + ?Sized>(&self, tournament_id: TournamentId, rng: &mut R) -> Result<Round> {
        let tournament = self.tournament(tournament_id)?;
        if self.store.list_rounds(tournament_id)?.is_empty() {
            self.first_round(&tournament, rng)
        } else {
            self.next_round(&tournament, rng)
        }
    }

    pub fn generate_first_round<R: Rng + ?Sized>(&self, tournament_id: TournamentId, rng: &mut R) -> Result<Round> {
        let tournament = self.tournament(tournament_id)?;
        self.first_round(&tournament, rng)
    }

    pub fn generate_next_round<R: Rng + ?Sized>(&self, tournament_id: TournamentId, rng: &mut R) -> Result<Round> {
        let tournament = self.tournament(tournament_id)?;
        self.next_round(&tournament, rng)
    }

    fn first_round<R: Rng + ?Sized>(&self, tournament: &Tournament, rng: &mut R) -> Result<Round> {
        let players_per_match = validated_match_size(tournament)?;
        if !self.store.list_rounds(tournament.id)?.is_empty() {
            return Err(EngineError::FirstRoundExists(tournament.id).into());
        }

        let player_ids: Vec<PlayerId> = self
            .store
            .list_tournament_players(tournament.id)?
            .into_iter()
            .map(|p| p.id)
            .collect();
        if player_ids.len() < 2 {
            return Err(EngineError::NotEnoughPlayers { found: player_ids.len() }.into());
        }

        let plan = pair_first_round(&player_ids, players_per_match, rng);
        self.persist_round(tournament, 1, &plan)
    }

    fn next_round<R: Rng + ?Sized>(&self, tournament: &Tournament, rng: &mut R) -> Result<Round> {
        let players_per_match = validated_match_size(tournament)?;
        let rounds = self
            .store
            .list_rounds(tournament.id)
            .with_context(|| store_context("list rounds", tournament.id))?;
        let last = rounds.last().ok_or(EngineError::NoRounds(tournament.id))?;

        let contestants = self.contestants(tournament.id)?;
        let limit = round_limit(tournament, contestants.len());
        if rounds.len() as u32 >= limit {
            return Err(EngineError::RoundLimitReached { limit }.into());
        }
        if last.status != RoundStatus::Completed {
            return Err(EngineError::PreviousRoundIncomplete { round_number: last.round_number }.into());
        }
        if contestants.len() < 2 {
            return Err(EngineError::NotEnoughPlayers { found: contestants.len() }.into());
        }

        let config = self.config_for(tournament)?;
        let history = load_history(&self.store, tournament.id)?;
        let standings = calculate_standings(&contestants, &history, &config.enabled_criteria());

        let had_bye: HashSet<PlayerId> = self
            .store
            .list_byes(tournament.id)?
            .into_iter()
            .map(|bye| bye.player_id)
            .collect();
        let context = PairingContext {
            players_per_match,
            avoid_rematches: config.avoid_rematches,
            bye_selection: config.bye_selection,
            opponents: history.opponents(),
            had_bye,
        };

        let plan = pair_next_round(&standings, &context, rng);
        self.persist_round(tournament, last.round_number + 1, &plan)
    }

    fn persist_round(&self, tournament: &Tournament, round_number: u32, plan: &RoundPlan) -> Result<Round> {
        let config = self.config_for(tournament)?;
        let status = if plan.regular_matches().is_empty() {
            RoundStatus::Completed
        } else {
            RoundStatus::Pending
        };
        let tournament_status = if status == RoundStatus::Completed && self.is_final_round(tournament, round_number)? {
            Some(TournamentStatus::Completed)
        } else {
            (round_number == 1).then_some(TournamentStatus::InProgress)
        };

        let round = self.store.create_round(&NewRound {
            tournament_id: tournament.id,
            round_number,
            status,
            plan,
            bye_points: config.scoring_system.points_for(1),
            tournament_status,
        })?;

        info!(
            "Generated round {} of tournament {} ({} matches, {} byes)",
            round.round_number,
            tournament.id,
            plan.regular_matches().len(),
            plan.byes().len()
        );
        if tournament_status == Some(TournamentStatus::Completed) {
            info!("Tournament {} completed after round {}", tournament.id, round_number);
        }
        Ok(round)
    }

    /// Validates the scores against the match roster, assigns positions and
    /// tournament points, and replaces whatever results the match had.
    pub fn submit_results(&self, submission: &ResultSubmission) -> Result<Vec<MatchResult>> {
        let game = self
            .store
            .get_match(submission.match_id)?
            .ok_or(EngineError::MatchNotFound(submission.match_id))?;
        let round = self
            .store
            .get_round(game.round_id)?
            .with_context(|| store_context("load round", game.round_id))?;
        let tournament = self.tournament(round.tournament_id)?;

        let roster = self.store.list_match_players(game.id)?;
        validate_submission(&roster, submission)?;

        let config = self.config_for(&tournament)?;
        let results: Vec<MatchResult> = resolve_positions(&submission.scores, submission.first_player_id)
            .into_iter()
            .map(|entry| MatchResult {
                match_id: game.id,
                player_id: entry.player_id,
                position: entry.position,
                points: entry.points,
                tournament_points: config.scoring_system.points_for(entry.position),
            })
            .collect();

        let final_round = self.is_final_round(&tournament, round.round_number)?;
        let round_status = self.store.replace_match_results(&MatchResults {
            match_id: game.id,
            results: &results,
            first_player_id: submission.first_player_id,
            tournament_status_on_round_completion: final_round.then_some(TournamentStatus::Completed),
        })?;
        info!("Recorded results for match {} of round {}", game.match_number, round.round_number);

        if round_status == RoundStatus::Completed && round.status != RoundStatus::Completed {
            debug!("Round {} completed", round.round_number);
            if final_round {
                info!("Tournament {} completed after round {}", tournament.id, round.round_number);
            }
        }
        Ok(results)
    }

    fn is_final_round(&self, tournament: &Tournament, round_number: u32) -> Result<bool> {
        let registered = self.store.list_tournament_players(tournament.id)?.len();
        Ok(round_number >= round_limit(tournament, registered))
    }

    /// Current ranking of every registered player
    pub fn standings(&self, tournament_id: TournamentId) -> Result<Vec<Standing>> {
        let tournament = self.tournament(tournament_id)?;
        let config = self.config_for(&tournament)?;
        let contestants = self.contestants(tournament_id)?;
        let history = load_history(&self.store, tournament_id)?;

        Ok(calculate_standings(&contestants, &history, &config.enabled_criteria()))
    }

    pub fn rounds(&self, tournament_id: TournamentId) -> Result<Vec<RoundOverview>> {
        self.tournament(tournament_id)?;

        self.store
            .list_rounds(tournament_id)?
            .into_iter()
            .map(|round| -> Result<RoundOverview> {
                let matches = self
                    .store
                    .list_round_matches(round.id)?
                    .into_iter()
                    .map(|game| -> Result<MatchOverview> {
                        Ok(MatchOverview {
                            player_ids: self.store.list_match_players(game.id)?,
                            results: self.store.list_match_results(game.id)?,
                            game,
                        })
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(RoundOverview { round, matches })
            })
            .collect()
    }

    fn tournament(&self, tournament_id: TournamentId) -> Result<Tournament> {
        self.store
            .get_tournament(tournament_id)?
            .ok_or_else(|| EngineError::TournamentNotFound(tournament_id).into())
    }

    fn config_for(&self, tournament: &Tournament) -> Result<TournamentConfig> {
        Ok(self
            .store
            .get_config(tournament.id)?
            .unwrap_or_else(|| TournamentConfig::default_for(tournament.players_per_match)))
    }

    fn contestants(&self, tournament_id: TournamentId) -> Result<Vec<Contestant>> {
        Ok(self
            .store
            .list_tournament_players(tournament_id)?
            .into_iter()
            .map(|p| Contestant::new(p.id, p.name))
            .collect())
    }
}

fn validated_match_size(tournament: &Tournament) -> Result<usize, EngineError> {
    match tournament.players_per_match {
        n @ 2..=4 => Ok(n as usize),
        n => Err(EngineError::InvalidPlayersPerMatch(n)),
    }
}

/// Configured round count, or the one computed from the registered players
pub fn round_limit(tournament: &Tournament, registered_players: usize) -> u32 {
    tournament
        .number_of_rounds
        .unwrap_or_else(|| calculate_number_of_rounds(registered_players))
}

fn validate_submission(roster: &[PlayerId], submission: &ResultSubmission) -> Result<(), EngineError> {
    let invalid = |msg: String| Err(EngineError::InvalidResults(msg));

    if roster.len() < 2 {
        return invalid(format!("match {} is a bye and takes no results", submission.match_id));
    }

    let mut seen = HashSet::new();
    for entry in &submission.scores {
        if !roster.contains(&entry.player_id) {
            return invalid(format!("player {} is not in match {}", entry.player_id, submission.match_id));
        }
        if !seen.insert(entry.player_id) {
            return invalid(format!("player {} has more than one score", entry.player_id));
        }
    }
    if seen.len() != roster.len() {
        return invalid(format!(
            "expected scores for {} players, got {}",
            roster.len(),
            seen.len()
        ));
    }

    match submission.first_player_id {
        Some(first) if !roster.contains(&first) => {
            invalid(format!("starting player {first} is not in match {}", submission.match_id))
        }
        _ => Ok(()),
    }
}
