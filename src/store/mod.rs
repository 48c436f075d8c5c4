use anyhow::{Context, Result};

use crate::database::{
    Circuit, CircuitStandingRow, HeadToHeadMatchRow, Match, MatchResult, NewCircuit, NewPlayer,
    NewTournament, Player, PlayerBye, Round, Tournament,
};
use crate::domain::{
    CircuitId, MatchId, PlayerId, RoundId, RoundStatus, TournamentConfig, TournamentId,
    TournamentStatus,
};
use crate::engine::{MatchRecord, ResultEntry, RoundPlan, TournamentHistory};
use crate::errors::store_context;

mod sqlite;

pub use sqlite::SqliteStore;

/// A round as decided by the pairing engine, ready to be written in one batch
#[derive(Debug, Clone)]
pub struct NewRound<'a> {
    pub tournament_id: TournamentId,
    pub round_number: u32,
    pub status: RoundStatus,
    pub plan: &'a RoundPlan,
    /// Tournament points credited for a bye
    pub bye_points: f64,
    /// Tournament status to set in the same batch, if any
    pub tournament_status: Option<TournamentStatus>,
}

/// Validated results of one match. Writing them also settles the round's
/// status: `completed` once no match of the round is pending, `in_progress`
/// otherwise.
#[derive(Debug, Clone)]
pub struct MatchResults<'a> {
    pub match_id: MatchId,
    pub results: &'a [MatchResult],
    pub first_player_id: Option<PlayerId>,
    /// Tournament status to set in the same batch if these results complete the round
    pub tournament_status_on_round_completion: Option<TournamentStatus>,
}

/// Persistence the engine depends on.
///
/// `create_round` and `replace_match_results` must be atomic: readers never
/// observe half a round or half a match's results.
pub trait Store {
    fn create_player(&self, player: &NewPlayer) -> Result<Player>;
    fn get_player(&self, id: PlayerId) -> Result<Option<Player>>;
    fn list_players(&self) -> Result<Vec<Player>>;

    fn create_circuit(&self, circuit: &NewCircuit) -> Result<Circuit>;
    fn get_circuit(&self, id: CircuitId) -> Result<Option<Circuit>>;
    fn list_circuits(&self) -> Result<Vec<Circuit>>;
    fn list_circuit_tournaments(&self, circuit_id: CircuitId) -> Result<Vec<Tournament>>;
    fn circuit_standings(&self, circuit_id: CircuitId) -> Result<Vec<CircuitStandingRow>>;

    fn create_tournament(&self, tournament: &NewTournament, config: &TournamentConfig) -> Result<Tournament>;
    fn get_tournament(&self, id: TournamentId) -> Result<Option<Tournament>>;
    fn list_tournaments(&self) -> Result<Vec<Tournament>>;
    /// Tournaments the player is registered for, oldest first
    fn list_player_tournaments(&self, player_id: PlayerId) -> Result<Vec<Tournament>>;
    fn set_tournament_status(&self, id: TournamentId, status: TournamentStatus) -> Result<()>;
    fn get_config(&self, tournament_id: TournamentId) -> Result<Option<TournamentConfig>>;
    fn save_config(&self, tournament_id: TournamentId, config: &TournamentConfig) -> Result<()>;

    fn register_player(&self, tournament_id: TournamentId, player_id: PlayerId) -> Result<()>;
    fn unregister_player(&self, tournament_id: TournamentId, player_id: PlayerId) -> Result<bool>;
    /// Registered players in registration order
    fn list_tournament_players(&self, tournament_id: TournamentId) -> Result<Vec<Player>>;

    /// Rounds ordered by round number
    fn list_rounds(&self, tournament_id: TournamentId) -> Result<Vec<Round>>;
    fn get_round(&self, id: RoundId) -> Result<Option<Round>>;
    fn list_round_matches(&self, round_id: RoundId) -> Result<Vec<Match>>;
    fn get_match(&self, id: MatchId) -> Result<Option<Match>>;
    fn list_match_players(&self, match_id: MatchId) -> Result<Vec<PlayerId>>;
    fn list_match_results(&self, match_id: MatchId) -> Result<Vec<MatchResult>>;
    fn list_byes(&self, tournament_id: TournamentId) -> Result<Vec<PlayerBye>>;

    fn create_round(&self, round: &NewRound<'_>) -> Result<Round>;
    /// Deletes every result of the match, inserts the new ones, marks the
    /// match completed and returns the round's resulting status
    fn replace_match_results(&self, results: &MatchResults<'_>) -> Result<RoundStatus>;

    fn list_head_to_head(&self, player1_id: PlayerId, player2_id: PlayerId) -> Result<Vec<HeadToHeadMatchRow>>;
}

/// Reads every played match of a tournament into a history snapshot
pub fn load_history<S: Store + ?Sized>(store: &S, tournament_id: TournamentId) -> Result<TournamentHistory> {
    let mut records = Vec::new();

    for round in store
        .list_rounds(tournament_id)
        .with_context(|| store_context("list rounds", tournament_id))?
    {
        for game in store.list_round_matches(round.id)? {
            let results = store
                .list_match_results(game.id)
                .with_context(|| store_context("list match results", game.id))?;
            if results.is_empty() {
                continue;
            }

            records.push(MatchRecord {
                match_id: game.id,
                round_number: round.round_number,
                results: results
                    .into_iter()
                    .map(|r| ResultEntry {
                        player_id: r.player_id,
                        position: r.position,
                        points: r.points,
                        tournament_points: r.tournament_points,
                    })
                    .collect(),
            });
        }
    }

    Ok(TournamentHistory::new(records))
}
