use anyhow::{Context, Result};
use log::debug;
use rusqlite::{params, TransactionBehavior};

use super::{MatchResults, NewRound, Store};
use crate::database::{
    self, byes, circuits, head_to_head, matches, players, rounds, tournaments, Circuit,
    CircuitStandingRow, DbConn, DbPool, HeadToHeadMatchRow, Match, MatchResult, NewCircuit,
    NewPlayer, NewTournament, Player, PlayerBye, Round, Tournament,
};
use crate::domain::{
    CircuitId, MatchId, MatchStatus, PlayerId, RoundId, RoundStatus, TournamentConfig,
    TournamentId, TournamentStatus,
};
use crate::engine::PlannedMatch;
use crate::errors::EngineError;

/// `Store` backed by a pooled SQLite database
#[derive(Clone)]
pub struct SqliteStore {
    pool: DbPool,
}

impl SqliteStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Opens (creating if needed) the database file and applies the schema
    pub fn open(database_path: &str) -> Result<Self> {
        let pool = database::create_pool(database_path)?;
        Self::initialized(pool)
    }

    pub fn in_memory() -> Result<Self> {
        let pool = database::create_memory_pool()?;
        Self::initialized(pool)
    }

    fn initialized(pool: DbPool) -> Result<Self> {
        let mut conn = database::get_connection(&pool)?;
        database::setup::init_database(&mut conn)?;
        drop(conn);
        Ok(Self::new(pool))
    }

    fn conn(&self) -> Result<DbConn> {
        database::get_connection(&self.pool)
    }
}

impl Store for SqliteStore {
    fn create_player(&self, player: &NewPlayer) -> Result<Player> {
        players::insert_player(&*self.conn()?, player)
    }

    fn get_player(&self, id: PlayerId) -> Result<Option<Player>> {
        players::find_by_id(&*self.conn()?, id)
    }

    fn list_players(&self) -> Result<Vec<Player>> {
        players::list_all(&*self.conn()?)
    }

    fn create_circuit(&self, circuit: &NewCircuit) -> Result<Circuit> {
        circuits::insert_circuit(&*self.conn()?, circuit)
    }

    fn get_circuit(&self, id: CircuitId) -> Result<Option<Circuit>> {
        circuits::find_by_id(&*self.conn()?, id)
    }

    fn list_circuits(&self) -> Result<Vec<Circuit>> {
        circuits::list_all(&*self.conn()?)
    }

    fn list_circuit_tournaments(&self, circuit_id: CircuitId) -> Result<Vec<Tournament>> {
        tournaments::list_by_circuit(&*self.conn()?, circuit_id)
    }

    fn circuit_standings(&self, circuit_id: CircuitId) -> Result<Vec<CircuitStandingRow>> {
        circuits::standings(&*self.conn()?, circuit_id)
    }

    fn create_tournament(&self, tournament: &NewTournament, config: &TournamentConfig) -> Result<Tournament> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let created = tournaments::insert_tournament(&tx, tournament)?;
        tournaments::save_config(&tx, created.id, config)?;
        tx.commit().context("Failed to commit new tournament")?;
        Ok(created)
    }

    fn get_tournament(&self, id: TournamentId) -> Result<Option<Tournament>> {
        tournaments::find_by_id(&*self.conn()?, id)
    }

    fn list_tournaments(&self) -> Result<Vec<Tournament>> {
        tournaments::list_all(&*self.conn()?)
    }

    fn list_player_tournaments(&self, player_id: PlayerId) -> Result<Vec<Tournament>> {
        tournaments::list_by_player(&*self.conn()?, player_id)
    }

    fn set_tournament_status(&self, id: TournamentId, status: TournamentStatus) -> Result<()> {
        tournaments::update_status(&*self.conn()?, id, status)
    }

    fn get_config(&self, tournament_id: TournamentId) -> Result<Option<TournamentConfig>> {
        tournaments::find_config(&*self.conn()?, tournament_id)
    }

    fn save_config(&self, tournament_id: TournamentId, config: &TournamentConfig) -> Result<()> {
        tournaments::save_config(&*self.conn()?, tournament_id, config)
    }

    fn register_player(&self, tournament_id: TournamentId, player_id: PlayerId) -> Result<()> {
        players::register(&*self.conn()?, tournament_id, player_id)
    }

    fn unregister_player(&self, tournament_id: TournamentId, player_id: PlayerId) -> Result<bool> {
        players::unregister(&*self.conn()?, tournament_id, player_id)
    }

    fn list_tournament_players(&self, tournament_id: TournamentId) -> Result<Vec<Player>> {
        players::list_by_tournament(&*self.conn()?, tournament_id)
    }

    fn list_rounds(&self, tournament_id: TournamentId) -> Result<Vec<Round>> {
        rounds::list_by_tournament(&*self.conn()?, tournament_id)
    }

    fn get_round(&self, id: RoundId) -> Result<Option<Round>> {
        rounds::find_by_id(&*self.conn()?, id)
    }

    fn list_round_matches(&self, round_id: RoundId) -> Result<Vec<Match>> {
        matches::list_by_round(&*self.conn()?, round_id)
    }

    fn get_match(&self, id: MatchId) -> Result<Option<Match>> {
        matches::find_by_id(&*self.conn()?, id)
    }

    fn list_match_players(&self, match_id: MatchId) -> Result<Vec<PlayerId>> {
        matches::list_players(&*self.conn()?, match_id)
    }

    fn list_match_results(&self, match_id: MatchId) -> Result<Vec<MatchResult>> {
        matches::list_results(&*self.conn()?, match_id)
    }

    fn list_byes(&self, tournament_id: TournamentId) -> Result<Vec<PlayerBye>> {
        byes::list_by_tournament(&*self.conn()?, tournament_id)
    }

    fn create_round(&self, round: &NewRound<'_>) -> Result<Round> {
        let mut conn = self.conn()?;
        // IMMEDIATE takes the write lock up front so two writers cannot both see round N-1 as last
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let existing: u32 = tx.query_row(
            "SELECT COUNT(*) FROM rounds WHERE tournament_id = ?1",
            params![round.tournament_id],
            |row| row.get(0),
        )?;
        if existing + 1 != round.round_number {
            return Err(EngineError::RoundOutOfSequence {
                round_number: round.round_number,
                existing,
            }
            .into());
        }

        let created = rounds::insert_round(&tx, round.tournament_id, round.round_number, round.status)?;

        for (idx, planned) in round.plan.matches.iter().enumerate() {
            let match_number = idx as u32 + 1;
            match planned {
                PlannedMatch::Regular(player_ids) => {
                    let game = matches::insert_match(&tx, created.id, match_number, MatchStatus::Pending)?;
                    matches::set_players(&tx, game.id, player_ids)?;
                }
                PlannedMatch::Bye(player_id) => {
                    let game = matches::insert_match(&tx, created.id, match_number, MatchStatus::Completed)?;
                    matches::set_players(&tx, game.id, &[*player_id])?;
                    matches::insert_result(
                        &tx,
                        &MatchResult {
                            match_id: game.id,
                            player_id: *player_id,
                            position: 1,
                            points: 0,
                            tournament_points: round.bye_points,
                        },
                    )?;
                    byes::insert_bye(&tx, round.tournament_id, *player_id, round.round_number)?;
                }
            }
        }

        if round.status != RoundStatus::Pending {
            rounds::update_status(&tx, created.id, round.status)?;
        }
        if let Some(status) = round.tournament_status {
            tournaments::update_status(&tx, round.tournament_id, status)?;
        }

        tx.commit().context("Failed to commit new round")?;
        rounds::find_by_id(&*conn, created.id)?
            .with_context(|| format!("Round {} vanished after commit", created.id))
    }

    fn replace_match_results(&self, batch: &MatchResults<'_>) -> Result<RoundStatus> {
        let mut conn = self.conn()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let game = matches::find_by_id(&tx, batch.match_id)?
            .ok_or(EngineError::MatchNotFound(batch.match_id))?;
        matches::delete_results(&tx, game.id)?;
        for result in batch.results {
            matches::insert_result(&tx, result)?;
        }
        matches::mark_completed(&tx, game.id, batch.first_player_id)?;

        let round_status = rounds::settle_status(&tx, game.round_id)?;
        if round_status == RoundStatus::Completed {
            if let Some(status) = batch.tournament_status_on_round_completion {
                let round = rounds::find_by_id(&tx, game.round_id)?
                    .with_context(|| format!("Round {} of match {} not found", game.round_id, game.id))?;
                tournaments::update_status(&tx, round.tournament_id, status)?;
            }
        }

        tx.commit().context("Failed to commit match results")?;
        debug!("Match {} stored, round {} is {}", game.id, game.round_id, round_status);
        Ok(round_status)
    }

    fn list_head_to_head(&self, player1_id: PlayerId, player2_id: PlayerId) -> Result<Vec<HeadToHeadMatchRow>> {
        head_to_head::list_shared_matches(&*self.conn()?, player1_id, player2_id)
    }
}
