use anyhow::Result;
use chrono::NaiveDate;
use log::info;

use crate::config::settings::DefaultsSettings;
use crate::database::{NewPlayer, NewTournament, Player, Tournament};
use crate::domain::{CircuitId, PlayerId, TournamentConfig, TournamentId, TournamentStatus};
use crate::errors::EngineError;
use crate::store::Store;

/// Tournament and player administration: everything before pairing starts
pub struct TournamentService<S: Store> {
    store: S,
    defaults: DefaultsSettings,
}

impl<S: Store> TournamentService<S> {
    pub fn new(store: S, defaults: DefaultsSettings) -> Self {
        Self { store, defaults }
    }

    pub fn add_player(&self, player: &NewPlayer) -> Result<Player> {
        let created = self.store.create_player(player)?;
        info!("Added player {} ({})", created.name, created.id);
        Ok(created)
    }

    pub fn players(&self) -> Result<Vec<Player>> {
        self.store.list_players()
    }

    /// A standalone qualifier tournament in draft status
    pub fn create(
        &self,
        name: &str,
        date: NaiveDate,
        players_per_match: u32,
        number_of_rounds: Option<u32>,
    ) -> Result<Tournament> {
        self.create_tournament(&NewTournament {
            name: name.to_string(),
            date,
            players_per_match,
            number_of_rounds,
            circuit_id: None,
        })
    }

    /// Creates the tournament with a config seeded from the defaults. A
    /// tournament with a circuit is a circuit tournament, one without is a
    /// qualifier.
    pub fn create_tournament(&self, tournament: &NewTournament) -> Result<Tournament> {
        let players_per_match = tournament.players_per_match;
        if !(2..=4).contains(&players_per_match) {
            return Err(EngineError::InvalidPlayersPerMatch(players_per_match).into());
        }
        if let Some(circuit_id) = tournament.circuit_id {
            self.circuit(circuit_id)?;
        }

        let mut config = TournamentConfig::default_for(players_per_match);
        config.avoid_rematches = self.defaults.avoid_rematches;
        config.bye_selection = self.defaults.bye_selection;

        let created = self.store.create_tournament(tournament, &config)?;
        info!(
            "Created {} tournament {} ({})",
            created.tournament_type, created.name, created.id
        );
        Ok(created)
    }

    pub fn tournaments(&self) -> Result<Vec<Tournament>> {
        self.store.list_tournaments()
    }

    pub fn register(&self, tournament_id: TournamentId, player_id: PlayerId) -> Result<()> {
        self.tournament(tournament_id)?;
        if self.store.get_player(player_id)?.is_none() {
            return Err(EngineError::PlayerNotFound(player_id).into());
        }
        self.store.register_player(tournament_id, player_id)
    }

    /// Removes a registration while the tournament is still a draft.
    /// Returns whether the player was registered.
    pub fn unregister(&self, tournament_id: TournamentId, player_id: PlayerId) -> Result<bool> {
        let tournament = self.tournament(tournament_id)?;
        if tournament.status != TournamentStatus::Draft || !self.store.list_rounds(tournament_id)?.is_empty() {
            return Err(EngineError::RegistrationClosed(tournament_id).into());
        }

        let removed = self.store.unregister_player(tournament_id, player_id)?;
        if removed {
            info!("Removed player {} from tournament {}", player_id, tournament_id);
        }
        Ok(removed)
    }

    pub fn registered_players(&self, tournament_id: TournamentId) -> Result<Vec<Player>> {
        self.store.list_tournament_players(tournament_id)
    }

    /// Stored config, or the defaults for the tournament's match size
    pub fn config(&self, tournament_id: TournamentId) -> Result<TournamentConfig> {
        let tournament = self.tournament(tournament_id)?;
        Ok(self
            .store
            .get_config(tournament_id)?
            .unwrap_or_else(|| TournamentConfig::default_for(tournament.players_per_match)))
    }

    pub fn configure(&self, tournament_id: TournamentId, config: &TournamentConfig) -> Result<()> {
        self.tournament(tournament_id)?;
        self.store.save_config(tournament_id, config)
    }

    fn circuit(&self, circuit_id: CircuitId) -> Result<()> {
        match self.store.get_circuit(circuit_id)? {
            Some(_) => Ok(()),
            None => Err(EngineError::CircuitNotFound(circuit_id).into()),
        }
    }

    fn tournament(&self, tournament_id: TournamentId) -> Result<Tournament> {
        self.store
            .get_tournament(tournament_id)?
            .ok_or_else(|| EngineError::TournamentNotFound(tournament_id).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::NewCircuit;
    use crate::engine::RoundPlan;
    use crate::errors::engine_error;
    use crate::store::{NewRound, SqliteStore};

    fn service() -> TournamentService<SqliteStore> {
        TournamentService::new(SqliteStore::in_memory().unwrap(), DefaultsSettings::default())
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
    }

    #[test]
    fn test_create_tournament_in_circuit() {
        let service = service();
        let circuit = service
            .store
            .create_circuit(&NewCircuit { name: "Spring".to_string(), ..Default::default() })
            .unwrap();

        let tournament = service
            .create_tournament(&NewTournament {
                name: "Leg 1".to_string(),
                date: date(),
                players_per_match: 2,
                number_of_rounds: None,
                circuit_id: Some(circuit.id),
            })
            .unwrap();
        assert_eq!(tournament.tournament_type, crate::domain::TournamentType::Circuit);
        assert_eq!(tournament.circuit_id, Some(circuit.id));

        let qualifier = service.create("Open", date(), 2, None).unwrap();
        assert_eq!(qualifier.tournament_type, crate::domain::TournamentType::Qualifier);
        assert_eq!(qualifier.circuit_id, None);
    }

    #[test]
    fn test_create_tournament_with_unknown_circuit() {
        let err = service()
            .create_tournament(&NewTournament {
                name: "Leg 1".to_string(),
                date: date(),
                players_per_match: 2,
                number_of_rounds: None,
                circuit_id: Some(42),
            })
            .unwrap_err();
        assert_eq!(engine_error(&err), Some(&EngineError::CircuitNotFound(42)));
    }

    #[test]
    fn test_register_unknown_player() {
        let service = service();
        let tournament = service.create("Open", date(), 2, None).unwrap();

        let err = service.register(tournament.id, 5).unwrap_err();
        assert_eq!(engine_error(&err), Some(&EngineError::PlayerNotFound(5)));
    }

    #[test]
    fn test_unregister_only_before_pairing() {
        let service = service();
        let tournament = service.create("Open", date(), 2, None).unwrap();
        let players: Vec<Player> = ["Ann", "Bob", "Cid"]
            .iter()
            .map(|name| service.add_player(&NewPlayer::named(name)).unwrap())
            .collect();
        for player in &players {
            service.register(tournament.id, player.id).unwrap();
        }

        assert!(service.unregister(tournament.id, players[2].id).unwrap());
        assert!(!service.unregister(tournament.id, players[2].id).unwrap());
        assert_eq!(service.registered_players(tournament.id).unwrap().len(), 2);

        let mut plan = RoundPlan::default();
        plan.push_match(vec![players[0].id, players[1].id]);
        service
            .store
            .create_round(&NewRound {
                tournament_id: tournament.id,
                round_number: 1,
                status: crate::domain::RoundStatus::Pending,
                plan: &plan,
                bye_points: 1.0,
                tournament_status: Some(TournamentStatus::InProgress),
            })
            .unwrap();

        let err = service.unregister(tournament.id, players[0].id).unwrap_err();
        assert_eq!(engine_error(&err), Some(&EngineError::RegistrationClosed(tournament.id)));
        assert_eq!(service.registered_players(tournament.id).unwrap().len(), 2);
    }
}
