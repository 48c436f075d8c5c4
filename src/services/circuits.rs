use anyhow::Result;
use log::info;

use crate::database::{Circuit, CircuitStandingRow, NewCircuit, Tournament};
use crate::domain::CircuitId;
use crate::errors::EngineError;
use crate::store::Store;

/// A circuit with its tournaments and the cumulative ranking over the completed ones
#[derive(Debug, Clone)]
pub struct CircuitOverview {
    pub circuit: Circuit,
    pub tournaments: Vec<Tournament>,
    pub standings: Vec<CircuitStandingRow>,
}

/// Series of tournaments ranked together
pub struct CircuitService<S: Store> {
    store: S,
}

impl<S: Store> CircuitService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn create(&self, circuit: &NewCircuit) -> Result<Circuit> {
        if let (Some(start), Some(end)) = (circuit.start_date, circuit.end_date) {
            if end < start {
                return Err(EngineError::InvalidCircuitDates { start, end }.into());
            }
        }

        let created = self.store.create_circuit(circuit)?;
        info!("Created circuit {} ({})", created.name, created.id);
        Ok(created)
    }

    pub fn circuits(&self) -> Result<Vec<Circuit>> {
        self.store.list_circuits()
    }

    /// Only completed tournaments contribute to the standings
    pub fn overview(&self, circuit_id: CircuitId) -> Result<CircuitOverview> {
        let circuit = self
            .store
            .get_circuit(circuit_id)?
            .ok_or(EngineError::CircuitNotFound(circuit_id))?;
        let tournaments = self.store.list_circuit_tournaments(circuit_id)?;
        let standings = self.store.circuit_standings(circuit_id)?;

        Ok(CircuitOverview { circuit, tournaments, standings })
    }
}
