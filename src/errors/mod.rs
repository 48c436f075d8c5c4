use thiserror::Error;

use crate::domain::{CircuitId, MatchId, PlayerId, TournamentId};

/// Precondition violations. Raised before anything is written; the caller
/// shows the message and does not retry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Tournament {0} not found")]
    TournamentNotFound(TournamentId),

    #[error("Match {0} not found")]
    MatchNotFound(MatchId),

    #[error("Player {0} not found")]
    PlayerNotFound(PlayerId),

    #[error("Circuit {0} not found")]
    CircuitNotFound(CircuitId),

    #[error("At least 2 players are needed to generate a round, {found} registered")]
    NotEnoughPlayers { found: usize },

    #[error("Tournament {0} already has a first round")]
    FirstRoundExists(TournamentId),

    #[error("Tournament {0} has no rounds yet; generate the first round")]
    NoRounds(TournamentId),

    #[error("Round {round_number} must be completed before the next one is generated")]
    PreviousRoundIncomplete { round_number: u32 },

    #[error("Round {round_number} cannot follow {existing} existing rounds; another round was generated first")]
    RoundOutOfSequence { round_number: u32, existing: u32 },

    #[error("Players of tournament {0} can only be removed before the first round")]
    RegistrationClosed(TournamentId),

    #[error("Maximum number of rounds reached ({limit})")]
    RoundLimitReached { limit: u32 },

    #[error("Players per match must be between 2 and 4, got {0}")]
    InvalidPlayersPerMatch(u32),

    #[error("Invalid results: {0}")]
    InvalidResults(String),

    #[error("Cannot compare player {0} with themselves")]
    SamePlayer(PlayerId),

    #[error("Circuit ends ({end}) before it starts ({start})")]
    InvalidCircuitDates { start: chrono::NaiveDate, end: chrono::NaiveDate },
}

/// Context string for store failures
pub fn store_context(operation: &str, id: i64) -> String {
    format!("Failed to {} (id {})", operation, id)
}

/// Finds an `EngineError` wrapped in an `anyhow::Error`
pub fn engine_error(err: &anyhow::Error) -> Option<&EngineError> {
    err.downcast_ref::<EngineError>()
}
