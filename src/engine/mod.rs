pub mod history;
pub mod pairing;
pub mod positions;
pub mod standings;
pub mod tiebreak;
pub mod types;

pub use history::{OpponentHistory, TournamentHistory};
pub use pairing::{pair_first_round, pair_next_round, PairingContext};
pub use positions::resolve_positions;
pub use standings::calculate_standings;
pub use types::{
    Contestant, MatchRecord, PlannedMatch, PositionedEntry, ResultEntry, RoundPlan, ScoreEntry,
    Standing,
};
