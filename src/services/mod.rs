pub mod circuits;
pub mod head_to_head;
pub mod player_stats;
pub mod rounds;
pub mod server;
pub mod tournaments;
