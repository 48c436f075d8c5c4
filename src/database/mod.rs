pub mod byes;
pub mod circuits;
pub mod connection;
pub mod head_to_head;
pub mod matches;
pub mod models;
pub mod players;
pub mod rounds;
pub mod setup;
pub mod tournaments;

pub use connection::{create_memory_pool, create_pool, get_connection, DbConn, DbPool};
pub use models::*;
