pub mod connection;
pub mod models;
pub mod ratings;
pub mod setup;
pub mod stores;

pub use connection::{create_memory_pool, create_pool, get_connection, DbConn, DbPool};
pub use models::*;
pub use ratings::SqliteRatingStore;
pub use stores::SqliteStoreCatalog;
