//! SQLite database layer.

mod connection;
mod repository;
mod schema;

pub use connection::Database;
pub use repository::SnapshotRepository;
pub use schema::create_tables;
