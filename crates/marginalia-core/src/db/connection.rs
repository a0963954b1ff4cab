//! Database connection management

use std::path::Path;

use rusqlite::Connection;

use crate::error::Result;

use super::schema;

/// Database wrapper for `SQLite` connections
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open an existing annotation database for reading.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.configure()?;
        Ok(db)
    }

    /// Create a fresh annotation database at the given path with the full
    /// schema. Used when exporting a merged snapshot.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.configure()?;
        schema::create_tables(&db.conn)?;
        Ok(db)
    }

    /// Open an in-memory database with the full schema (useful for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.configure()?;
        schema::create_tables(&db.conn)?;
        Ok(db)
    }

    /// Configure `SQLite` before use
    fn configure(&self) -> Result<()> {
        self.conn.execute_batch(
            "
            PRAGMA foreign_keys = ON;
            PRAGMA cache_size = 10000;
            ",
        )?;
        Ok(())
    }

    /// Get a reference to the underlying connection
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}
