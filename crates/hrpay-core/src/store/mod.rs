//! Relational store backed by SQLite.
//!
//! A [`Database`] owns one connection for the lifetime of an invocation.
//! Queries are free functions over `&Connection` so they run unchanged on
//! the connection itself or inside a `Transaction`.

mod queries;
mod schema;

pub use queries::*;
pub use schema::{create_schema, seed_if_empty, SEED_EMPLOYEES};

use std::path::Path;

use rusqlite::{Connection, Transaction};
use tracing::debug;

use crate::error::PersistenceError;

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, PersistenceError>;

/// Wrapper around the single SQLite connection.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the database file at `path`.
    pub fn open(path: &Path) -> StoreResult<Self> {
        debug!("Opening database {}", path.display());
        let conn = Connection::open(path)?;
        Self::configure(conn)
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::configure(Connection::open_in_memory()?)
    }

    fn configure(conn: Connection) -> StoreResult<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(Self { conn })
    }

    /// Create any missing tables.
    pub fn init(&self) -> StoreResult<()> {
        create_schema(&self.conn)
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Begin a transaction; dropping it without commit rolls back.
    pub fn transaction(&mut self) -> StoreResult<Transaction<'_>> {
        Ok(self.conn.transaction()?)
    }
}
