// src/db/mod.rs

//! SQLite storage layer for RecipeDB
//!
//! Opening a store either initializes a fresh database with the full
//! schema or verifies that an existing one carries the expected schema
//! stamp. An out-of-date store is refused outright; there is no automatic
//! upgrade path.

pub mod models;
pub mod paths;
pub mod schema;

use crate::error::Result;
use rusqlite::{Connection, Transaction};
use std::path::Path;
use tracing::{debug, info};

/// Open (or create) the database at `db_path`
///
/// A missing database file is created and initialized with the current
/// schema. An existing file is checked against [`schema::SCHEMA_VERSION`]
/// and rejected with `SchemaOutOfDate` on mismatch, before any other
/// statement touches it.
pub fn open(db_path: impl AsRef<Path>) -> Result<Connection> {
    let db_path = db_path.as_ref();
    let existing = db_path.exists();

    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let conn = Connection::open(db_path)?;

    if existing {
        schema::check_version(&conn)?;
        debug!("Opened existing database at {}", db_path.display());
    } else {
        info!("Performing first-time setup at {}", db_path.display());
        schema::init(&conn)?;
    }

    configure(&conn)?;
    Ok(conn)
}

/// Open a fresh in-memory database with the current schema
pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    schema::init(&conn)?;
    configure(&conn)?;
    Ok(conn)
}

/// Per-connection settings applied after the version check
fn configure(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "PRAGMA foreign_keys = ON;
         PRAGMA cache_size = 10000;",
    )?;
    Ok(())
}

/// Run `f` inside a transaction, committing on success
///
/// If `f` returns an error the transaction is dropped, which rolls back
/// every statement executed through it. The connection must not already be
/// inside a transaction.
pub fn transaction<T, F>(conn: &Connection, f: F) -> Result<T>
where
    F: FnOnce(&Transaction) -> Result<T>,
{
    let tx = conn.unchecked_transaction()?;
    let value = f(&tx)?;
    tx.commit()?;
    Ok(value)
}
