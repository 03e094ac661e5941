// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Durable snapshot storage for the seat adoption platform.
//!
//! Snapshots are stored in a single `snapshots` table keyed by name, each
//! row carrying its schema version, the encoded body and an RFC 3339
//! timestamp of the last write. The database is `SQLite` via Diesel, with
//! embedded migrations applied on open.
//!
//! ## Testing
//!
//! Tests run against unique shared in-memory databases; see
//! [`Persistence::new_in_memory`].

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use seat_adopt::SnapshotStore;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use time::OffsetDateTime;
use tracing::info;

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use data_models::SnapshotRecord;
pub use error::PersistenceError;

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a unique sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Persistence adapter for selection snapshots.
pub struct Persistence {
    conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique shared in-memory database, so tests stay
    /// isolated.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String = format!("file:memdb_test_{db_id}?mode=memory&cache=shared");

        let conn: SqliteConnection = backend::initialize_database(&shared_memory_url)?;
        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::initialize_database(path_str)?;
        backend::enable_wal_mode(&mut conn)?;

        info!(path = path_str, "Opened snapshot database");
        Ok(Self { conn })
    }

    /// Retrieves the snapshot stored under `key`, with its metadata.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the stored row is malformed.
    pub fn get_snapshot(&mut self, key: &str) -> Result<Option<SnapshotRecord>, PersistenceError> {
        queries::find_snapshot(&mut self.conn, key)
    }

    /// Inserts or replaces the snapshot stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn put_snapshot(
        &mut self,
        key: &str,
        body: &str,
        schema_version: u32,
    ) -> Result<(), PersistenceError> {
        mutations::upsert_snapshot(
            &mut self.conn,
            key,
            body,
            schema_version,
            OffsetDateTime::now_utc(),
        )
    }

    /// Deletes the snapshot stored under `key`.
    ///
    /// # Returns
    ///
    /// Whether a snapshot existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_snapshot(&mut self, key: &str) -> Result<bool, PersistenceError> {
        mutations::delete_snapshot(&mut self.conn, key)
    }

    /// Lists the keys of every stored snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn snapshot_keys(&mut self) -> Result<Vec<String>, PersistenceError> {
        queries::list_snapshot_keys(&mut self.conn)
    }
}

impl SnapshotStore for Persistence {
    type Error = PersistenceError;

    fn load(&mut self, key: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.get_snapshot(key)?.map(|record| record.body))
    }

    fn save(&mut self, key: &str, body: &str, schema_version: u32) -> Result<(), Self::Error> {
        self.put_snapshot(key, body, schema_version)
    }

    fn remove(&mut self, key: &str) -> Result<(), Self::Error> {
        self.delete_snapshot(key)?;
        Ok(())
    }
}
