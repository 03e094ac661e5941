// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::debug;

use crate::diesel_schema::snapshots;
use crate::error::PersistenceError;

/// Inserts or replaces the snapshot stored under `key`.
///
/// # Errors
///
/// Returns an error if the version does not fit the column or the write fails.
pub fn upsert_snapshot(
    conn: &mut SqliteConnection,
    key: &str,
    body: &str,
    schema_version: u32,
    now: OffsetDateTime,
) -> Result<(), PersistenceError> {
    let version: i32 = i32::try_from(schema_version).map_err(|_| {
        PersistenceError::InvalidRecord(format!("schema version {schema_version} out of range"))
    })?;
    let updated_at: String = now.format(&Rfc3339)?;

    diesel::insert_into(snapshots::table)
        .values((
            snapshots::snapshot_key.eq(key),
            snapshots::schema_version.eq(version),
            snapshots::body.eq(body),
            snapshots::updated_at.eq(&updated_at),
        ))
        .on_conflict(snapshots::snapshot_key)
        .do_update()
        .set((
            snapshots::schema_version.eq(version),
            snapshots::body.eq(body),
            snapshots::updated_at.eq(&updated_at),
        ))
        .execute(conn)?;

    debug!(key, schema_version, bytes = body.len(), "Snapshot saved");
    Ok(())
}

/// Deletes the snapshot stored under `key`.
///
/// # Returns
///
/// Whether a row was deleted.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn delete_snapshot(conn: &mut SqliteConnection, key: &str) -> Result<bool, PersistenceError> {
    let deleted: usize =
        diesel::delete(snapshots::table.filter(snapshots::snapshot_key.eq(key))).execute(conn)?;
    debug!(key, deleted, "Snapshot deleted");
    Ok(deleted > 0)
}
