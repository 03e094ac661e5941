// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::data_models::SnapshotRecord;
use crate::diesel_schema::snapshots;
use crate::error::PersistenceError;

/// Diesel Queryable struct for snapshot rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = snapshots)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct SnapshotRow {
    snapshot_key: String,
    schema_version: i32,
    body: String,
    updated_at: String,
}

impl TryFrom<SnapshotRow> for SnapshotRecord {
    type Error = PersistenceError;

    fn try_from(row: SnapshotRow) -> Result<Self, Self::Error> {
        let schema_version: u32 = u32::try_from(row.schema_version).map_err(|_| {
            PersistenceError::InvalidRecord(format!(
                "negative schema version {} for '{}'",
                row.schema_version, row.snapshot_key
            ))
        })?;
        let updated_at: OffsetDateTime = OffsetDateTime::parse(&row.updated_at, &Rfc3339)?;

        Ok(Self {
            key: row.snapshot_key,
            schema_version,
            body: row.body,
            updated_at,
        })
    }
}

/// Retrieves the snapshot stored under `key`.
///
/// # Errors
///
/// Returns an error if the query fails or the row is malformed.
pub fn find_snapshot(
    conn: &mut SqliteConnection,
    key: &str,
) -> Result<Option<SnapshotRecord>, PersistenceError> {
    let row: Option<SnapshotRow> = snapshots::table
        .filter(snapshots::snapshot_key.eq(key))
        .select(SnapshotRow::as_select())
        .first(conn)
        .optional()?;

    row.map(SnapshotRecord::try_from).transpose()
}

/// Lists the keys of every stored snapshot.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_snapshot_keys(conn: &mut SqliteConnection) -> Result<Vec<String>, PersistenceError> {
    Ok(snapshots::table
        .select(snapshots::snapshot_key)
        .order(snapshots::snapshot_key.asc())
        .load::<String>(conn)?)
}
