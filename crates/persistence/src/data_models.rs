// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::OffsetDateTime;

/// A stored snapshot row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotRecord {
    /// Storage key.
    pub key: String,
    /// Schema version the body was written with.
    pub schema_version: u32,
    /// Encoded snapshot.
    pub body: String,
    /// Time of the last write.
    pub updated_at: OffsetDateTime,
}
