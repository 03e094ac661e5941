// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Versioned encoding of the persisted selection state.
//!
//! Version 1 is the current schema. Anything without a numeric `version`
//! field, or wrapped in a `{ "state": ..., "version": 0 }` envelope, is the
//! legacy camelCase shape and is migrated on read.

use crate::error::CoreError;
use crate::state::{CommittedSet, Drafts, SessionState};
use seat_adopt_domain::{
    CartLine, CourseId, CourseType, Decimal, Selection, parse_seat_input,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::str::FromStr;
use tracing::{debug, warn};

/// Key the selection snapshot is stored under.
pub const SNAPSHOT_KEY: &str = "course-selection-storage";

/// Current snapshot schema version.
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct SnapshotV1 {
    version: u32,
    selections: Drafts,
    selected_courses: CommittedSet,
    current_step: u8,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct LegacySnapshot {
    selections: BTreeMap<String, LegacySelection>,
    selected_courses: BTreeMap<String, LegacyCartLine>,
    current_step: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct LegacySelection {
    is_selected: bool,
    seats: Option<Value>,
    total_price: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct LegacyCartLine {
    selected_seats: Option<Value>,
    price_per_seat: Option<Value>,
    total_price: Option<Value>,
    branch: String,
    course_name: String,
    city: String,
    institute: String,
}

fn legacy_decimal(value: Option<&Value>) -> Decimal {
    match value {
        Some(Value::Number(n)) => Decimal::from_str(&n.to_string()).unwrap_or_default(),
        Some(Value::String(s)) => Decimal::from_str(s.trim()).unwrap_or_default(),
        _ => Decimal::ZERO,
    }
}

fn legacy_seats(value: Option<&Value>) -> Option<i64> {
    match value {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) if !s.trim().is_empty() => Some(parse_seat_input(s)),
        _ => None,
    }
}

fn migrate_selection(legacy: &LegacySelection) -> Option<Selection> {
    if !legacy.is_selected {
        return Some(Selection::deselected());
    }

    let seats: Option<u32> = match legacy_seats(legacy.seats.as_ref()) {
        Some(n) => Some(u32::try_from(n).ok()?),
        None => None,
    };

    Some(Selection {
        is_selected: true,
        seats,
        total_price: legacy_decimal(legacy.total_price.as_ref()),
    })
}

fn migrate_cart_line(id: &str, legacy: &LegacyCartLine) -> Option<CartLine> {
    let course_name: CourseType = CourseType::from_str(&legacy.course_name).ok()?;
    let selected_seats: u32 = legacy_seats(legacy.selected_seats.as_ref())
        .and_then(|n| u32::try_from(n).ok())
        .filter(|n| *n > 0)?;

    Some(CartLine {
        id: CourseId::new(id),
        selected_seats,
        price_per_seat: legacy_decimal(legacy.price_per_seat.as_ref()),
        total_price: legacy_decimal(legacy.total_price.as_ref()),
        branch: legacy.branch.clone(),
        course_name,
        city: legacy.city.clone(),
        institute: legacy.institute.clone(),
    })
}

fn migrate_legacy(body: Value) -> Result<SessionState, CoreError> {
    let legacy: LegacySnapshot = serde_json::from_value(body)?;

    let mut selections: Drafts = Drafts::new();
    for (id, selection) in &legacy.selections {
        match migrate_selection(selection) {
            Some(migrated) => {
                selections.insert(CourseId::new(id), migrated);
            }
            None => warn!(course_id = %id, "Dropping unreadable legacy selection"),
        }
    }

    let mut selected_courses: CommittedSet = CommittedSet::new();
    for (id, line) in &legacy.selected_courses {
        match migrate_cart_line(id, line) {
            Some(migrated) => {
                selected_courses.insert(CourseId::new(id), migrated);
            }
            None => warn!(course_id = %id, "Dropping unreadable legacy cart line"),
        }
    }

    let current_step: u8 = legacy_seats(legacy.current_step.as_ref())
        .and_then(|n| u8::try_from(n).ok())
        .filter(|n| *n <= 5)
        .unwrap_or(0);

    debug!(
        selections = selections.len(),
        cart_lines = selected_courses.len(),
        "Migrated legacy selection snapshot"
    );

    Ok(SessionState {
        selections,
        selected_courses,
        current_step,
    })
}

/// Serializes the session at the current schema version.
///
/// # Errors
///
/// Returns `CoreError::Snapshot` if serialization fails.
pub fn encode_snapshot(session: &SessionState) -> Result<String, CoreError> {
    let snapshot: SnapshotV1 = SnapshotV1 {
        version: SNAPSHOT_VERSION,
        selections: session.selections.clone(),
        selected_courses: session.selected_courses.clone(),
        current_step: session.current_step,
    };
    Ok(serde_json::to_string(&snapshot)?)
}

/// Reads a persisted snapshot of any known version.
///
/// # Errors
///
/// Returns `CoreError::Snapshot` if the body is not JSON, is malformed for
/// its version, or carries a version newer than this build understands.
pub fn decode_snapshot(body: &str) -> Result<SessionState, CoreError> {
    let value: Value = serde_json::from_str(body)?;

    if let Some(inner) = value.get("state").filter(|v| v.is_object()) {
        return migrate_legacy(inner.clone());
    }

    match value.get("version").and_then(Value::as_u64) {
        None | Some(0) => migrate_legacy(value),
        Some(1) => {
            let snapshot: SnapshotV1 = serde_json::from_value(value)?;
            Ok(SessionState {
                selections: snapshot.selections,
                selected_courses: snapshot.selected_courses,
                current_step: snapshot.current_step,
            })
        }
        Some(other) => Err(CoreError::Snapshot(format!(
            "unsupported snapshot version {other}"
        ))),
    }
}
