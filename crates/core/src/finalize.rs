// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::CoreError;
use crate::state::{CommittedSet, Drafts};
use seat_adopt_domain::{CartLine, Catalog, Course, institute_label, title_case};
use tracing::{debug, warn};

fn cart_line(course: &Course, seats: u32) -> Result<CartLine, CoreError> {
    Ok(CartLine {
        id: course.id().clone(),
        selected_seats: seats,
        price_per_seat: course.price_per_seat(),
        total_price: course.price_for(seats)?,
        branch: title_case(course.branch()),
        course_name: course.course_name(),
        city: course.city().to_string(),
        institute: institute_label(course),
    })
}

/// Converts committable drafts into cart lines priced from `catalog`.
///
/// Drafts whose course is no longer in the catalog, or that ask for more
/// seats than the catalog has left, are dropped.
///
/// # Errors
///
/// Returns `DomainError::PriceOverflow` if a line total does not fit.
pub fn finalize(drafts: &Drafts, catalog: &Catalog) -> Result<CommittedSet, CoreError> {
    let mut lines: CommittedSet = CommittedSet::new();
    for (course_id, selection) in drafts {
        if !selection.is_committable() {
            continue;
        }
        let Some(course) = catalog.find(course_id) else {
            warn!(course_id = %course_id, "Dropping selection for a course no longer offered");
            continue;
        };
        let seats: u32 = selection.seat_count();
        if seats > course.left_seats() {
            warn!(
                course_id = %course_id,
                seats,
                left_seats = course.left_seats(),
                "Dropping selection that exceeds the seats left"
            );
            continue;
        }
        lines.insert(course_id.clone(), cart_line(course, seats)?);
    }
    Ok(lines)
}

/// Merges finalized drafts over the existing cart.
///
/// Lines from `drafts` replace existing lines for the same course.
///
/// # Errors
///
/// Returns `CoreError::NothingSelected` when the drafts yield no cart line.
pub fn proceed(
    existing: &CommittedSet,
    drafts: &Drafts,
    catalog: &Catalog,
) -> Result<CommittedSet, CoreError> {
    let finalized: CommittedSet = finalize(drafts, catalog)?;
    if finalized.is_empty() {
        return Err(CoreError::NothingSelected);
    }

    debug!(new_lines = finalized.len(), existing = existing.len(), "Merging selection into cart");
    let mut merged: CommittedSet = existing.clone();
    merged.extend(finalized);
    Ok(merged)
}
