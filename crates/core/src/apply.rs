// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::Command;
use crate::error::CoreError;
use crate::state::{Drafts, TransitionResult};
use seat_adopt_domain::{Catalog, Course, CourseId, DomainError, Selection, parse_seat_input};
use std::collections::BTreeMap;
use tracing::debug;

fn resolve<'a>(catalog: &'a Catalog, course_id: &CourseId) -> Result<&'a Course, CoreError> {
    catalog
        .find(course_id)
        .ok_or_else(|| CoreError::DomainViolation(DomainError::CourseNotFound(course_id.to_string())))
}

fn toggle(course: &Course, is_selected: bool) -> Result<Selection, CoreError> {
    if !is_selected {
        return Ok(Selection::deselected());
    }

    if course.left_seats() == 0 {
        return Err(CoreError::DomainViolation(DomainError::NoSeatsAvailable(
            course.id().to_string(),
        )));
    }

    Ok(Selection {
        is_selected: true,
        seats: Some(1),
        total_price: course.price_per_seat(),
    })
}

fn set_seats(course: &Course, previous: &Selection, input: &str) -> Result<Selection, CoreError> {
    let requested: i64 = parse_seat_input(input);

    if requested > i64::from(course.left_seats()) {
        return Err(CoreError::DomainViolation(
            DomainError::SeatsExceedAvailability {
                course_id: course.id().to_string(),
                requested,
                available: course.left_seats(),
            },
        ));
    }

    let seats: u32 = u32::try_from(requested).map_err(|_| {
        CoreError::DomainViolation(DomainError::NegativeSeats {
            course_id: course.id().to_string(),
            requested,
        })
    })?;

    if input.trim().is_empty() {
        if !previous.is_selected {
            return Ok(Selection::deselected());
        }
        return Ok(Selection {
            is_selected: true,
            seats: None,
            total_price: course.price_for(0)?,
        });
    }

    Ok(Selection {
        is_selected: true,
        seats: Some(seats),
        total_price: course.price_for(seats)?,
    })
}

/// Applies a draft command against the latest catalog.
///
/// # Arguments
///
/// * `catalog` - The catalog the edit is validated against
/// * `selections` - The current drafts (immutable)
/// * `command` - The edit to apply
///
/// # Returns
///
/// * `Ok(TransitionResult)` containing the new drafts
/// * `Err(CoreError)` if the edit is rejected; the input drafts stay valid
///
/// # Errors
///
/// Returns an error if:
/// - The course is not in the catalog
/// - A course with no seats left is ticked
/// - The seat count exceeds the seats left or is negative
pub fn apply(
    catalog: &Catalog,
    selections: &Drafts,
    command: Command,
) -> Result<TransitionResult, CoreError> {
    let new_selections: Drafts = match command {
        Command::ToggleCourse {
            course_id,
            is_selected,
        } => {
            let course: &Course = resolve(catalog, &course_id)?;
            let selection: Selection = toggle(course, is_selected)?;
            debug!(course_id = %course_id, is_selected, "Toggled course");

            let mut next: Drafts = selections.clone();
            next.insert(course_id, selection);
            next
        }
        Command::SetSeats { course_id, seats } => {
            let course: &Course = resolve(catalog, &course_id)?;
            let previous: Selection = selections.get(&course_id).cloned().unwrap_or_default();
            let selection: Selection = set_seats(course, &previous, &seats)?;
            debug!(course_id = %course_id, seats = ?selection.seats, "Updated seats");

            let mut next: Drafts = selections.clone();
            next.insert(course_id, selection);
            next
        }
        Command::ResetDrafts => BTreeMap::new(),
    };

    let changed: bool = &new_selections != selections;
    Ok(TransitionResult {
        new_selections,
        changed,
    })
}

/// Applies several commands as one transition.
///
/// If any command is rejected none of them take effect.
///
/// # Errors
///
/// Returns the first rejection.
pub fn apply_all(
    catalog: &Catalog,
    selections: &Drafts,
    commands: Vec<Command>,
) -> Result<TransitionResult, CoreError> {
    let mut current: Drafts = selections.clone();
    for command in commands {
        current = apply(catalog, &current, command)?.new_selections;
    }

    let changed: bool = &current != selections;
    Ok(TransitionResult {
        new_selections: current,
        changed,
    })
}
