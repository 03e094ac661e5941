// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use seat_adopt_domain::CourseId;
use serde::{Deserialize, Serialize};

/// A command represents a draft-selection edit as data only.
///
/// Commands are the only way to change draft selections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Tick or untick a course checkbox.
    ToggleCourse {
        /// The course being toggled.
        course_id: CourseId,
        /// The new checkbox state.
        is_selected: bool,
    },
    /// Change the seat field of a course.
    SetSeats {
        /// The course being edited.
        course_id: CourseId,
        /// The seat field text as typed.
        seats: String,
    },
    /// Drop every draft, e.g. when leaving a city or course screen.
    ResetDrafts,
}

/// A partial update to one draft selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionPatch {
    /// New checkbox state, if it changes.
    #[serde(default)]
    pub is_selected: Option<bool>,
    /// New seat field text, if it changes.
    #[serde(default)]
    pub seats: Option<String>,
}

impl SelectionPatch {
    /// Expands the patch into commands, checkbox first.
    #[must_use]
    pub fn into_commands(self, course_id: &CourseId) -> Vec<Command> {
        let mut commands: Vec<Command> = Vec::with_capacity(2);
        if let Some(is_selected) = self.is_selected {
            commands.push(Command::ToggleCourse {
                course_id: course_id.clone(),
                is_selected,
            });
        }
        if let Some(seats) = self.seats {
            commands.push(Command::SetSeats {
                course_id: course_id.clone(),
                seats,
            });
        }
        commands
    }
}
