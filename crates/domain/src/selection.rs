// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::types::{CourseId, CourseType};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An in-progress seat choice for one course.
///
/// A deselected draft never carries seats or a price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    /// Whether the course checkbox is ticked.
    pub is_selected: bool,
    /// Seats entered; `None` when the field is empty.
    pub seats: Option<u32>,
    /// `seats * price_per_seat` at the time of the edit.
    pub total_price: Decimal,
}

impl Selection {
    /// A draft with nothing selected.
    #[must_use]
    pub const fn deselected() -> Self {
        Self {
            is_selected: false,
            seats: None,
            total_price: Decimal::ZERO,
        }
    }

    /// Seats entered, treating an empty field as zero.
    #[must_use]
    pub fn seat_count(&self) -> u32 {
        self.seats.unwrap_or(0)
    }

    /// Whether this draft would become a cart line on commit.
    #[must_use]
    pub fn is_committable(&self) -> bool {
        self.is_selected && self.seat_count() > 0
    }
}

impl Default for Selection {
    fn default() -> Self {
        Self::deselected()
    }
}

/// A committed seat choice, ready for checkout.
///
/// Course details are denormalized at commit time so the cart can be shown
/// without re-joining the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// The course identifier.
    pub id: CourseId,
    /// Seats being adopted.
    pub selected_seats: u32,
    /// Price of one seat at commit time.
    pub price_per_seat: Decimal,
    /// `selected_seats * price_per_seat`.
    pub total_price: Decimal,
    /// Branch name, title cased.
    pub branch: String,
    /// The course type.
    pub course_name: CourseType,
    /// City, verbatim from the catalog.
    pub city: String,
    /// Institute name, title cased.
    pub institute: String,
}
