// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::CoreError;
use seat_adopt_domain::{CartLine, Decimal, DomainError};
use serde::Serialize;
use std::collections::BTreeMap;

/// Cart lines grouped by uppercased course name, then by city.
pub type CartGroups = BTreeMap<String, BTreeMap<String, Vec<CartLine>>>;

/// Aggregated view of the cart for the review and payment screens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CartSummary {
    /// Lines grouped by course type and city.
    pub groups: CartGroups,
    /// Sum of every line total.
    pub total_amount: Decimal,
    /// Number of cart lines.
    pub line_count: usize,
    /// Sum of seats over every line.
    pub total_seats: u64,
}

/// Groups cart lines by course type and city.
///
/// The city key is used verbatim, so "Bhopal" and "bhopal" form two groups.
#[must_use]
pub fn group<'a, I>(lines: I) -> CartGroups
where
    I: IntoIterator<Item = &'a CartLine>,
{
    let mut groups: CartGroups = BTreeMap::new();
    for line in lines {
        groups
            .entry(line.course_name.as_str().to_uppercase())
            .or_default()
            .entry(line.city.clone())
            .or_default()
            .push(line.clone());
    }
    groups
}

/// Sum of `total_price` over the lines.
///
/// # Errors
///
/// Returns `DomainError::PriceOverflow` if the sum does not fit.
pub fn total_amount<'a, I>(lines: I) -> Result<Decimal, CoreError>
where
    I: IntoIterator<Item = &'a CartLine>,
{
    lines.into_iter().try_fold(Decimal::ZERO, |sum, line| {
        sum.checked_add(line.total_price).ok_or_else(|| {
            CoreError::DomainViolation(DomainError::PriceOverflow(String::from("the cart")))
        })
    })
}

/// Builds the cart summary for a set of lines.
///
/// # Errors
///
/// See [`total_amount`].
pub fn summarize<'a, I>(lines: I) -> Result<CartSummary, CoreError>
where
    I: IntoIterator<Item = &'a CartLine>,
{
    let lines: Vec<&CartLine> = lines.into_iter().collect();
    Ok(CartSummary {
        groups: group(lines.iter().copied()),
        total_amount: total_amount(lines.iter().copied())?,
        line_count: lines.len(),
        total_seats: lines.iter().map(|l| u64::from(l.selected_seats)).sum(),
    })
}
