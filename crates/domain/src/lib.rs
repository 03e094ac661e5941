// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

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

mod catalog;
mod error;
mod selection;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use catalog::{Catalog, CitySeatInfo, OTHER_INSTITUTES, institute_label};
pub use error::DomainError;
pub use selection::{CartLine, Selection};
pub use types::{
    Course, CourseId, CourseType, MAX_PRICE_PER_SEAT, Otp, PaymentMethod, SeatCounts,
};
pub use validation::{
    CatalogValidation, CourseRecord, parse_seat_input, title_case, validate_catalog,
    validate_course_record,
};

/// Re-exported so downstream crates agree on the money type.
pub use rust_decimal::Decimal;
