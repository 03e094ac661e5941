// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::catalog::Catalog;
use crate::error::DomainError;
use crate::types::{Course, CourseId, CourseType, SeatCounts};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

/// A course record exactly as the remote service sends it.
///
/// Every field is optional and numeric fields may arrive as JSON numbers or
/// numeric strings. Nothing here is trusted until it passes
/// [`validate_course_record`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CourseRecord {
    pub id: Option<Value>,
    pub course_name: Option<String>,
    pub branch: Option<String>,
    pub city: Option<String>,
    pub institute_name: Option<String>,
    pub price_per_seat: Option<Value>,
    pub total_seats: Option<Value>,
    pub left_seats: Option<Value>,
    pub locked_seats: Option<Value>,
}

/// Outcome of validating a fetched catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogValidation {
    /// The accepted courses.
    pub catalog: Catalog,
    /// Why each dropped record was rejected, in input order.
    pub rejected: Vec<DomainError>,
}

impl CatalogValidation {
    /// Whether any record was dropped.
    #[must_use]
    pub fn is_partial(&self) -> bool {
        !self.rejected.is_empty()
    }
}

fn value_to_id(value: Option<&Value>) -> Option<String> {
    let id: Option<String> = match value? {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    };
    id.filter(|s| !s.is_empty())
}

fn value_to_decimal(value: Option<&Value>) -> Option<Decimal> {
    match value? {
        Value::String(s) => Decimal::from_str(s.trim()).ok(),
        Value::Number(n) => Decimal::from_str(&n.to_string())
            .ok()
            .or_else(|| n.as_f64().and_then(|f| Decimal::try_from(f).ok())),
        _ => None,
    }
}

fn value_to_count(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::String(s) => s.trim().parse::<i64>().ok(),
        Value::Number(n) => n.as_i64(),
        _ => None,
    }
}

fn seat_field(
    course_id: &str,
    value: Option<&Value>,
    field: &'static str,
) -> Result<u32, DomainError> {
    value_to_count(value)
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| DomainError::InvalidSeatCount {
            course_id: course_id.to_string(),
            field,
        })
}

/// Validates a single remote course record.
///
/// # Errors
///
/// Returns an error if:
/// - The id is missing or empty
/// - The course name is not a known course type
/// - The price per seat is missing, unparseable, or not positive
/// - Any seat count is missing or negative
/// - More seats are left than exist
pub fn validate_course_record(record: &CourseRecord) -> Result<Course, DomainError> {
    let id: String = value_to_id(record.id.as_ref()).ok_or_else(|| {
        DomainError::InvalidCourseId(String::from("Course id is missing or empty"))
    })?;

    let price: Decimal = value_to_decimal(record.price_per_seat.as_ref()).ok_or_else(|| {
        DomainError::InvalidPrice {
            course_id: id.clone(),
            reason: String::from("price per seat is missing or not a number"),
        }
    })?;

    let course_name: &str = record.course_name.as_deref().unwrap_or_default();
    let course_type: CourseType = CourseType::from_str(course_name)?;

    let seats: SeatCounts = SeatCounts {
        total: seat_field(&id, record.total_seats.as_ref(), "total_seats")?,
        left: seat_field(&id, record.left_seats.as_ref(), "left_seats")?,
        locked: seat_field(&id, record.locked_seats.as_ref(), "locked_seats")?,
    };

    Course::new(
        CourseId::new(&id),
        course_type,
        record.branch.as_deref().unwrap_or_default(),
        record.city.as_deref().unwrap_or_default(),
        record.institute_name.as_deref().unwrap_or_default(),
        price,
        seats,
    )
}

/// Validates a fetched catalog, dropping invalid records.
///
/// # Errors
///
/// Returns `DomainError::EmptyCatalog` if no record survives validation.
pub fn validate_catalog(records: &[CourseRecord]) -> Result<CatalogValidation, DomainError> {
    let mut courses: Vec<Course> = Vec::with_capacity(records.len());
    let mut rejected: Vec<DomainError> = Vec::new();

    for record in records {
        match validate_course_record(record) {
            Ok(course) => courses.push(course),
            Err(err) => rejected.push(err),
        }
    }

    if courses.is_empty() {
        return Err(DomainError::EmptyCatalog {
            rejected: rejected.len(),
        });
    }

    Ok(CatalogValidation {
        catalog: Catalog::new(courses),
        rejected,
    })
}

/// Parses a seat count the way a numeric text field is read.
///
/// Leading whitespace and an optional sign are accepted, followed by the
/// leading run of digits; anything after it is ignored. Text with no
/// leading digits counts as zero. Values too large for `i64` saturate.
#[must_use]
pub fn parse_seat_input(input: &str) -> i64 {
    let trimmed: &str = input.trim_start();
    let (negative, rest): (bool, &str) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits: &str = rest
        .find(|c: char| !c.is_ascii_digit())
        .map_or(rest, |end| &rest[..end]);

    if digits.is_empty() {
        return 0;
    }

    let magnitude: i64 = digits.parse::<i64>().unwrap_or(i64::MAX);
    if negative { -magnitude } else { magnitude }
}

/// Title cases each whitespace-separated word.
#[must_use]
pub fn title_case(value: &str) -> String {
    value
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
            })
        })
        .collect::<Vec<String>>()
        .join(" ")
}
