// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Course identifier is missing or empty.
    InvalidCourseId(String),
    /// Course name is not one of the known course types.
    UnknownCourseType(String),
    /// Price per seat is missing, unparseable, or not positive.
    InvalidPrice {
        /// The course the price belongs to.
        course_id: String,
        /// Description of the problem.
        reason: String,
    },
    /// A seat count field is missing, unparseable, or negative.
    InvalidSeatCount {
        /// The course the count belongs to.
        course_id: String,
        /// The offending field name.
        field: &'static str,
    },
    /// More seats are left than the course has in total.
    LeftSeatsExceedTotal {
        /// The course identifier.
        course_id: String,
        /// Seats left.
        left_seats: u32,
        /// Total seats.
        total_seats: u32,
    },
    /// The fetched catalog had no valid courses.
    EmptyCatalog {
        /// Number of records that were dropped as invalid.
        rejected: usize,
    },
    /// A course was not found in the catalog.
    CourseNotFound(String),
    /// The course has no seats left to select.
    NoSeatsAvailable(String),
    /// Requested seats exceed what is left.
    SeatsExceedAvailability {
        /// The course identifier.
        course_id: String,
        /// Seats requested.
        requested: i64,
        /// Seats left.
        available: u32,
    },
    /// Requested seat count is negative.
    NegativeSeats {
        /// The course identifier.
        course_id: String,
        /// Seats requested.
        requested: i64,
    },
    /// Step index is outside the course-type range.
    InvalidStep(u8),
    /// OTP is not exactly six digits.
    InvalidOtp,
    /// Payment method string is not recognised.
    UnknownPaymentMethod(String),
    /// A price total does not fit the money type.
    PriceOverflow(String),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCourseId(msg) => write!(f, "Invalid course id: {msg}"),
            Self::UnknownCourseType(name) => write!(f, "Unknown course type: '{name}'"),
            Self::InvalidPrice { course_id, reason } => {
                write!(f, "Invalid price for course {course_id}: {reason}")
            }
            Self::InvalidSeatCount { course_id, field } => {
                write!(f, "Invalid {field} for course {course_id}")
            }
            Self::LeftSeatsExceedTotal {
                course_id,
                left_seats,
                total_seats,
            } => {
                write!(
                    f,
                    "Course {course_id} has {left_seats} seats left but only {total_seats} in total"
                )
            }
            Self::EmptyCatalog { rejected } => {
                write!(f, "No valid courses available ({rejected} invalid records dropped)")
            }
            Self::CourseNotFound(id) => write!(f, "Invalid course selection: {id}"),
            Self::NoSeatsAvailable(_) => write!(f, "No seats available for this course"),
            Self::SeatsExceedAvailability { available, .. } => {
                write!(f, "Maximum available seats: {available}")
            }
            Self::NegativeSeats { .. } => write!(f, "Number of seats cannot be negative"),
            Self::InvalidStep(step) => {
                write!(f, "Invalid step: {step}. Must be between 0 and 5")
            }
            Self::InvalidOtp => write!(f, "Please enter a valid 6-digit OTP"),
            Self::UnknownPaymentMethod(method) => {
                write!(f, "Unknown payment method: '{method}'")
            }
            Self::PriceOverflow(what) => write!(f, "Total price is too large for {what}"),
        }
    }
}

impl std::error::Error for DomainError {}
