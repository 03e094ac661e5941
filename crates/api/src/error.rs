// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use seat_adopt::CoreError;
use seat_adopt_domain::DomainError;

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// A domain rule was violated.
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// The operation is not possible in the current checkout state.
    Precondition {
        /// A human-readable description of what is missing.
        message: String,
    },
    /// Another checkout request is still running.
    InFlight,
    /// The remote course service failed or could not be reached.
    Upstream {
        /// HTTP status returned by the service, if it answered.
        status: Option<u16>,
        /// The service's message, or a generic one.
        message: String,
    },
    /// The remote course service answered with an unreadable body.
    InvalidResponse {
        /// A description of what could not be read.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainRuleViolation { message, .. } | Self::Precondition { message } => {
                write!(f, "{message}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::InFlight => write!(f, "Another checkout request is in progress"),
            Self::Upstream { message, .. } => write!(f, "{message}"),
            Self::InvalidResponse { message } => {
                write!(f, "Unexpected response from course service: {message}")
            }
            Self::Internal { message } => write!(f, "Internal error: {message}"),
        }
    }
}

impl std::error::Error for ApiError {}

const fn rule_name(err: &DomainError) -> &'static str {
    match err {
        DomainError::InvalidCourseId(_) => "course_id",
        DomainError::UnknownCourseType(_) => "course_type",
        DomainError::InvalidPrice { .. } => "price_per_seat",
        DomainError::InvalidSeatCount { .. } | DomainError::LeftSeatsExceedTotal { .. } => {
            "seat_counts"
        }
        DomainError::EmptyCatalog { .. } => "non_empty_catalog",
        DomainError::CourseNotFound(_) => "course_exists",
        DomainError::NoSeatsAvailable(_) => "seats_available",
        DomainError::SeatsExceedAvailability { .. } => "seats_within_availability",
        DomainError::NegativeSeats { .. } => "seats_non_negative",
        DomainError::InvalidStep(_) => "step_range",
        DomainError::InvalidOtp => "otp_format",
        DomainError::UnknownPaymentMethod(_) => "payment_method",
        DomainError::PriceOverflow(_) => "price_within_range",
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::UnknownPaymentMethod(_) => Self::InvalidInput {
                field: String::from("payment_method"),
                message: err.to_string(),
            },
            DomainError::InvalidStep(_) => Self::InvalidInput {
                field: String::from("step"),
                message: err.to_string(),
            },
            _ => Self::DomainRuleViolation {
                rule: rule_name(&err).to_string(),
                message: err.to_string(),
            },
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::DomainViolation(domain) => Self::from(domain),
            CoreError::NothingSelected => Self::DomainRuleViolation {
                rule: String::from("non_empty_selection"),
                message: err.to_string(),
            },
            CoreError::CatalogNotLoaded => Self::Precondition {
                message: err.to_string(),
            },
            CoreError::Snapshot(_) | CoreError::Persistence(_) => Self::Internal {
                message: err.to_string(),
            },
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return Self::InvalidResponse {
                message: err.to_string(),
            };
        }
        Self::Upstream {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidResponse {
            message: err.to_string(),
        }
    }
}
