// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The category of a seat offering.
///
/// The declaration order is the canonical catalog order and also defines
/// the step index used by the multi-step selection screens.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum CourseType {
    /// Master of Technology.
    #[serde(rename = "M.Tech")]
    MTech,
    /// Bachelor of Technology.
    #[serde(rename = "B.Tech")]
    BTech,
    /// Diploma programmes.
    Diploma,
    /// Polytechnic programmes.
    Polytechnic,
    /// Industrial Training Institute programmes.
    #[serde(rename = "ITI")]
    Iti,
}

impl CourseType {
    /// All course types in canonical order.
    pub const ALL: [Self; 5] = [
        Self::MTech,
        Self::BTech,
        Self::Diploma,
        Self::Polytechnic,
        Self::Iti,
    ];

    /// Returns the display name used by the remote catalog.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::MTech => "M.Tech",
            Self::BTech => "B.Tech",
            Self::Diploma => "Diploma",
            Self::Polytechnic => "Polytechnic",
            Self::Iti => "ITI",
        }
    }

    /// Returns the selection step (1-based) that shows this course type.
    #[must_use]
    pub const fn step(&self) -> u8 {
        match self {
            Self::MTech => 1,
            Self::BTech => 2,
            Self::Diploma => 3,
            Self::Polytechnic => 4,
            Self::Iti => 5,
        }
    }

    /// Maps a selection step back to its course type.
    ///
    /// Step 0 means no course type has been chosen yet and yields `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStep` for steps above 5.
    pub fn from_step(step: u8) -> Result<Option<Self>, DomainError> {
        match step {
            0 => Ok(None),
            1..=5 => Ok(Some(Self::ALL[usize::from(step - 1)])),
            _ => Err(DomainError::InvalidStep(step)),
        }
    }

    /// Parses a course type ignoring ASCII case, as route parameters do.
    #[must_use]
    pub fn parse_loose(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(value.trim()))
    }
}

impl FromStr for CourseType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| DomainError::UnknownCourseType(s.to_string()))
    }
}

impl std::fmt::Display for CourseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Identifier of a seat offering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourseId(String);

impl CourseId {
    /// Creates a new course identifier.
    #[must_use]
    pub fn new(value: &str) -> Self {
        Self(value.to_string())
    }

    /// Returns the identifier value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CourseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Seat capacity of a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeatCounts {
    /// Total seats offered.
    pub total: u32,
    /// Seats still available for adoption.
    pub left: u32,
    /// Seats already locked by payments.
    pub locked: u32,
}

/// Highest accepted price for a single seat.
pub const MAX_PRICE_PER_SEAT: u64 = 1_000_000_000;

/// A purchasable seat offering from the remote catalog.
///
/// Courses are immutable once constructed; `left_seats <= total_seats`
/// is enforced at construction time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Course {
    id: CourseId,
    course_name: CourseType,
    branch: String,
    city: String,
    institute_name: String,
    price_per_seat: Decimal,
    total_seats: u32,
    left_seats: u32,
    locked_seats: u32,
}

impl Course {
    /// Creates a new course.
    ///
    /// # Arguments
    ///
    /// * `id` - The course identifier
    /// * `course_name` - The course type
    /// * `branch` - The branch / sub-programme name
    /// * `city` - The city the institute is in
    /// * `institute_name` - The providing institute
    /// * `price_per_seat` - Price of one seat
    /// * `seats` - Seat capacity
    ///
    /// # Errors
    ///
    /// Returns an error if the id is empty, the price is not positive, or
    /// more seats are left than exist.
    pub fn new(
        id: CourseId,
        course_name: CourseType,
        branch: &str,
        city: &str,
        institute_name: &str,
        price_per_seat: Decimal,
        seats: SeatCounts,
    ) -> Result<Self, DomainError> {
        if id.value().trim().is_empty() {
            return Err(DomainError::InvalidCourseId(String::from(
                "Course id cannot be empty",
            )));
        }
        if price_per_seat <= Decimal::ZERO {
            return Err(DomainError::InvalidPrice {
                course_id: id.value().to_string(),
                reason: format!("price per seat must be positive, got {price_per_seat}"),
            });
        }
        if price_per_seat > Decimal::from(MAX_PRICE_PER_SEAT) {
            return Err(DomainError::InvalidPrice {
                course_id: id.value().to_string(),
                reason: format!("price per seat exceeds {MAX_PRICE_PER_SEAT}, got {price_per_seat}"),
            });
        }
        if seats.left > seats.total {
            return Err(DomainError::LeftSeatsExceedTotal {
                course_id: id.value().to_string(),
                left_seats: seats.left,
                total_seats: seats.total,
            });
        }

        Ok(Self {
            id,
            course_name,
            branch: branch.to_string(),
            city: city.to_string(),
            institute_name: institute_name.to_string(),
            price_per_seat,
            total_seats: seats.total,
            left_seats: seats.left,
            locked_seats: seats.locked,
        })
    }

    /// Returns the course identifier.
    #[must_use]
    pub const fn id(&self) -> &CourseId {
        &self.id
    }

    /// Returns the course type.
    #[must_use]
    pub const fn course_name(&self) -> CourseType {
        self.course_name
    }

    /// Returns the branch name.
    #[must_use]
    pub fn branch(&self) -> &str {
        &self.branch
    }

    /// Returns the city.
    #[must_use]
    pub fn city(&self) -> &str {
        &self.city
    }

    /// Returns the institute name as delivered by the catalog.
    #[must_use]
    pub fn institute_name(&self) -> &str {
        &self.institute_name
    }

    /// Returns the price of a single seat.
    #[must_use]
    pub const fn price_per_seat(&self) -> Decimal {
        self.price_per_seat
    }

    /// Returns the total seat count.
    #[must_use]
    pub const fn total_seats(&self) -> u32 {
        self.total_seats
    }

    /// Returns the number of seats still available.
    #[must_use]
    pub const fn left_seats(&self) -> u32 {
        self.left_seats
    }

    /// Returns the number of seats already locked.
    #[must_use]
    pub const fn locked_seats(&self) -> u32 {
        self.locked_seats
    }

    /// Price of `seats` seats of this course.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::PriceOverflow` if the total does not fit.
    pub fn price_for(&self, seats: u32) -> Result<Decimal, DomainError> {
        self.price_per_seat
            .checked_mul(Decimal::from(seats))
            .ok_or_else(|| DomainError::PriceOverflow(format!("course {}", self.id)))
    }
}

/// How a donor pays for locked seats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Credit or debit card.
    Card,
    /// UPI payment.
    Upi,
    /// Net banking.
    Netbanking,
}

impl PaymentMethod {
    /// Returns the wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Card => "card",
            Self::Upi => "upi",
            Self::Netbanking => "netbanking",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "card" => Ok(Self::Card),
            "upi" => Ok(Self::Upi),
            "netbanking" => Ok(Self::Netbanking),
            _ => Err(DomainError::UnknownPaymentMethod(s.to_string())),
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A one-time passcode entered by the donor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Otp(String);

impl Otp {
    /// Parses an OTP, which must be exactly six ASCII digits.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidOtp` otherwise.
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        let value: &str = value.trim();
        if value.len() != 6 || !value.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DomainError::InvalidOtp);
        }
        Ok(Self(value.to_string()))
    }

    /// Returns the passcode digits.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }
}
