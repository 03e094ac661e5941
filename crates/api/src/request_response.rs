// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request and response types.
//!
//! The first half mirrors the remote course service's JSON, including its
//! mix of `camelCase` and `snake_case` keys. Money goes over that wire as
//! JSON numbers. The second half is what the session host speaks.

use rust_decimal::Decimal;
use seat_adopt::{CartSummary, DialogKind, GuardState, NavigationDecision, Notice};
use seat_adopt_domain::{CartLine, Course, CitySeatInfo};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// One cart line as the checkout endpoints expect it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedCourseItem {
    pub course_id: String,
    #[serde(rename = "courseName")]
    pub course_name: String,
    pub branch: String,
    #[serde(rename = "selectedSeats")]
    pub selected_seats: u32,
    #[serde(rename = "pricePerSeat", with = "rust_decimal::serde::float")]
    pub price_per_seat: Decimal,
    #[serde(rename = "totalPrice", with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
}

impl From<&CartLine> for SelectedCourseItem {
    fn from(line: &CartLine) -> Self {
        Self {
            course_id: line.id.value().to_string(),
            course_name: line.course_name.as_str().to_string(),
            branch: line.branch.clone(),
            selected_seats: line.selected_seats,
            price_per_seat: line.price_per_seat,
            total_price: line.total_price,
        }
    }
}

/// `POST /user/generate-otp` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateOtpRequest {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub selected_courses: Vec<SelectedCourseItem>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
}

/// `POST /user/generate-otp` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateOtpResponse {
    #[serde(default)]
    pub phone: Option<String>,
}

/// `POST /user/verify-otp` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyOtpRequest {
    pub otp: String,
    #[serde(rename = "userId")]
    pub user_id: String,
}

/// `POST /billing/process-payment` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessPaymentRequest {
    pub payment_method: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    pub selected_courses: Vec<SelectedCourseItem>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
}

/// `POST /billing/process-payment` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessPaymentResponse {
    #[serde(default)]
    pub transaction_id: Option<Value>,
}

impl ProcessPaymentResponse {
    /// The transaction id, whether the service sent it as a string or a number.
    #[must_use]
    pub fn transaction_id(&self) -> Option<String> {
        match self.transaction_id.as_ref()? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// A committed cart line in the shape the PDF endpoint reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryCourseLine {
    pub id: String,
    pub selected_seats: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub price_per_seat: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
    pub branch: String,
    pub course_name: String,
    pub city: String,
    pub institute: String,
}

impl From<&CartLine> for SummaryCourseLine {
    fn from(line: &CartLine) -> Self {
        Self {
            id: line.id.value().to_string(),
            selected_seats: line.selected_seats,
            price_per_seat: line.price_per_seat,
            total_price: line.total_price,
            branch: line.branch.clone(),
            course_name: line.course_name.as_str().to_string(),
            city: line.city.clone(),
            institute: line.institute.clone(),
        }
    }
}

/// `POST /user/generate-pdf` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PdfSummaryRequest {
    #[serde(rename = "userData")]
    pub user_data: Value,
    #[serde(rename = "selectedCourses")]
    pub selected_courses: BTreeMap<String, SummaryCourseLine>,
}

/// Error body the remote service may send.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

// ---------------------------------------------------------------------------
// Session host
// ---------------------------------------------------------------------------

/// Catalog view with the fetch state.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogResponse {
    pub courses: Vec<Course>,
    pub is_loading: bool,
    pub error: Option<String>,
}

/// Result of a catalog fetch.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogLoadResponse {
    /// Number of courses accepted.
    pub accepted: usize,
    /// Number of records dropped as invalid.
    pub rejected: usize,
    /// Partial-failure notice, if records were dropped.
    pub notice: Option<Notice>,
}

/// Seat totals per city.
#[derive(Debug, Clone, Serialize)]
pub struct CitiesResponse {
    pub cities: BTreeMap<String, CitySeatInfo>,
}

/// Query parameters for a city listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CityCoursesQuery {
    /// Course type filter, matched case-insensitively.
    #[serde(default)]
    pub course_type: Option<String>,
}

/// Courses in a city grouped by institute.
#[derive(Debug, Clone, Serialize)]
pub struct CityCoursesResponse {
    pub city: String,
    pub institutes: BTreeMap<String, Vec<Course>>,
}

/// `PUT /api/session/step` body.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SetStepRequest {
    pub step: u8,
}

/// Outcome of a draft edit.
#[derive(Debug, Clone, Serialize)]
pub struct SelectionUpdateResponse {
    pub changed: bool,
    pub guard: GuardState,
}

/// `POST /api/navigation/attempt` body.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NavigationAttemptRequest {
    pub path: String,
}

/// Confirmation dialog content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DialogInfo {
    pub kind: DialogKind,
    pub title: String,
    pub message: String,
}

impl From<DialogKind> for DialogInfo {
    fn from(kind: DialogKind) -> Self {
        Self {
            kind,
            title: kind.title().to_string(),
            message: kind.message().to_string(),
        }
    }
}

/// Guard state after a navigation event.
#[derive(Debug, Clone, Serialize)]
pub struct NavigationResponse {
    pub decision: NavigationDecision,
    /// Destination to go to now, if navigation completes.
    pub navigate_to: Option<String>,
    pub dialog: Option<DialogInfo>,
    pub guard: GuardState,
}

/// Cart view for the review and payment screens.
#[derive(Debug, Clone, Serialize)]
pub struct CartResponse {
    #[serde(flatten)]
    pub summary: CartSummary,
}

/// Result of a successful proceed.
#[derive(Debug, Clone, Serialize)]
pub struct ProceedResponse {
    pub navigate_to: String,
    pub cart: CartSummary,
}

/// Result of an OTP request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OtpSentResponse {
    pub phone: String,
    pub notice: Notice,
}

/// `POST /api/checkout/otp/verify` body.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VerifyOtpBody {
    pub otp: String,
}

/// `POST /api/checkout/payment` body.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PaymentBody {
    #[serde(default)]
    pub payment_method: Option<String>,
}

/// Result of a payment attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentResponse {
    pub transaction_id: Option<String>,
    pub notice: Option<Notice>,
}

/// `POST /api/checkout/summary` body.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SummaryBody {
    #[serde(default)]
    pub user_data: Value,
}

/// Generic acknowledgement with a notice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoticeResponse {
    pub notice: Notice,
}
