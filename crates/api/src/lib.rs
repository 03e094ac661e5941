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
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod client;
mod error;
mod handlers;
mod request_response;

#[cfg(test)]
mod tests;

pub use client::{CourseService, HttpCourseService};
pub use error::ApiError;
pub use handlers::{
    AdoptionSummary, CheckoutFlow, adoption_summary, ensure_catalog, refresh_catalog,
    summary_file_name,
};
pub use request_response::{
    CartResponse, CatalogLoadResponse, CatalogResponse, CitiesResponse, CityCoursesQuery,
    CityCoursesResponse, DialogInfo, ErrorBody, GenerateOtpRequest, GenerateOtpResponse,
    NavigationAttemptRequest, NavigationResponse, NoticeResponse, OtpSentResponse, PaymentBody,
    PaymentResponse, PdfSummaryRequest, ProceedResponse, ProcessPaymentRequest,
    ProcessPaymentResponse, SelectedCourseItem, SelectionUpdateResponse, SetStepRequest,
    SummaryBody, SummaryCourseLine, VerifyOtpBody, VerifyOtpRequest,
};

/// Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;
