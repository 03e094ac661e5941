// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Client for the remote course service.

use crate::error::ApiError;
use crate::request_response::{
    ErrorBody, GenerateOtpRequest, GenerateOtpResponse, PdfSummaryRequest, ProcessPaymentRequest,
    ProcessPaymentResponse, VerifyOtpRequest,
};
use reqwest::{Client, Response, header};
use seat_adopt_domain::CourseRecord;
use serde_json::Value;
use std::future::Future;
use tracing::{debug, error};

/// The remote operations the checkout flows depend on.
pub trait CourseService: Send + Sync {
    /// `GET /user/courses`.
    fn fetch_courses(&self) -> impl Future<Output = Result<Vec<CourseRecord>, ApiError>> + Send;

    /// `POST /user/generate-otp`.
    fn generate_otp(
        &self,
        request: &GenerateOtpRequest,
    ) -> impl Future<Output = Result<GenerateOtpResponse, ApiError>> + Send;

    /// `POST /user/verify-otp`. Any 2xx answer means verified.
    fn verify_otp(
        &self,
        request: &VerifyOtpRequest,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;

    /// `POST /billing/process-payment`.
    fn process_payment(
        &self,
        request: &ProcessPaymentRequest,
    ) -> impl Future<Output = Result<ProcessPaymentResponse, ApiError>> + Send;

    /// `POST /user/generate-pdf`, returning the PDF bytes.
    fn generate_pdf(
        &self,
        request: &PdfSummaryRequest,
    ) -> impl Future<Output = Result<Vec<u8>, ApiError>> + Send;
}

/// [`CourseService`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpCourseService {
    client: Client,
    base_url: String,
}

/// Turns a non-2xx answer into an error carrying the service's message.
async fn check_status(response: Response, fallback: &str) -> Result<Response, ApiError> {
    let status: reqwest::StatusCode = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body: String = response.text().await.unwrap_or_default();
    let message: String = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| fallback.to_string());

    error!(status = status.as_u16(), %message, "Course service returned an error");
    Err(ApiError::Upstream {
        status: Some(status.as_u16()),
        message,
    })
}

/// Maps a transport failure to the operation's generic message.
fn transport_error(err: &reqwest::Error, fallback: &str) -> ApiError {
    error!(error = %err, "Course service request failed");
    ApiError::Upstream {
        status: None,
        message: fallback.to_string(),
    }
}

impl HttpCourseService {
    /// Creates a client for the service at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client: Client = Client::builder().build().map_err(|err| ApiError::Internal {
            message: err.to_string(),
        })?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.trim_end_matches('/'))
    }

    async fn post_json<T: serde::Serialize + Sync>(
        &self,
        path: &str,
        body: &T,
        fallback: &str,
    ) -> Result<Response, ApiError> {
        debug!(path, "POST to course service");
        let response: Response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|err| transport_error(&err, fallback))?;
        check_status(response, fallback).await
    }
}

impl CourseService for HttpCourseService {
    async fn fetch_courses(&self) -> Result<Vec<CourseRecord>, ApiError> {
        const FALLBACK: &str = "Failed to fetch courses";

        debug!("GET /user/courses");
        let response: Response = self
            .client
            .get(self.url("/user/courses"))
            .send()
            .await
            .map_err(|err| transport_error(&err, FALLBACK))?;
        let response: Response = check_status(response, FALLBACK).await?;

        let body: Value = response.json().await?;
        let Value::Array(items) = body else {
            return Err(ApiError::InvalidResponse {
                message: String::from("course list is not an array"),
            });
        };

        // Records that are not objects become empty records and are rejected
        // during validation with the rest.
        Ok(items
            .into_iter()
            .map(|item| serde_json::from_value::<CourseRecord>(item).unwrap_or_default())
            .collect())
    }

    async fn generate_otp(
        &self,
        request: &GenerateOtpRequest,
    ) -> Result<GenerateOtpResponse, ApiError> {
        let response: Response = self
            .post_json("/user/generate-otp", request, "Failed to send OTP")
            .await?;
        let text: String = response.text().await?;
        if text.trim().is_empty() {
            return Ok(GenerateOtpResponse::default());
        }
        Ok(serde_json::from_str(&text)?)
    }

    async fn verify_otp(&self, request: &VerifyOtpRequest) -> Result<(), ApiError> {
        self.post_json("/user/verify-otp", request, "Failed to verify OTP")
            .await?;
        Ok(())
    }

    async fn process_payment(
        &self,
        request: &ProcessPaymentRequest,
    ) -> Result<ProcessPaymentResponse, ApiError> {
        let response: Response = self
            .post_json(
                "/billing/process-payment",
                request,
                "Payment failed. Please try again.",
            )
            .await?;
        Ok(response.json().await?)
    }

    async fn generate_pdf(&self, request: &PdfSummaryRequest) -> Result<Vec<u8>, ApiError> {
        const FALLBACK: &str = "Failed to generate PDF";

        let response: Response = self
            .client
            .post(self.url("/user/generate-pdf"))
            .header(header::ACCEPT, "application/pdf")
            .json(request)
            .send()
            .await
            .map_err(|err| transport_error(&err, FALLBACK))?;
        let response: Response = check_status(response, FALLBACK).await?;
        Ok(response.bytes().await?.to_vec())
    }
}
