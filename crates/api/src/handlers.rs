// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Catalog loading and the checkout flows.
//!
//! The store lock is never held across a remote call: each flow reads what
//! it needs, releases the lock, awaits the service, then locks again to
//! apply the outcome.

use crate::client::CourseService;
use crate::error::ApiError;
use crate::request_response::{
    CatalogLoadResponse, GenerateOtpRequest, GenerateOtpResponse, OtpSentResponse,
    PaymentResponse, PdfSummaryRequest, ProcessPaymentRequest, ProcessPaymentResponse,
    SelectedCourseItem, SummaryCourseLine, VerifyOtpRequest,
};
use rust_decimal::Decimal;
use seat_adopt::{CommittedSet, Notice, SelectionStore, SnapshotStore, total_amount};
use seat_adopt_domain::{
    CatalogValidation, CourseRecord, Otp, PaymentMethod, validate_catalog,
};
use serde_json::Value;
use std::collections::BTreeMap;
use std::str::FromStr;
use time::Date;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Fetches, validates and installs the catalog.
///
/// # Errors
///
/// Returns an error if the fetch fails or no record is valid. The store
/// records the failure for display with a retry control.
pub async fn refresh_catalog<S, P>(
    service: &S,
    store: &Mutex<SelectionStore<P>>,
) -> Result<CatalogLoadResponse, ApiError>
where
    S: CourseService,
    P: SnapshotStore + Send,
{
    store.lock().await.set_loading(true);

    let records: Vec<CourseRecord> = match service.fetch_courses().await {
        Ok(records) => records,
        Err(err) => {
            warn!(error = %err, "Catalog fetch failed");
            store.lock().await.set_error(err.to_string());
            return Err(err);
        }
    };

    let validation: CatalogValidation = match validate_catalog(&records) {
        Ok(validation) => validation,
        Err(err) => {
            warn!(error = %err, records = records.len(), "Catalog has no valid course");
            store.lock().await.set_error(err.to_string());
            return Err(err.into());
        }
    };

    for reason in &validation.rejected {
        warn!(%reason, "Dropped invalid course record");
    }

    let rejected: usize = validation.rejected.len();
    let accepted: usize = validation.catalog.len();
    store.lock().await.set_catalog(validation.catalog);

    let notice: Option<Notice> = (rejected > 0).then(|| {
        Notice::warning(format!(
            "{rejected} course records were invalid and have been skipped"
        ))
    });
    Ok(CatalogLoadResponse {
        accepted,
        rejected,
        notice,
    })
}

/// Loads the catalog only if none is loaded yet.
///
/// # Returns
///
/// `None` when a catalog was already present.
///
/// # Errors
///
/// See [`refresh_catalog`].
pub async fn ensure_catalog<S, P>(
    service: &S,
    store: &Mutex<SelectionStore<P>>,
) -> Result<Option<CatalogLoadResponse>, ApiError>
where
    S: CourseService,
    P: SnapshotStore + Send,
{
    let loaded: bool = store.lock().await.get().catalog.is_some();
    if loaded {
        return Ok(None);
    }
    refresh_catalog(service, store).await.map(Some)
}

fn checkout_items(
    lines: &CommittedSet,
) -> Result<(Vec<SelectedCourseItem>, Decimal), ApiError> {
    let items: Vec<SelectedCourseItem> = lines.values().map(SelectedCourseItem::from).collect();
    Ok((items, total_amount(lines.values())?))
}

async fn committed_lines<P>(store: &Mutex<SelectionStore<P>>) -> CommittedSet
where
    P: SnapshotStore + Send,
{
    store.lock().await.get().session.selected_courses.clone()
}

/// Per-session checkout progress.
///
/// Callers hold this behind a lock and refuse a second request while one is
/// running.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutFlow {
    phone: Option<String>,
    otp_sent: bool,
    verified: bool,
}

impl CheckoutFlow {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            phone: None,
            otp_sent: false,
            verified: false,
        }
    }

    /// Phone number the last OTP was sent to.
    #[must_use]
    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    #[must_use]
    pub const fn otp_sent(&self) -> bool {
        self.otp_sent
    }

    #[must_use]
    pub const fn is_verified(&self) -> bool {
        self.verified
    }

    /// Forgets OTP and verification progress.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Requests an OTP for the committed cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart is empty or the service fails.
    pub async fn send_otp<S, P>(
        &mut self,
        service: &S,
        store: &Mutex<SelectionStore<P>>,
        user_id: &str,
    ) -> Result<OtpSentResponse, ApiError>
    where
        S: CourseService,
        P: SnapshotStore + Send,
    {
        let lines: CommittedSet = committed_lines(store).await;
        if lines.is_empty() {
            return Err(ApiError::Precondition {
                message: String::from("Please select courses before proceeding to payment"),
            });
        }

        let (selected_courses, total_price): (Vec<SelectedCourseItem>, Decimal) =
            checkout_items(&lines)?;
        let request: GenerateOtpRequest = GenerateOtpRequest {
            user_id: user_id.to_string(),
            selected_courses,
            total_price,
        };

        let response: GenerateOtpResponse = service.generate_otp(&request).await?;
        let phone: String = response.phone.unwrap_or_default();
        info!(user_id, lines = lines.len(), "OTP sent");

        self.phone = Some(phone.clone());
        self.otp_sent = true;
        self.verified = false;

        Ok(OtpSentResponse {
            phone,
            notice: Notice::success("OTP sent successfully!"),
        })
    }

    /// Verifies the OTP the user entered.
    ///
    /// # Errors
    ///
    /// Returns an error if the OTP is not six digits, no OTP was requested,
    /// or the service rejects it.
    pub async fn verify_otp<S>(
        &mut self,
        service: &S,
        user_id: &str,
        otp: &str,
    ) -> Result<Notice, ApiError>
    where
        S: CourseService,
    {
        let otp: Otp = Otp::parse(otp)?;
        if !self.otp_sent {
            return Err(ApiError::Precondition {
                message: String::from("Please request an OTP first"),
            });
        }

        let request: VerifyOtpRequest = VerifyOtpRequest {
            otp: otp.value().to_string(),
            user_id: user_id.to_string(),
        };
        service.verify_otp(&request).await?;

        info!(user_id, "OTP verified");
        self.verified = true;
        Ok(Notice::success("OTP verified successfully!"))
    }

    /// Pays for the committed cart.
    ///
    /// On a response carrying a transaction id the cart is reset.
    ///
    /// # Errors
    ///
    /// Returns an error if no method is chosen, the method is unknown, the
    /// OTP was not verified, the cart is empty, or the service fails.
    pub async fn process_payment<S, P>(
        &mut self,
        service: &S,
        store: &Mutex<SelectionStore<P>>,
        user_id: &str,
        payment_method: Option<&str>,
    ) -> Result<PaymentResponse, ApiError>
    where
        S: CourseService,
        P: SnapshotStore + Send,
    {
        let method: &str = payment_method
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .ok_or_else(|| ApiError::Precondition {
                message: String::from("Please select a payment method"),
            })?;
        let method: PaymentMethod = PaymentMethod::from_str(method)?;

        if !self.verified {
            return Err(ApiError::Precondition {
                message: String::from("Please verify your phone number first"),
            });
        }

        let lines: CommittedSet = committed_lines(store).await;
        if lines.is_empty() {
            return Err(ApiError::Precondition {
                message: String::from("No courses selected for payment"),
            });
        }

        let (selected_courses, total): (Vec<SelectedCourseItem>, Decimal) =
            checkout_items(&lines)?;
        let request: ProcessPaymentRequest = ProcessPaymentRequest {
            payment_method: method.as_str().to_string(),
            user_id: user_id.to_string(),
            selected_courses,
            total_amount: total,
        };

        let response: ProcessPaymentResponse = service.process_payment(&request).await?;
        let Some(transaction_id) = response.transaction_id() else {
            warn!(user_id, "Payment response carried no transaction id");
            return Ok(PaymentResponse {
                transaction_id: None,
                notice: None,
            });
        };

        info!(user_id, %transaction_id, %total, "Payment completed");
        store.lock().await.reset()?;
        self.reset();

        Ok(PaymentResponse {
            transaction_id: Some(transaction_id),
            notice: Some(Notice::success("Payment successful!")),
        })
    }
}

/// A generated adoption summary document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdoptionSummary {
    /// Suggested download file name.
    pub file_name: String,
    /// PDF bytes.
    pub bytes: Vec<u8>,
}

/// Download name of the adoption summary generated on `date`.
#[must_use]
pub fn summary_file_name(date: Date) -> String {
    format!(
        "adoption_summary_{:04}-{:02}-{:02}.pdf",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

/// Generates the adoption summary PDF for the committed cart.
///
/// # Errors
///
/// Returns an error if the service fails.
pub async fn adoption_summary<S, P>(
    service: &S,
    store: &Mutex<SelectionStore<P>>,
    user_data: Value,
    today: Date,
) -> Result<AdoptionSummary, ApiError>
where
    S: CourseService,
    P: SnapshotStore + Send,
{
    let lines: CommittedSet = committed_lines(store).await;
    let selected_courses: BTreeMap<String, SummaryCourseLine> = lines
        .iter()
        .map(|(id, line)| (id.value().to_string(), SummaryCourseLine::from(line)))
        .collect();

    let request: PdfSummaryRequest = PdfSummaryRequest {
        user_data,
        selected_courses,
    };
    let bytes: Vec<u8> = service.generate_pdf(&request).await?;
    info!(bytes = bytes.len(), "Adoption summary generated");

    Ok(AdoptionSummary {
        file_name: summary_file_name(today),
        bytes,
    })
}
