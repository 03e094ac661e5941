// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use crate::{
    ApiError, CourseService, GenerateOtpRequest, GenerateOtpResponse, PdfSummaryRequest,
    ProcessPaymentRequest, ProcessPaymentResponse, VerifyOtpRequest,
};
use seat_adopt::{MemorySnapshotStore, SelectionPatch, SelectionStore};
use seat_adopt_domain::{CourseId, CourseRecord, validate_catalog};
use serde_json::json;
use std::sync::Mutex as StdMutex;
use tokio::sync::Mutex;

pub fn course_record(id: &str, course_name: &str, city: &str, price: u32, left: u32) -> CourseRecord {
    serde_json::from_value(json!({
        "id": id,
        "course_name": course_name,
        "branch": "mechanical engineering",
        "city": city,
        "institute_name": "sati vidisha",
        "price_per_seat": price,
        "total_seats": 10,
        "left_seats": left,
        "locked_seats": 10 - left,
    }))
    .unwrap()
}

pub fn create_test_records() -> Vec<CourseRecord> {
    vec![
        course_record("1", "B.Tech", "Bhopal", 1000, 5),
        course_record("2", "Diploma", "Indore", 400, 3),
    ]
}

/// A scripted course service that records what it was asked.
pub struct FakeCourseService {
    pub courses: Result<Vec<CourseRecord>, ApiError>,
    pub otp: Result<GenerateOtpResponse, ApiError>,
    pub verify: Result<(), ApiError>,
    pub payment: Result<ProcessPaymentResponse, ApiError>,
    pub pdf: Vec<u8>,
    pub fetches: StdMutex<usize>,
    pub otp_requests: StdMutex<Vec<GenerateOtpRequest>>,
    pub verify_requests: StdMutex<Vec<VerifyOtpRequest>>,
    pub payment_requests: StdMutex<Vec<ProcessPaymentRequest>>,
    pub pdf_requests: StdMutex<Vec<PdfSummaryRequest>>,
}

impl Default for FakeCourseService {
    fn default() -> Self {
        Self {
            courses: Ok(create_test_records()),
            otp: Ok(GenerateOtpResponse {
                phone: Some(String::from("******1234")),
            }),
            verify: Ok(()),
            payment: Ok(ProcessPaymentResponse {
                transaction_id: Some(json!("txn_001")),
            }),
            pdf: b"%PDF-1.7".to_vec(),
            fetches: StdMutex::new(0),
            otp_requests: StdMutex::new(Vec::new()),
            verify_requests: StdMutex::new(Vec::new()),
            payment_requests: StdMutex::new(Vec::new()),
            pdf_requests: StdMutex::new(Vec::new()),
        }
    }
}

impl CourseService for FakeCourseService {
    async fn fetch_courses(&self) -> Result<Vec<CourseRecord>, ApiError> {
        *self.fetches.lock().unwrap() += 1;
        self.courses.clone()
    }

    async fn generate_otp(
        &self,
        request: &GenerateOtpRequest,
    ) -> Result<GenerateOtpResponse, ApiError> {
        self.otp_requests.lock().unwrap().push(request.clone());
        self.otp.clone()
    }

    async fn verify_otp(&self, request: &VerifyOtpRequest) -> Result<(), ApiError> {
        self.verify_requests.lock().unwrap().push(request.clone());
        self.verify.clone()
    }

    async fn process_payment(
        &self,
        request: &ProcessPaymentRequest,
    ) -> Result<ProcessPaymentResponse, ApiError> {
        self.payment_requests.lock().unwrap().push(request.clone());
        self.payment.clone()
    }

    async fn generate_pdf(&self, request: &PdfSummaryRequest) -> Result<Vec<u8>, ApiError> {
        self.pdf_requests.lock().unwrap().push(request.clone());
        Ok(self.pdf.clone())
    }
}

pub fn create_test_store() -> Mutex<SelectionStore<MemorySnapshotStore>> {
    Mutex::new(SelectionStore::new(MemorySnapshotStore::new()))
}

/// A store whose cart holds 2 seats of course 1 and 1 seat of course 2.
pub fn create_store_with_cart() -> Mutex<SelectionStore<MemorySnapshotStore>> {
    let mut store: SelectionStore<MemorySnapshotStore> =
        SelectionStore::new(MemorySnapshotStore::new());
    store.set_catalog(validate_catalog(&create_test_records()).unwrap().catalog);
    for (id, seats) in [("1", "2"), ("2", "1")] {
        store
            .set_selection(
                &CourseId::new(id),
                SelectionPatch {
                    is_selected: None,
                    seats: Some(seats.to_string()),
                },
            )
            .unwrap();
    }
    store.proceed().unwrap();
    Mutex::new(store)
}
