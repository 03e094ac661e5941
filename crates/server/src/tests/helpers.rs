// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use crate::{AppState, build_router};
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use seat_adopt::{MemorySnapshotStore, SelectionStore, SnapshotStore};
use seat_adopt_api::{
    ApiError, CourseService, GenerateOtpRequest, GenerateOtpResponse, PdfSummaryRequest,
    ProcessPaymentRequest, ProcessPaymentResponse, VerifyOtpRequest,
};
use seat_adopt_domain::CourseRecord;
use seat_adopt_persistence::Persistence;
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tower::ServiceExt;

/// A course service answering from fixed data.
pub struct StubCourseService {
    /// Records served by the catalog fetch, or `None` to fail it.
    pub courses: Option<Vec<Value>>,
}

impl Default for StubCourseService {
    fn default() -> Self {
        Self {
            courses: Some(vec![
                json!({
                    "id": 1, "course_name": "B.Tech", "branch": "civil engineering",
                    "city": "Bhopal", "institute_name": "sati vidisha", "price_per_seat": 1000,
                    "total_seats": 10, "left_seats": 5, "locked_seats": 5
                }),
                json!({
                    "id": 2, "course_name": "B.Tech", "branch": "mechanical",
                    "city": "Bhopal", "institute_name": "", "price_per_seat": "1500",
                    "total_seats": 4, "left_seats": 3, "locked_seats": 1
                }),
                json!({
                    "id": 3, "course_name": "ITI", "branch": "fitter",
                    "city": "Indore", "institute_name": "govt iti", "price_per_seat": 300,
                    "total_seats": 8, "left_seats": 0, "locked_seats": 8
                }),
            ]),
        }
    }
}

impl CourseService for StubCourseService {
    async fn fetch_courses(&self) -> Result<Vec<CourseRecord>, ApiError> {
        let Some(courses) = &self.courses else {
            return Err(ApiError::Upstream {
                status: Some(503),
                message: String::from("Failed to fetch courses"),
            });
        };
        Ok(courses
            .iter()
            .map(|value| serde_json::from_value(value.clone()).unwrap())
            .collect())
    }

    async fn generate_otp(
        &self,
        _request: &GenerateOtpRequest,
    ) -> Result<GenerateOtpResponse, ApiError> {
        Ok(GenerateOtpResponse {
            phone: Some(String::from("******4321")),
        })
    }

    async fn verify_otp(&self, request: &VerifyOtpRequest) -> Result<(), ApiError> {
        if request.otp == "000000" {
            return Err(ApiError::Upstream {
                status: Some(400),
                message: String::from("Invalid OTP"),
            });
        }
        Ok(())
    }

    async fn process_payment(
        &self,
        _request: &ProcessPaymentRequest,
    ) -> Result<ProcessPaymentResponse, ApiError> {
        Ok(ProcessPaymentResponse {
            transaction_id: Some(json!("txn_777")),
        })
    }

    async fn generate_pdf(&self, _request: &PdfSummaryRequest) -> Result<Vec<u8>, ApiError> {
        Ok(b"%PDF-1.4 summary".to_vec())
    }
}

/// Helper to create test app state with in-memory persistence.
pub fn create_test_app_state() -> AppState<StubCourseService> {
    create_app_state_with(StubCourseService::default())
}

pub fn create_app_state_with(service: StubCourseService) -> AppState<StubCourseService> {
    let persistence: Persistence =
        Persistence::new_in_memory().expect("Failed to create in-memory persistence");
    AppState::new(SelectionStore::new(persistence), service)
}

pub fn create_test_router() -> (AppState<StubCourseService>, Router) {
    let app_state: AppState<StubCourseService> = create_test_app_state();
    let app: Router = build_router(app_state.clone());
    (app_state, app)
}

/// Sends one request and returns the status and JSON body (`Null` when the
/// body is empty or not JSON).
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
    user_id: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user_id) = user_id {
        builder = builder.header("X-User-Id", user_id);
    }
    let request: Request<Body> = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status: StatusCode = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

/// Loads the catalog and commits 2 seats of course 1 and 1 seat of course 2.
pub async fn fill_cart(app: &Router) {
    let (status, _) = send(app, "GET", "/api/catalog", None, None).await;
    assert_eq!(status, StatusCode::OK);
    for (id, seats) in [("1", "2"), ("2", "1")] {
        let (status, _) = send(
            app,
            "PUT",
            &format!("/api/selections/{id}"),
            Some(json!({ "seats": seats })),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }
    let (status, _) = send(app, "POST", "/api/selections/proceed", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[derive(Debug)]
pub struct StorageUnavailable;

impl std::fmt::Display for StorageUnavailable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "storage unavailable")
    }
}

impl std::error::Error for StorageUnavailable {}

/// Snapshot store whose writes fail while the shared flag is set.
pub struct SwitchableSnapshotStore {
    inner: MemorySnapshotStore,
    failing: Arc<AtomicBool>,
}

impl SwitchableSnapshotStore {
    pub fn new(failing: Arc<AtomicBool>) -> Self {
        Self {
            inner: MemorySnapshotStore::new(),
            failing,
        }
    }
}

impl SnapshotStore for SwitchableSnapshotStore {
    type Error = StorageUnavailable;

    fn load(&mut self, key: &str) -> Result<Option<String>, Self::Error> {
        self.inner.load(key).map_err(|never| match never {})
    }

    fn save(&mut self, key: &str, body: &str, schema_version: u32) -> Result<(), Self::Error> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StorageUnavailable);
        }
        self.inner
            .save(key, body, schema_version)
            .map_err(|never| match never {})
    }

    fn remove(&mut self, key: &str) -> Result<(), Self::Error> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StorageUnavailable);
        }
        self.inner.remove(key).map_err(|never| match never {})
    }
}
