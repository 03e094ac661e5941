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

mod session;

#[cfg(test)]
mod tests;

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use clap::Parser;
use seat_adopt::{
    CartSummary, CoreError, GuardState, NavigationDecision, NavigationGuard, Notice,
    SelectionPatch, SelectionStore, SessionState, SnapshotStore, StoreState,
};
use seat_adopt_api::{
    AdoptionSummary, ApiError, CartResponse, CatalogLoadResponse, CatalogResponse, CheckoutFlow,
    CitiesResponse, CityCoursesQuery, CityCoursesResponse, CourseService, DialogInfo,
    HttpCourseService, NavigationAttemptRequest, NavigationResponse, NoticeResponse,
    OtpSentResponse, PaymentBody, PaymentResponse, ProceedResponse, SelectionUpdateResponse,
    SetStepRequest, SummaryBody, VerifyOtpBody, adoption_summary, ensure_catalog,
    refresh_catalog,
};
use seat_adopt_domain::{Catalog, Course, CourseId, CourseType};
use seat_adopt_persistence::Persistence;
use serde::{Deserialize, Serialize};
use session::DonorId;
use std::collections::BTreeMap;
use std::sync::Arc;
use time::{Date, OffsetDateTime};
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, error, info, warn};

/// Path of the screen a session starts on.
const HOME_PATH: &str = "/";

/// Path of the cart review screen.
const CART_PATH: &str = "/cart";

/// Seat Adopt Server - local session host for the seat adoption workflow
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Address to bind the server to
    #[arg(short, long, default_value = "127.0.0.1")]
    bind: String,

    /// Base URL of the remote course service
    #[arg(short, long, env = "SEAT_ADOPT_API_URL")]
    api_url: String,
}

/// Application state shared across handlers.
///
/// Locks are always taken in the order store, guard. The checkout lock is
/// only ever tried, never waited on.
struct AppState<S> {
    /// Selection state, persisted through `SQLite`.
    store: Arc<Mutex<SelectionStore<Persistence>>>,
    /// Unsaved-changes guard for the active screen.
    guard: Arc<Mutex<NavigationGuard>>,
    /// OTP and payment progress. Held for the whole of a checkout request.
    checkout: Arc<Mutex<CheckoutFlow>>,
    /// The remote course service.
    service: Arc<S>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            guard: Arc::clone(&self.guard),
            checkout: Arc::clone(&self.checkout),
            service: Arc::clone(&self.service),
        }
    }
}

impl<S> AppState<S> {
    fn new(store: SelectionStore<Persistence>, service: S) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            guard: Arc::new(Mutex::new(NavigationGuard::new(HOME_PATH))),
            checkout: Arc::new(Mutex::new(CheckoutFlow::new())),
            service: Arc::new(service),
        }
    }
}

/// API response for the session view.
#[derive(Debug, Clone, Serialize)]
struct SessionResponse {
    /// Drafts, cart and current step.
    session: SessionState,
    /// The screen the guard is watching.
    current_path: String,
    /// The guard state.
    guard: GuardState,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match &err {
            ApiError::DomainRuleViolation { .. } | ApiError::Precondition { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::InFlight => StatusCode::CONFLICT,
            ApiError::Upstream { .. } | ApiError::InvalidResponse { .. } => {
                StatusCode::BAD_GATEWAY
            }
            ApiError::Internal { .. } => {
                error!(error = %err, "Internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<CoreError> for HttpError {
    fn from(err: CoreError) -> Self {
        Self::from(ApiError::from(err))
    }
}

fn catalog_response(state: &StoreState) -> CatalogResponse {
    CatalogResponse {
        courses: state
            .catalog
            .as_ref()
            .map(|catalog| catalog.courses().to_vec())
            .unwrap_or_default(),
        is_loading: state.is_loading,
        error: state.error.clone(),
    }
}

fn session_response(
    store: &SelectionStore<Persistence>,
    guard: &NavigationGuard,
) -> SessionResponse {
    SessionResponse {
        session: store.get().session.clone(),
        current_path: guard.current_path().to_string(),
        guard: guard.state().clone(),
    }
}

fn navigation_response(
    decision: NavigationDecision,
    navigate_to: Option<String>,
    guard: &NavigationGuard,
) -> NavigationResponse {
    NavigationResponse {
        decision,
        navigate_to,
        dialog: guard.dialog_kind().map(DialogInfo::from),
        guard: guard.state().clone(),
    }
}

fn loaded_catalog(store: &SelectionStore<Persistence>) -> Result<&Catalog, HttpError> {
    store
        .get()
        .catalog
        .as_ref()
        .ok_or_else(|| HttpError::from(CoreError::CatalogNotLoaded))
}

/// Claims the checkout flow, refusing when another checkout request holds it.
fn claim_checkout(checkout: &Mutex<CheckoutFlow>) -> Result<MutexGuard<'_, CheckoutFlow>, HttpError> {
    checkout.try_lock().map_err(|_| {
        warn!("Refusing checkout request while another is running");
        HttpError::from(ApiError::InFlight)
    })
}

/// Handler for GET `/api/catalog` endpoint.
///
/// Loads the catalog on first use. A failed fetch is reported in the
/// `error` field so the caller can offer a retry.
async fn handle_get_catalog<S>(
    AxumState(app_state): AxumState<AppState<S>>,
) -> Json<CatalogResponse>
where
    S: CourseService + 'static,
{
    if let Err(err) = ensure_catalog(app_state.service.as_ref(), app_state.store.as_ref()).await {
        warn!(error = %err, "Catalog unavailable");
    }

    let store = app_state.store.lock().await;
    Json(catalog_response(store.get()))
}

/// Handler for POST `/api/catalog/refresh` endpoint.
async fn handle_refresh_catalog<S>(
    AxumState(app_state): AxumState<AppState<S>>,
) -> Result<Json<CatalogLoadResponse>, HttpError>
where
    S: CourseService + 'static,
{
    info!("Handling catalog refresh");
    let load: CatalogLoadResponse =
        refresh_catalog(app_state.service.as_ref(), app_state.store.as_ref()).await?;
    Ok(Json(load))
}

/// Handler for GET `/api/catalog/cities` endpoint.
async fn handle_list_cities<S>(
    AxumState(app_state): AxumState<AppState<S>>,
) -> Result<Json<CitiesResponse>, HttpError>
where
    S: CourseService + 'static,
{
    let store = app_state.store.lock().await;
    let catalog: &Catalog = loaded_catalog(&store)?;
    Ok(Json(CitiesResponse {
        cities: catalog.city_seat_info(),
    }))
}

/// Handler for GET `/api/catalog/cities/{city}` endpoint.
///
/// Lists the courses in a city grouped by institute, optionally narrowed
/// to one course type.
async fn handle_city_courses<S>(
    AxumState(app_state): AxumState<AppState<S>>,
    Path(city): Path<String>,
    Query(query): Query<CityCoursesQuery>,
) -> Result<Json<CityCoursesResponse>, HttpError>
where
    S: CourseService + 'static,
{
    let course_type: Option<CourseType> = match query.course_type.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(value) => Some(CourseType::parse_loose(value).ok_or_else(|| {
            HttpError::from(ApiError::InvalidInput {
                field: String::from("course_type"),
                message: format!("Unknown course type: {value}"),
            })
        })?),
    };

    let store = app_state.store.lock().await;
    let catalog: &Catalog = loaded_catalog(&store)?;
    let institutes: BTreeMap<String, Vec<Course>> = catalog
        .courses_by_institute(&city, course_type)
        .into_iter()
        .map(|(label, courses)| (label, courses.into_iter().cloned().collect()))
        .collect();

    Ok(Json(CityCoursesResponse { city, institutes }))
}

/// Handler for GET `/api/session` endpoint.
async fn handle_get_session<S>(
    AxumState(app_state): AxumState<AppState<S>>,
) -> Json<SessionResponse>
where
    S: CourseService + 'static,
{
    let store = app_state.store.lock().await;
    let guard = app_state.guard.lock().await;
    Json(session_response(&store, &guard))
}

/// Handler for PUT `/api/session/step` endpoint.
async fn handle_set_step<S>(
    AxumState(app_state): AxumState<AppState<S>>,
    Json(req): Json<SetStepRequest>,
) -> Result<Json<SessionResponse>, HttpError>
where
    S: CourseService + 'static,
{
    let mut store = app_state.store.lock().await;
    store.set_current_step(req.step)?;
    let guard = app_state.guard.lock().await;
    Ok(Json(session_response(&store, &guard)))
}

/// Handler for PUT `/api/selections/{course_id}` endpoint.
///
/// An edit that changes the drafts marks the guard dirty. A rejected edit
/// leaves both untouched.
async fn handle_update_selection<S>(
    AxumState(app_state): AxumState<AppState<S>>,
    Path(course_id): Path<String>,
    Json(patch): Json<SelectionPatch>,
) -> Result<Json<SelectionUpdateResponse>, HttpError>
where
    S: CourseService + 'static,
{
    debug!(%course_id, ?patch, "Handling selection update");
    let course_id: CourseId = CourseId::new(&course_id);

    let mut store = app_state.store.lock().await;
    let changed: bool = store.set_selection(&course_id, patch)?;

    let mut guard = app_state.guard.lock().await;
    if changed {
        guard.mark_dirty();
    }

    Ok(Json(SelectionUpdateResponse {
        changed,
        guard: guard.state().clone(),
    }))
}

/// Handler for DELETE `/api/selections` endpoint.
async fn handle_reset_selections<S>(
    AxumState(app_state): AxumState<AppState<S>>,
) -> Result<Json<SelectionUpdateResponse>, HttpError>
where
    S: CourseService + 'static,
{
    let mut store = app_state.store.lock().await;
    let changed: bool = !store.get().session.selections.is_empty();
    store.reset_drafts()?;

    let mut guard = app_state.guard.lock().await;
    guard.mark_clean();

    Ok(Json(SelectionUpdateResponse {
        changed,
        guard: guard.state().clone(),
    }))
}

/// Handler for POST `/api/selections/load` endpoint.
///
/// Seeds the drafts of a selection screen from the cart.
async fn handle_load_selections<S>(
    AxumState(app_state): AxumState<AppState<S>>,
) -> Result<Json<SessionResponse>, HttpError>
where
    S: CourseService + 'static,
{
    let mut store = app_state.store.lock().await;
    store.load_drafts_from_committed()?;

    let mut guard = app_state.guard.lock().await;
    guard.mark_clean();
    Ok(Json(session_response(&store, &guard)))
}

/// Handler for POST `/api/selections/proceed` endpoint.
///
/// Merges the drafts into the cart and moves to the cart screen.
async fn handle_proceed<S>(
    AxumState(app_state): AxumState<AppState<S>>,
) -> Result<Json<ProceedResponse>, HttpError>
where
    S: CourseService + 'static,
{
    let mut store = app_state.store.lock().await;
    let cart: CartSummary = store.proceed()?;

    let mut guard = app_state.guard.lock().await;
    guard.enter(CART_PATH);

    info!(
        lines = cart.line_count,
        total = %cart.total_amount,
        "Proceeding to cart"
    );

    Ok(Json(ProceedResponse {
        navigate_to: CART_PATH.to_string(),
        cart,
    }))
}

/// Handler for POST `/api/navigation/attempt` endpoint.
async fn handle_attempt_navigation<S>(
    AxumState(app_state): AxumState<AppState<S>>,
    Json(req): Json<NavigationAttemptRequest>,
) -> Result<Json<NavigationResponse>, HttpError>
where
    S: CourseService + 'static,
{
    let mut store = app_state.store.lock().await;
    let mut guard = app_state.guard.lock().await;

    let decision: NavigationDecision = guard.on_attempt_navigate(&req.path);
    let navigate_to: Option<String> = match decision {
        NavigationDecision::Allow => {
            if guard.current_path() != req.path {
                store.reset_drafts()?;
                guard.enter(req.path.as_str());
            }
            Some(req.path)
        }
        NavigationDecision::Block => None,
    };

    Ok(Json(navigation_response(decision, navigate_to, &guard)))
}

/// Completes a blocked navigation and drops the drafts.
///
/// The guard stays blocked if the drafts cannot be dropped.
fn confirm_navigation<P: SnapshotStore>(
    store: &mut SelectionStore<P>,
    guard: &mut NavigationGuard,
) -> Result<Option<String>, CoreError> {
    let previous: NavigationGuard = guard.clone();
    let navigate_to: Option<String> = guard.confirm();
    if let Some(path) = &navigate_to {
        info!(%path, "Discarding unsaved drafts on confirmed navigation");
        if let Err(err) = store.reset_drafts() {
            *guard = previous;
            return Err(err);
        }
    }
    Ok(navigate_to)
}

/// Handler for POST `/api/navigation/confirm` endpoint.
///
/// Completes a blocked navigation. Unsaved drafts are dropped.
async fn handle_confirm_navigation<S>(
    AxumState(app_state): AxumState<AppState<S>>,
) -> Result<Json<NavigationResponse>, HttpError>
where
    S: CourseService + 'static,
{
    let mut store = app_state.store.lock().await;
    let mut guard = app_state.guard.lock().await;

    let navigate_to: Option<String> = confirm_navigation(&mut store, &mut guard)?;

    Ok(Json(navigation_response(
        NavigationDecision::Allow,
        navigate_to,
        &guard,
    )))
}

/// Handler for POST `/api/navigation/cancel` endpoint.
async fn handle_cancel_navigation<S>(
    AxumState(app_state): AxumState<AppState<S>>,
) -> Json<NavigationResponse>
where
    S: CourseService + 'static,
{
    let mut guard = app_state.guard.lock().await;
    guard.cancel();
    Json(navigation_response(NavigationDecision::Block, None, &guard))
}

/// Handler for GET `/api/cart` endpoint.
async fn handle_get_cart<S>(
    AxumState(app_state): AxumState<AppState<S>>,
) -> Result<Json<CartResponse>, HttpError>
where
    S: CourseService + 'static,
{
    let store = app_state.store.lock().await;
    Ok(Json(CartResponse {
        summary: store.cart_summary()?,
    }))
}

/// Handler for DELETE `/api/cart` endpoint.
async fn handle_reset_cart<S>(
    AxumState(app_state): AxumState<AppState<S>>,
) -> Result<Json<CartResponse>, HttpError>
where
    S: CourseService + 'static,
{
    let mut store = app_state.store.lock().await;
    store.reset()?;
    Ok(Json(CartResponse {
        summary: store.cart_summary()?,
    }))
}

/// Handler for POST `/api/checkout/otp` endpoint.
async fn handle_send_otp<S>(
    AxumState(app_state): AxumState<AppState<S>>,
    DonorId(user_id): DonorId,
) -> Result<Json<OtpSentResponse>, HttpError>
where
    S: CourseService + 'static,
{
    let mut flow = claim_checkout(&app_state.checkout)?;
    let sent: OtpSentResponse = flow
        .send_otp(
            app_state.service.as_ref(),
            app_state.store.as_ref(),
            &user_id,
        )
        .await?;
    Ok(Json(sent))
}

/// Handler for POST `/api/checkout/otp/verify` endpoint.
async fn handle_verify_otp<S>(
    AxumState(app_state): AxumState<AppState<S>>,
    DonorId(user_id): DonorId,
    Json(req): Json<VerifyOtpBody>,
) -> Result<Json<NoticeResponse>, HttpError>
where
    S: CourseService + 'static,
{
    let mut flow = claim_checkout(&app_state.checkout)?;
    let notice: Notice = flow
        .verify_otp(app_state.service.as_ref(), &user_id, &req.otp)
        .await?;
    Ok(Json(NoticeResponse { notice }))
}

/// Handler for POST `/api/checkout/payment` endpoint.
async fn handle_payment<S>(
    AxumState(app_state): AxumState<AppState<S>>,
    DonorId(user_id): DonorId,
    Json(req): Json<PaymentBody>,
) -> Result<Json<PaymentResponse>, HttpError>
where
    S: CourseService + 'static,
{
    let mut flow = claim_checkout(&app_state.checkout)?;
    let payment: PaymentResponse = flow
        .process_payment(
            app_state.service.as_ref(),
            app_state.store.as_ref(),
            &user_id,
            req.payment_method.as_deref(),
        )
        .await?;
    Ok(Json(payment))
}

/// Handler for POST `/api/checkout/summary` endpoint.
///
/// Answers with the PDF as an attachment.
async fn handle_summary<S>(
    AxumState(app_state): AxumState<AppState<S>>,
    DonorId(user_id): DonorId,
    Json(req): Json<SummaryBody>,
) -> Result<Response, HttpError>
where
    S: CourseService + 'static,
{
    info!(%user_id, "Generating adoption summary");
    let today: Date = OffsetDateTime::now_utc().date();
    let summary: AdoptionSummary = adoption_summary(
        app_state.service.as_ref(),
        app_state.store.as_ref(),
        req.user_data,
        today,
    )
    .await?;

    let disposition: String = format!("attachment; filename=\"{}\"", summary.file_name);
    Ok((
        [
            (header::CONTENT_TYPE, String::from("application/pdf")),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        summary.bytes,
    )
        .into_response())
}

/// Builds the application router with all endpoints.
fn build_router<S>(app_state: AppState<S>) -> Router
where
    S: CourseService + 'static,
{
    Router::new()
        .route("/api/catalog", get(handle_get_catalog::<S>))
        .route("/api/catalog/refresh", post(handle_refresh_catalog::<S>))
        .route("/api/catalog/cities", get(handle_list_cities::<S>))
        .route("/api/catalog/cities/{city}", get(handle_city_courses::<S>))
        .route("/api/session", get(handle_get_session::<S>))
        .route("/api/session/step", put(handle_set_step::<S>))
        .route(
            "/api/selections",
            delete(handle_reset_selections::<S>),
        )
        .route("/api/selections/load", post(handle_load_selections::<S>))
        .route("/api/selections/proceed", post(handle_proceed::<S>))
        .route(
            "/api/selections/{course_id}",
            put(handle_update_selection::<S>),
        )
        .route(
            "/api/navigation/attempt",
            post(handle_attempt_navigation::<S>),
        )
        .route(
            "/api/navigation/confirm",
            post(handle_confirm_navigation::<S>),
        )
        .route(
            "/api/navigation/cancel",
            post(handle_cancel_navigation::<S>),
        )
        .route(
            "/api/cart",
            get(handle_get_cart::<S>).delete(handle_reset_cart::<S>),
        )
        .route("/api/checkout/otp", post(handle_send_otp::<S>))
        .route("/api/checkout/otp/verify", post(handle_verify_otp::<S>))
        .route("/api/checkout/payment", post(handle_payment::<S>))
        .route("/api/checkout/summary", post(handle_summary::<S>))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Seat Adopt Server");

    // Initialize persistence (in-memory or file-based based on CLI argument)
    let persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    let mut store: SelectionStore<Persistence> = SelectionStore::new(persistence);
    if store.restore()? {
        info!("Resumed saved selection");
    }
    store.subscribe(|state| {
        debug!(
            drafts = state.session.selections.len(),
            cart_lines = state.session.selected_courses.len(),
            current_step = state.session.current_step,
            "Selection state changed"
        );
    });

    let service: HttpCourseService = HttpCourseService::new(args.api_url.as_str())?;
    info!(api_url = %service.base_url(), "Using course service");

    let app: Router = build_router(AppState::new(store, service));

    // Bind to address
    let addr: std::net::SocketAddr = format!("{}:{}", args.bind, args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
