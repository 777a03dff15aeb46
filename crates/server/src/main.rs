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
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
};
use clap::Parser;
use proclamation::{RegistrationStore, StoreConfig, TypeSelection};
use proclamation_api::{
    AddAttendeeRequest, AddAttendeeResponse, ApiError, AttendeeFieldsRequest,
    BypassReservationResponse, CreateBypassReservationRequest, ListEventsRequest,
    MockPaymentAuthorizer, Navigation, OrderSummary, PaymentConfirmation, RegistrationView,
    RemoveAttendeeResponse, ResolveRecoveryRequest, SelectRegistrationTypeRequest,
    SetAgreeToTermsRequest, StepChangeResponse, SubmitPaymentRequest, UpdateBillingRequest,
    add_attendee, add_primary_attendee, advance, clear_bypass_reservation, clear_registration,
    create_bypass_reservation, get_bypass_reservation, get_registration, list_events,
    list_packages, list_ticket_definitions, order_summary, remove_attendee, resolve_recovery,
    select_registration_type, set_agree_to_terms, submit_payment, update_attendee,
    update_billing_details,
};
use proclamation_persistence::{Event, Package, Persistence, PersistenceError, TicketDefinition};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};


/// Grand Proclamation registration server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` record store. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Path to the `SQLite` file holding local drafts. If not provided, drafts
    /// live in memory.
    #[arg(long)]
    draft_store: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Quiet period before a draft change is saved, in milliseconds
    #[arg(long, default_value_t = 250)]
    save_debounce_ms: u64,

    /// Lifetime of a bypass reservation, in days
    #[arg(long, default_value_t = 3)]
    bypass_expiry_days: i64,

    /// Load the default event catalog if the record store has none
    #[arg(long)]
    seed_catalog: bool,
}

impl Args {
    const fn store_config(&self) -> StoreConfig {
        StoreConfig::new(
            Duration::from_millis(self.save_debounce_ms),
            time::Duration::days(self.bypass_expiry_days),
        )
    }
}

/// The one registration session served by this process.
struct Session {
    /// The in-progress registration, saved to the local draft store.
    registration: RegistrationStore<Persistence>,
    /// The record store holding the catalog and paid registrations.
    records: Persistence,
    payments: MockPaymentAuthorizer,
}

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    session: Arc<Mutex<Session>>,
}

impl AppState {
    fn new(registration: RegistrationStore<Persistence>, records: Persistence) -> Self {
        Self {
            session: Arc::new(Mutex::new(Session {
                registration,
                records,
                payments: MockPaymentAuthorizer::new(),
            })),
        }
    }
}

/// Query parameters for listing ticket definitions.
#[derive(Debug, Deserialize)]
struct TicketDefinitionsQuery {
    /// Restrict to one event.
    event_id: Option<String>,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
    /// Every problem blocking a step, when the error is a validation failure.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    errors: Vec<String>,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
    errors: Vec<String>,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
            errors: self.errors,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match &err {
            ApiError::DomainRuleViolation { .. } | ApiError::ValidationFailed { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::StepUnavailable { .. } => StatusCode::CONFLICT,
            ApiError::PaymentDeclined { .. } => StatusCode::PAYMENT_REQUIRED,
            ApiError::Internal { message } => {
                error!(error = %message, "Internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let errors: Vec<String> = match &err {
            ApiError::ValidationFailed { errors, .. } => errors.clone(),
            _ => Vec::new(),
        };
        Self {
            status,
            message: err.to_string(),
            errors,
        }
    }
}

impl From<PersistenceError> for HttpError {
    fn from(err: PersistenceError) -> Self {
        error!(error = %err, "Persistence error");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: format!("Persistence error: {err}"),
            errors: Vec::new(),
        }
    }
}

// ============================================================================
// Registration
// ============================================================================

async fn handle_get_registration(
    AxumState(app_state): AxumState<AppState>,
) -> Json<RegistrationView> {
    let session = app_state.session.lock().await;
    Json(get_registration(&session.registration))
}

async fn handle_select_registration_type(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<SelectRegistrationTypeRequest>,
) -> Result<Json<TypeSelection>, HttpError> {
    info!(registration_type = %req.registration_type, "Handling select_registration_type request");
    let mut session = app_state.session.lock().await;
    let selection: TypeSelection =
        select_registration_type(&mut session.registration, &req, Instant::now())?;
    Ok(Json(selection))
}

async fn handle_resolve_recovery(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<ResolveRecoveryRequest>,
) -> Result<Json<TypeSelection>, HttpError> {
    info!(choice = %req.choice, "Handling resolve_recovery request");
    let mut session = app_state.session.lock().await;
    let selection: TypeSelection =
        resolve_recovery(&mut session.registration, &req, Instant::now())?;
    Ok(Json(selection))
}

async fn handle_clear_registration(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<RegistrationView>, HttpError> {
    info!("Handling clear_registration request");
    let mut session = app_state.session.lock().await;
    Ok(Json(clear_registration(
        &mut session.registration,
        Instant::now(),
    )?))
}

async fn handle_add_attendee(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<AddAttendeeRequest>,
) -> Result<(StatusCode, Json<AddAttendeeResponse>), HttpError> {
    info!(attendee_type = %req.attendee_type, "Handling add_attendee request");
    let mut session = app_state.session.lock().await;
    let response: AddAttendeeResponse =
        add_attendee(&mut session.registration, req, Instant::now())?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn handle_add_primary_attendee(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<RegistrationView>, HttpError> {
    let mut session = app_state.session.lock().await;
    Ok(Json(add_primary_attendee(
        &mut session.registration,
        Instant::now(),
    )?))
}

async fn handle_update_attendee(
    AxumState(app_state): AxumState<AppState>,
    Path(attendee_id): Path<String>,
    Json(req): Json<AttendeeFieldsRequest>,
) -> Result<Json<RegistrationView>, HttpError> {
    debug!(%attendee_id, "Handling update_attendee request");
    let mut session = app_state.session.lock().await;
    Ok(Json(update_attendee(
        &mut session.registration,
        &attendee_id,
        req,
        Instant::now(),
    )?))
}

async fn handle_remove_attendee(
    AxumState(app_state): AxumState<AppState>,
    Path(attendee_id): Path<String>,
) -> Result<Json<RemoveAttendeeResponse>, HttpError> {
    info!(%attendee_id, "Handling remove_attendee request");
    let mut session = app_state.session.lock().await;
    Ok(Json(remove_attendee(
        &mut session.registration,
        &attendee_id,
        Instant::now(),
    )?))
}

async fn handle_update_billing(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<UpdateBillingRequest>,
) -> Result<Json<RegistrationView>, HttpError> {
    let mut session = app_state.session.lock().await;
    Ok(Json(update_billing_details(
        &mut session.registration,
        req,
        Instant::now(),
    )?))
}

async fn handle_set_agree_to_terms(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<SetAgreeToTermsRequest>,
) -> Result<Json<RegistrationView>, HttpError> {
    let mut session = app_state.session.lock().await;
    Ok(Json(set_agree_to_terms(
        &mut session.registration,
        req,
        Instant::now(),
    )?))
}

async fn navigate(
    app_state: &AppState,
    navigation: Navigation,
) -> Result<Json<StepChangeResponse>, HttpError> {
    debug!(?navigation, "Handling navigation request");
    let mut session = app_state.session.lock().await;
    let response: StepChangeResponse =
        advance(&mut session.registration, navigation, Instant::now())?;
    info!(from = %response.from, to = %response.to, "Step changed");
    Ok(Json(response))
}

async fn handle_next_step(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<StepChangeResponse>, HttpError> {
    navigate(&app_state, Navigation::Next).await
}

async fn handle_prev_step(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<StepChangeResponse>, HttpError> {
    navigate(&app_state, Navigation::Prev).await
}

async fn handle_go_to_step(
    AxumState(app_state): AxumState<AppState>,
    Path(step): Path<u8>,
) -> Result<Json<StepChangeResponse>, HttpError> {
    navigate(&app_state, Navigation::GoTo(step)).await
}

// ============================================================================
// Checkout
// ============================================================================

async fn handle_order_summary(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<OrderSummary>, HttpError> {
    let mut guard = app_state.session.lock().await;
    let session: &mut Session = &mut guard;
    Ok(Json(order_summary(
        session.registration.state(),
        &mut session.records,
    )?))
}

async fn handle_submit_payment(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<SubmitPaymentRequest>,
) -> Result<Json<PaymentConfirmation>, HttpError> {
    info!("Handling submit_payment request");
    let mut guard = app_state.session.lock().await;
    let session: &mut Session = &mut guard;
    let confirmation: PaymentConfirmation = submit_payment(
        &mut session.registration,
        &mut session.records,
        &mut session.payments,
        &req,
        Instant::now(),
    )?;
    info!(
        registration_id = confirmation.registration_id,
        draft_id = %confirmation.draft_id,
        "Registration paid"
    );
    Ok(Json(confirmation))
}

// ============================================================================
// Catalog
// ============================================================================

async fn handle_list_events(
    AxumState(app_state): AxumState<AppState>,
    Query(req): Query<ListEventsRequest>,
) -> Result<Json<Vec<Event>>, HttpError> {
    let mut session = app_state.session.lock().await;
    Ok(Json(list_events(&mut session.records, req)?))
}

async fn handle_list_packages(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<Vec<Package>>, HttpError> {
    let mut session = app_state.session.lock().await;
    Ok(Json(list_packages(&mut session.records)?))
}

async fn handle_list_ticket_definitions(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<TicketDefinitionsQuery>,
) -> Result<Json<Vec<TicketDefinition>>, HttpError> {
    let mut session = app_state.session.lock().await;
    Ok(Json(list_ticket_definitions(
        &mut session.records,
        query.event_id.as_deref(),
    )?))
}

// ============================================================================
// Bypass reservation
// ============================================================================

async fn handle_create_bypass_reservation(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<CreateBypassReservationRequest>,
) -> Result<(StatusCode, Json<BypassReservationResponse>), HttpError> {
    let mut session = app_state.session.lock().await;
    let response: BypassReservationResponse =
        create_bypass_reservation(&mut session.registration, req, OffsetDateTime::now_utc())?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn handle_get_bypass_reservation(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<BypassReservationResponse>, HttpError> {
    let mut session = app_state.session.lock().await;
    Ok(Json(get_bypass_reservation(
        &mut session.registration,
        OffsetDateTime::now_utc(),
    )?))
}

async fn handle_clear_bypass_reservation(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<BypassReservationResponse>, HttpError> {
    let mut session = app_state.session.lock().await;
    Ok(Json(clear_bypass_reservation(
        &mut session.registration,
        OffsetDateTime::now_utc(),
    )?))
}

fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/registration", get(handle_get_registration))
        .route("/registration/type", post(handle_select_registration_type))
        .route("/registration/recovery", post(handle_resolve_recovery))
        .route("/registration/clear", post(handle_clear_registration))
        .route("/registration/attendees", post(handle_add_attendee))
        .route(
            "/registration/attendees/primary",
            post(handle_add_primary_attendee),
        )
        .route(
            "/registration/attendees/{attendee_id}",
            patch(handle_update_attendee).delete(handle_remove_attendee),
        )
        .route("/registration/billing", post(handle_update_billing))
        .route("/registration/terms", post(handle_set_agree_to_terms))
        .route("/registration/step/next", post(handle_next_step))
        .route("/registration/step/prev", post(handle_prev_step))
        .route("/registration/step/{step}", post(handle_go_to_step))
        .route("/registration/summary", get(handle_order_summary))
        .route("/registration/payment", post(handle_submit_payment))
        .route("/events", get(handle_list_events))
        .route("/packages", get(handle_list_packages))
        .route("/ticket_definitions", get(handle_list_ticket_definitions))
        .route(
            "/reservations/bypass",
            post(handle_create_bypass_reservation)
                .get(handle_get_bypass_reservation)
                .delete(handle_clear_bypass_reservation),
        )
        .with_state(app_state)
}

/// Writes draft saves once their debounce period has passed.
fn spawn_draft_saver(app_state: AppState, period: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker: tokio::time::Interval = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let mut session = app_state.session.lock().await;
            if session.registration.flush_due(Instant::now()) {
                debug!("Draft saved");
            }
        }
    })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Could not listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}

fn open_store(path: Option<&str>, label: &str) -> Result<Persistence, PersistenceError> {
    if let Some(db_path) = path {
        info!("Using file-based {} at: {}", label, db_path);
        Persistence::new_with_file(db_path)
    } else {
        info!("Using in-memory {}", label);
        Persistence::new_in_memory()
    }
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

    info!("Initializing Grand Proclamation registration server");

    let mut records: Persistence = open_store(args.database.as_deref(), "record store")?;
    if args.seed_catalog && records.seed_default_catalog()? {
        info!("Seeded default event catalog");
    }

    let drafts: Persistence = open_store(args.draft_store.as_deref(), "draft store")?;
    let config: StoreConfig = args.store_config();
    let mut registration: RegistrationStore<Persistence> = RegistrationStore::new(drafts, config);
    if registration.initialize(None) {
        info!("Resumed saved registration");
    }

    let app_state: AppState = AppState::new(registration, records);
    let saver: tokio::task::JoinHandle<()> =
        spawn_draft_saver(app_state.clone(), config.save_debounce.max(Duration::from_millis(50)));

    // Build router
    let app: Router = build_router(app_state.clone());

    // Bind to address
    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    saver.abort();
    if app_state.session.lock().await.registration.flush() {
        info!("Saved pending draft on shutdown");
    }

    Ok(())
}
