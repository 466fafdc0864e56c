//! # Server Setup
//!
//! Server initialization, route registration, and HTTP server startup.
//!
//! [`start_server`] loads the configuration, connects to MongoDB and serves
//! the router built by [`create_router`] until Ctrl-C.

// region: --- Imports
use crate::handlers::{self, booked, houses, users};
use crate::middleware::mw_req_stamp::request_id;
use crate::middleware::{log_requests, stamp_req};
use crate::services::{AccountService, BookingService};
use axum::extract::FromRef;
use axum::{
    routing::{get, post},
    Router,
};
use lib_core::{BookingStore, Config, HouseStore, MongoStore, Store, UserStore};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;
// endregion: --- Imports

// region: --- AppState
/// Application state shared across all routes
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub houses: Arc<dyn HouseStore>,
    pub booked: Arc<dyn BookingStore>,
    pub accounts: Arc<AccountService>,
    pub bookings: Arc<BookingService>,
    pub config: Config,
}

impl AppState {
    /// Build the state around one store serving all three collections.
    pub fn new<S: Store + 'static>(store: Arc<S>, config: Config) -> Self {
        let users: Arc<dyn UserStore> = store.clone();
        let houses: Arc<dyn HouseStore> = store.clone();
        let booked: Arc<dyn BookingStore> = store;

        Self {
            accounts: Arc::new(AccountService::new(users.clone(), config.clone())),
            bookings: Arc::new(BookingService::new(booked.clone())),
            users,
            houses,
            booked,
            config,
        }
    }
}

impl FromRef<AppState> for Arc<dyn UserStore> {
    fn from_ref(state: &AppState) -> Self {
        state.users.clone()
    }
}

impl FromRef<AppState> for Arc<dyn HouseStore> {
    fn from_ref(state: &AppState) -> Self {
        state.houses.clone()
    }
}

impl FromRef<AppState> for Arc<dyn BookingStore> {
    fn from_ref(state: &AppState) -> Self {
        state.booked.clone()
    }
}

impl FromRef<AppState> for Arc<AccountService> {
    fn from_ref(state: &AppState) -> Self {
        state.accounts.clone()
    }
}

impl FromRef<AppState> for Arc<BookingService> {
    fn from_ref(state: &AppState) -> Self {
        state.bookings.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
// endregion: --- AppState

// region: --- Server Setup
/// Initialize and start the HTTP server
///
/// Reads configuration from the process environment; callers load `.env`
/// beforehand.
///
/// # Errors
///
/// This function will return an error if:
/// - Configuration loading or validation fails
/// - MongoDB cannot be reached
/// - Server binding fails
pub async fn start_server() -> anyhow::Result<()> {
    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;
    init_tracing(&config.log_level)?;

    info!(" GO-HOME BACKEND STARTING");
    info!(" Log level: {}", config.log_level);

    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    info!("Connecting to MongoDB...");
    let store = MongoStore::connect(&config.mongo_uri, &config.db_name).await?;

    let bind_address = config.bind_address();
    let app = create_router(AppState::new(Arc::new(store), config));

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;

    info!(" SERVER READY: http://{}", bind_address);
    log_server_info();

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!(" Server stopped");
    Ok(())
}

/// Install the global fmt subscriber filtered at `level`.
fn init_tracing(level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .with_file(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to set global tracing subscriber: {e}"))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("[SHUTDOWN] Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("[SHUTDOWN] Ctrl-C received, draining connections");
}

/// Create the main application router with all routes
pub fn create_router(state: AppState) -> Router {
    info!("[ROUTE SETUP] Registering HTTP routes...");
    Router::new()
        .route("/", get(handlers::liveness))
        .route("/users", post(users::register).get(users::list_users))
        .route("/users/login", post(users::login).get(users::get_login_user))
        .route("/users/{user}", get(users::get_user).delete(users::delete_user))
        .route("/houses", post(houses::create_house).get(houses::list_houses))
        .route(
            "/houses/{id}",
            get(houses::get_house)
                .put(houses::update_house)
                .delete(houses::delete_house),
        )
        .route("/booked", post(booked::create_booking).get(booked::list_bookings))
        .route("/booked/{id}", get(booked::get_booking).delete(booked::delete_booking))
        .fallback(|| async {
            info!("[404 HANDLER] Unmatched route - returning 404");
            (axum::http::StatusCode::NOT_FOUND, "Route not found")
        })
        .with_state(state)
        // Comprehensive request/response logging
        .layer(axum::middleware::from_fn(log_requests))
        // Tower HTTP trace layer for spans
        .layer(
            tower_http::trace::TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        request_id = %request_id(request),
                        method = %request.method(),
                        uri = %request.uri(),
                        version = ?request.version(),
                    )
                })
                .on_failure(
                    |error: tower_http::classify::ServerErrorsFailureClass,
                     latency: std::time::Duration,
                     _span: &tracing::Span| {
                        tracing::error!(
                            error = ?error,
                            latency_ms = latency.as_millis(),
                            "[HTTP FAILURE] Error: {:?}, Latency: {}ms",
                            error,
                            latency.as_millis()
                        );
                    },
                ),
        )
        // Request stamping runs outermost so the span and logs see the ID
        .layer(axum::middleware::from_fn(stamp_req))
        .layer(CorsLayer::permissive())
}

/// Log server information
fn log_server_info() {
    info!(" USERS:");
    info!("   • POST   /users");
    info!("   • POST   /users/login");
    info!("   • GET    /users?name={{name}}");
    info!("   • GET    /users/{{userName}}");
    info!("   • DELETE /users/{{id}}");
    info!(" HOUSES:");
    info!("   • POST   /houses");
    info!("   • GET    /houses?houseName={{name}}&city={{city}}");
    info!("   • GET    /houses/{{id}}");
    info!("   • PUT    /houses/{{id}}");
    info!("   • DELETE /houses/{{id}}");
    info!(" BOOKINGS:");
    info!("   • POST   /booked");
    info!("   • GET    /booked");
    info!("   • GET    /booked/{{id}}");
    info!("   • DELETE /booked/{{id}}");
    info!(" HEALTH:");
    info!("   • GET    /");
}
// endregion: --- Server Setup
