//! Lectern Server - Library Management System
//!
//! A Rust REST API server for library management backed by a JSON-file
//! record store.

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lectern_server::{
    api,
    config::AppConfig,
    ratelimit::RateLimiter,
    services::Services,
    store::Store,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("lectern_server={},tower_http=debug", config.logging.level).into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Lectern Server v{}", env!("CARGO_PKG_VERSION"));

    // Open the record store, creating the data directory on first run
    let store = Store::new(&config.storage.data_dir)?;

    tracing::info!("Record store opened at {}", config.storage.data_dir);

    // Save server address before moving config
    let server_host = config.server.host.clone();
    let server_port = config.server.port;

    // Create services and seed the default administrator account
    let services = Services::new(store, config.auth.clone());
    services.users.seed_admin()?;

    let rate_limiter = RateLimiter::new(
        config.rate_limit.max_requests,
        config.rate_limit.window_secs,
    );

    // Create application state
    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
        rate_limiter: Arc::new(rate_limiter),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(
        server_host.parse().expect("Invalid host address"),
        server_port,
    );

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Create the application router with all routes
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Authentication
        .route("/auth/login", post(api::auth::login))
        .route("/auth/register", post(api::auth::register))
        .route("/auth/me", get(api::auth::me))
        // Books (catalog)
        .route("/books", get(api::books::list_books))
        .route("/books", post(api::books::create_book))
        .route("/books/:isbn", get(api::books::get_book))
        .route("/books/:isbn", put(api::books::update_book))
        .route("/books/:isbn", delete(api::books::delete_book))
        // Members
        .route("/members", get(api::members::list_members))
        .route("/members", post(api::members::create_member))
        .route("/members/:email", get(api::members::get_member))
        .route("/members/:email", put(api::members::update_member))
        .route("/members/:email", delete(api::members::delete_member))
        // Transactions
        .route("/transactions", get(api::loans::list_transactions))
        .route("/transactions", post(api::loans::borrow_book))
        .route("/transactions/:id", get(api::loans::get_transaction))
        .route("/transactions/:id", delete(api::loans::delete_transaction))
        .route("/transactions/:id/return", post(api::loans::return_book))
        // Reservations
        .route("/reservations", get(api::reservations::list_reservations))
        .route("/reservations", post(api::reservations::create_reservation))
        .route("/reservations/:id", get(api::reservations::get_reservation))
        .route("/reservations/:id", put(api::reservations::update_reservation))
        .route(
            "/reservations/:id/cancel",
            post(api::reservations::cancel_reservation),
        )
        // Users
        .route("/users", get(api::users::list_users))
        .route("/users/:id", put(api::users::update_user))
        .route("/users/:id", delete(api::users::delete_user))
        // Reports
        .route("/reports", get(api::reports::get_reports))
        .route(
            "/reports/download/:report_type",
            get(api::reports::download_report),
        )
        // Export
        .route(
            "/export/:data_type/:format",
            get(api::export::export_collection),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api::rate_limit_middleware,
        ))
        .with_state(state);

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
