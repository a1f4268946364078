//! Athenaeum Server - Library Management Backend

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use athenaeum_server::{
    api,
    config::AppConfig,
    repository::Repository,
    services::{overdue::OverdueSweeper, Services},
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
        .unwrap_or_else(|_| {
            format!("athenaeum_server={},tower_http=debug", config.logging.level).into()
        });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Athenaeum Server v{}", env!("CARGO_PKG_VERSION"));

    // Create database connection pool
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await
        .expect("Failed to connect to database");

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("Database migrations completed");

    // Save server address before moving config
    let server_host = config.server.host.clone();
    let server_port = config.server.port;

    // Create repository and services
    let repository = Repository::new(pool);
    let services = Services::new(repository.clone(), &config);

    // Spawn the overdue sweep with its own lifecycle
    if config.overdue.enabled {
        let sweeper = OverdueSweeper::new(
            repository,
            services.notifier.clone(),
            Duration::from_secs(config.overdue.check_interval_hours * 3600),
        );
        sweeper.spawn();
        tracing::info!(
            "Overdue sweep scheduled every {} hour(s)",
            config.overdue.check_interval_hours
        );
    }

    // Create application state
    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
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
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let max_upload_bytes = state.config.import.max_file_size_mb * 1024 * 1024;

    let api_routes = Router::new()
        // Books (catalog + bulk import)
        .route("/books", get(api::books::list_books))
        .route("/books", post(api::books::create_book))
        .route("/books/bulk", get(api::books::list_book_summaries))
        .route("/books/bulk", post(api::books::bulk_import))
        .route("/books/upload", post(api::books::upload_books))
        .route("/books/bulk-delete", post(api::books::bulk_delete_books))
        .route("/books/:id", put(api::books::update_book))
        .route("/books/:id", delete(api::books::delete_book))
        // Students
        .route("/students", get(api::students::list_students))
        .route("/students", post(api::students::create_student))
        .route("/students/:roll_no", put(api::students::update_student))
        .route("/students/:roll_no", delete(api::students::delete_student))
        // Borrow records
        .route("/borrowed", get(api::borrowed::list_borrows))
        .route("/borrowed", post(api::borrowed::create_borrow))
        .route("/borrowed/bulk-delete", post(api::borrowed::bulk_delete_borrows))
        .route("/borrowed/:id", put(api::borrowed::update_borrow))
        .route("/borrowed/:id", delete(api::borrowed::delete_borrow))
        // Google Books proxy
        .route("/google-books", post(api::google_books::search))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(state.clone());

    // Health endpoints live outside /api
    let health = Router::new()
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check));

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api", api_routes)
        .merge(health)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
