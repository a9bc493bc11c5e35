//! Stockroom - Inventory and Invoicing Backend Server
//!
//! REST API for managing a store's catalog, stock levels, replenishment
//! orders, and customer invoicing.

use axum::{routing::get, Router};
use sqlx::postgres::PgPoolOptions;
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::sync::mpsc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod handlers;
mod middleware;
mod routes;
mod services;

pub use config::Config;

use services::notification::{spawn_dispatcher, Notification, NotificationClient};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub config: Arc<Config>,
    notifications: mpsc::Sender<Notification>,
}

impl AppState {
    /// Queue a notification for background delivery; never blocks a request.
    pub fn notify(&self, notification: Notification) {
        if let Err(err) = self.notifications.try_send(notification) {
            tracing::warn!(error = %err, "notification channel unavailable; message dropped");
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stockroom_server=debug,tower_http=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::load()?;

    tracing::info!("Starting Stockroom Server");
    tracing::info!("Environment: {}", config.environment);

    // Create database connection pool
    tracing::info!("Connecting to database...");
    let db_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .acquire_timeout(Duration::from_secs(30))
        .connect(&config.database.url)
        .await?;

    tracing::info!("Database connection established");

    // Run migrations in development
    if config.environment == "development" {
        tracing::info!("Running database migrations...");
        sqlx::migrate!("./migrations").run(&db_pool).await?;
        tracing::info!("Migrations completed");

        // First login needs an account; seed one if the table is empty.
        services::UserService::new(db_pool.clone())
            .ensure_seed_user("admin", "admin@stockroom.local", "stockroom")
            .await?;
    }

    // Start the notification dispatcher
    let (notification_tx, notification_rx) = mpsc::channel(64);
    let client = NotificationClient::from_config(&config.notification);
    spawn_dispatcher(client, notification_rx);

    // Create application state
    let state = AppState {
        db: db_pool,
        config: Arc::new(config.clone()),
        notifications: notification_tx,
    };

    // Build application
    let app = create_app(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes and middleware
fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .nest("/api/v1", routes::api_routes(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Stockroom Inventory API v1.0"
}
