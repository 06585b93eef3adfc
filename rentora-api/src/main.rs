use std::net::SocketAddr;
use std::sync::Arc;
use anyhow::Context;
use rentora_api::{app, state::{AppState, AuthConfig}};
use rentora_booking::{BookingRules, BookingService};
use rentora_core::notify::LogNotifier;
use rentora_store::{DbClient, PgBookingRepository, PgCatalogRepository, PgIdentityRepository};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rentora_api=debug,rentora_booking=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = rentora_store::app_config::Config::load().context("Failed to load config")?;
    tracing::info!("Starting Rentora API on port {}", config.server.port);

    let db = DbClient::new(&config.database)
        .await
        .context("Failed to connect to Postgres")?;
    db.migrate().await.context("Failed to run migrations")?;

    let service = BookingService::new(
        Arc::new(PgBookingRepository::new(db.pool.clone())),
        Arc::new(PgCatalogRepository::new(db.pool.clone())),
        Arc::new(PgIdentityRepository::new(db.pool.clone())),
        Arc::new(LogNotifier),
        BookingRules {
            lock_minutes: config.business_rules.booking_lock_minutes,
        },
    );

    let app_state = AppState {
        bookings: Arc::new(service),
        auth: AuthConfig {
            secret: config.auth.jwt_secret.clone(),
        },
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
