use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use std::time::Duration;
use tracing::info;

use crate::app_config::DatabaseConfig;

#[derive(Clone)]
pub struct DbClient {
    pub pool: Pool<Postgres>,
}

impl DbClient {
    /// Opens the booking pool. Handlers share it through the repositories.
    pub async fn new(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect(&config.url)
            .await?;

        info!(
            max_connections = config.max_connections,
            acquire_timeout_secs = config.acquire_timeout_secs,
            "booking database pool ready"
        );
        Ok(Self { pool })
    }

    /// Applies the booking schema: bookings, booking_items, booking_customers.
    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        info!("Applying booking schema migrations...");
        sqlx::migrate!("../migrations")
            .run(&self.pool)
            .await?;
        info!("Booking schema is up to date.");
        Ok(())
    }
}
