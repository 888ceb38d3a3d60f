use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::domain::ports::{BookingRepository, RestaurantRepository};
use crate::domain::services::{availability::AvailabilityService, table_search::BookingAwareTableSearch};
use crate::error::AppError;
use crate::state::AppState;
use crate::infra::repositories::{
    postgres_booking_repo::PostgresBookingRepo, postgres_restaurant_repo::PostgresRestaurantRepo,
    sqlite_booking_repo::SqliteBookingRepo, sqlite_restaurant_repo::SqliteRestaurantRepo,
};

pub async fn bootstrap_state(config: &Config) -> Result<AppState, AppError> {
    let database_url = &config.database_url;

    let (restaurant_repo, booking_repo): (Arc<dyn RestaurantRepository>, Arc<dyn BookingRepository>) =
        if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
            info!("Initializing PostgreSQL connection...");

            let opts: PgConnectOptions = database_url.parse()?;
            let opts = opts.log_statements(LevelFilter::Debug)
                .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

            let pool = PgPoolOptions::new()
                .max_connections(10)
                .connect_with(opts)
                .await?;

            run_postgres_migrations(&pool).await?;

            let restaurant_repo: Arc<dyn RestaurantRepository> = Arc::new(PostgresRestaurantRepo::new(pool.clone()));
            let booking_repo: Arc<dyn BookingRepository> = Arc::new(PostgresBookingRepo::new(pool));
            (restaurant_repo, booking_repo)
        } else {
            info!("Initializing SQLite connection with WAL Mode...");

            let opts = SqliteConnectOptions::from_str(database_url)?
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal)
                .busy_timeout(Duration::from_secs(5))
                .log_statements(LevelFilter::Debug)
                .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

            let pool = SqlitePoolOptions::new()
                .max_connections(5)
                .connect_with(opts)
                .await?;

            run_sqlite_migrations(&pool).await?;

            let restaurant_repo: Arc<dyn RestaurantRepository> = Arc::new(SqliteRestaurantRepo::new(pool.clone()));
            let booking_repo: Arc<dyn BookingRepository> = Arc::new(SqliteBookingRepo::new(pool));
            (restaurant_repo, booking_repo)
        };

    Ok(build_state(config, restaurant_repo, booking_repo))
}

/// Wires the default booking-aware table search over the given repositories.
pub fn build_state(
    config: &Config,
    restaurant_repo: Arc<dyn RestaurantRepository>,
    booking_repo: Arc<dyn BookingRepository>,
) -> AppState {
    let table_search = Arc::new(BookingAwareTableSearch::new(
        booking_repo.clone(),
        config.search_window_min,
        config.search_step_min,
    ));
    let availability_service = Arc::new(AvailabilityService::new(restaurant_repo.clone(), table_search));

    AppState {
        restaurant_repo,
        booking_repo,
        availability_service,
    }
}

pub async fn run_postgres_migrations(pool: &PgPool) -> Result<(), AppError> {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .map_err(|e| AppError::Database(e.into()))
}

pub async fn run_sqlite_migrations(pool: &SqlitePool) -> Result<(), AppError> {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .map_err(|e| AppError::Database(e.into()))
}
