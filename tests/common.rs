use table_availability::{
    api::router::create_router,
    state::AppState,
    config::Config,
    domain::models::restaurant::Restaurant,
    domain::ports::TableSearch,
    domain::services::availability::AvailabilityService,
    infra::factory::{build_state, run_sqlite_migrations},
    infra::repositories::{
        sqlite_booking_repo::SqliteBookingRepo,
        sqlite_restaurant_repo::SqliteRestaurantRepo,
    },
};
use axum::{body::Body, http::Request, response::Response, Router};
use chrono::{NaiveDateTime, NaiveTime, Utc};
use serde_json::Value;
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, Pool, Sqlite};
use std::str::FromStr;
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
}

#[allow(dead_code)]
impl TestApp {
    pub async fn new() -> Self {
        Self::build(None, 60).await
    }

    /// Default wiring with a different search window on either side of the requested time.
    pub async fn with_search_window(window_min: u32) -> Self {
        Self::build(None, window_min).await
    }

    /// Same wiring, but candidate times come from `table_search` instead of the bookings table.
    pub async fn with_table_search(table_search: Arc<dyn TableSearch>) -> Self {
        Self::build(Some(table_search), 60).await
    }

    async fn build(table_search: Option<Arc<dyn TableSearch>>, search_window_min: u32) -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        run_sqlite_migrations(&pool)
            .await
            .expect("Failed to migrate test db");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            search_window_min,
            search_step_min: 30,
        };

        let restaurant_repo = Arc::new(SqliteRestaurantRepo::new(pool.clone()));
        let mut state = build_state(&config, restaurant_repo.clone(), Arc::new(SqliteBookingRepo::new(pool.clone())));
        if let Some(search) = table_search {
            state.availability_service = Arc::new(AvailabilityService::new(restaurant_repo, search));
        }
        let state = Arc::new(state);

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
        }
    }

    pub async fn seed_restaurant(&self, slug: &str, open: &str, close: &str, seats: &[i32]) -> Restaurant {
        let restaurant = Restaurant::new(
            format!("Restaurant {}", slug),
            slug.to_string(),
            NaiveTime::from_str(open).unwrap(),
            NaiveTime::from_str(close).unwrap(),
        ).with_tables(seats);

        sqlx::query("INSERT INTO restaurants (id, name, slug, open_time, close_time, created_at) VALUES (?, ?, ?, ?, ?, ?)")
            .bind(&restaurant.id)
            .bind(&restaurant.name)
            .bind(&restaurant.slug)
            .bind(restaurant.open_time)
            .bind(restaurant.close_time)
            .bind(restaurant.created_at)
            .execute(&self.pool)
            .await
            .unwrap();

        for table in &restaurant.tables {
            sqlx::query("INSERT INTO restaurant_tables (id, restaurant_id, seats) VALUES (?, ?, ?)")
                .bind(&table.id)
                .bind(&table.restaurant_id)
                .bind(table.seats)
                .execute(&self.pool)
                .await
                .unwrap();
        }

        restaurant
    }

    pub async fn seed_booking(&self, restaurant_id: &str, at: NaiveDateTime, people: i32, table_ids: &[&str]) {
        let booking_id = Uuid::new_v4().to_string();
        sqlx::query("INSERT INTO bookings (id, restaurant_id, number_of_people, booking_time, booker_email, created_at) VALUES (?, ?, ?, ?, ?, ?)")
            .bind(&booking_id)
            .bind(restaurant_id)
            .bind(people)
            .bind(at)
            .bind("guest@example.com")
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .unwrap();

        for table_id in table_ids {
            sqlx::query("INSERT INTO booking_tables (booking_id, table_id) VALUES (?, ?)")
                .bind(&booking_id)
                .bind(*table_id)
                .execute(&self.pool)
                .await
                .unwrap();
        }
    }

    pub async fn get(&self, uri: &str) -> Response {
        self.router.clone().oneshot(
            Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap()
        ).await.unwrap()
    }
}

#[allow(dead_code)]
pub async fn parse_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
    }
}
