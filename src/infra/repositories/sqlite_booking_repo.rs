use crate::domain::{models::booking::BookedTable, ports::BookingRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::SqlitePool;

pub struct SqliteBookingRepo {
    pool: SqlitePool,
}

impl SqliteBookingRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingRepository for SqliteBookingRepo {
    async fn list_booked_tables(&self, restaurant_id: &str, start: NaiveDateTime, end: NaiveDateTime) -> Result<Vec<BookedTable>, AppError> {
        sqlx::query_as::<_, BookedTable>(
            "SELECT b.id AS booking_id, bt.table_id AS table_id, b.booking_time AS booking_time
             FROM bookings b
             JOIN booking_tables bt ON bt.booking_id = b.id
             WHERE b.restaurant_id = ? AND b.booking_time >= ? AND b.booking_time <= ?
             ORDER BY b.booking_time ASC"
        )
            .bind(restaurant_id)
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
