use crate::domain::models::{
    availability::SearchTimeWithTables, booking::BookedTable, restaurant::Restaurant,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

#[async_trait]
pub trait RestaurantRepository: Send + Sync {
    /// Loads the restaurant together with its tables.
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Restaurant>, AppError>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Tables held by bookings whose time falls in `[start, end]`.
    async fn list_booked_tables(&self, restaurant_id: &str, start: NaiveDateTime, end: NaiveDateTime) -> Result<Vec<BookedTable>, AppError>;
}

/// Produces candidate times around the requested one, each with the tables usable at that time.
///
/// `Ok(None)` means there is nothing to search. Domain failures come back as
/// `AppError::SearchFailure`; anything else is an unexpected failure.
#[async_trait]
pub trait TableSearch: Send + Sync {
    async fn find_available_tables(
        &self,
        day: NaiveDate,
        time: NaiveTime,
        restaurant: &Restaurant,
    ) -> Result<Option<Vec<SearchTimeWithTables>>, AppError>;
}
