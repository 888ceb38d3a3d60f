use serde::{Deserialize, Serialize};
use chrono::NaiveDateTime;
use sqlx::FromRow;

/// One table held by an existing booking. Times are restaurant-local.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq, Eq)]
pub struct BookedTable {
    pub booking_id: String,
    pub table_id: String,
    pub booking_time: NaiveDateTime,
}
