use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, NaiveTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Restaurant {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub open_time: NaiveTime,
    pub close_time: NaiveTime,
    pub created_at: DateTime<Utc>,
    #[sqlx(skip)]
    #[serde(default)]
    pub tables: Vec<Table>,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq, Eq)]
pub struct Table {
    pub id: String,
    pub restaurant_id: String,
    pub seats: i32,
}

impl Restaurant {
    pub fn new(name: String, slug: String, open_time: NaiveTime, close_time: NaiveTime) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            slug,
            open_time,
            close_time,
            created_at: Utc::now(),
            tables: Vec::new(),
        }
    }

    pub fn with_tables(mut self, seats: &[i32]) -> Self {
        self.tables = seats.iter().map(|&s| Table::new(self.id.clone(), s)).collect();
        self
    }
}

impl Table {
    pub fn new(restaurant_id: String, seats: i32) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            restaurant_id,
            seats,
        }
    }
}
