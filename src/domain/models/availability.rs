use serde::{Deserialize, Serialize};
use chrono::NaiveTime;
use crate::domain::models::restaurant::Table;

#[derive(Debug, Clone)]
pub struct SearchTimeWithTables {
    pub time: NaiveTime,
    pub tables: Vec<Table>,
}

impl SearchTimeWithTables {
    pub fn total_seats(&self) -> i64 {
        self.tables.iter().map(|t| t.seats as i64).sum()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Availability {
    pub time: NaiveTime,
    pub available: bool,
}
