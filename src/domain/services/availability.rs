use std::num::IntErrorKind;
use std::sync::Arc;
use chrono::{NaiveDate, NaiveTime};
use tracing::debug;
use crate::domain::models::{
    availability::{Availability, SearchTimeWithTables},
    restaurant::Restaurant,
};
use crate::domain::ports::{RestaurantRepository, TableSearch};
use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityQuery {
    pub slug: String,
    pub day: NaiveDate,
    pub time: NaiveTime,
    pub party_size: u64,
}

impl AvailabilityQuery {
    /// Every parameter must be present and parse; there is no fallback value.
    pub fn parse(
        slug: &str,
        day: Option<&str>,
        time: Option<&str>,
        party_size: Option<&str>,
    ) -> Result<Self, AppError> {
        let (Some(day), Some(time), Some(party_size)) = (non_empty(day), non_empty(time), non_empty(party_size)) else {
            return Err(AppError::InvalidInput);
        };

        Ok(Self {
            slug: slug.to_string(),
            day: parse_day(day).ok_or(AppError::InvalidInput)?,
            time: parse_time(time).ok_or(AppError::InvalidInput)?,
            party_size: parse_party_size(party_size).ok_or(AppError::InvalidInput)?,
        })
    }
}

fn non_empty(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

pub fn parse_day(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// Accepts `HH:MM`, `HH:MM:SS` and `HH:MM:SS.fff`, with an optional trailing `Z`.
pub fn parse_time(raw: &str) -> Option<NaiveTime> {
    let raw = raw.strip_suffix(['Z', 'z']).unwrap_or(raw);
    NaiveTime::parse_from_str(raw, "%H:%M:%S%.f")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .ok()
}

/// Positive integers only. Values past `u64::MAX` saturate; no restaurant seats that many.
pub fn parse_party_size(raw: &str) -> Option<u64> {
    match raw.parse::<u64>() {
        Ok(0) => None,
        Ok(n) => Some(n),
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => Some(u64::MAX),
        Err(_) => None,
    }
}

pub fn has_capacity(candidate: &SearchTimeWithTables, party_size: u64) -> bool {
    u64::try_from(candidate.total_seats()).is_ok_and(|seats| seats >= party_size)
}

/// Inclusive on both ends, compared as timestamps on `day`.
pub fn within_opening_hours(day: NaiveDate, time: NaiveTime, restaurant: &Restaurant) -> bool {
    let at = day.and_time(time);
    at >= day.and_time(restaurant.open_time) && at <= day.and_time(restaurant.close_time)
}

pub fn evaluate_candidates(
    day: NaiveDate,
    party_size: u64,
    restaurant: &Restaurant,
    candidates: &[SearchTimeWithTables],
) -> Vec<Availability> {
    candidates
        .iter()
        .map(|c| Availability {
            time: c.time,
            available: has_capacity(c, party_size),
        })
        .filter(|a| within_opening_hours(day, a.time, restaurant))
        .collect()
}

pub struct AvailabilityService {
    restaurant_repo: Arc<dyn RestaurantRepository>,
    table_search: Arc<dyn TableSearch>,
}

impl AvailabilityService {
    pub fn new(restaurant_repo: Arc<dyn RestaurantRepository>, table_search: Arc<dyn TableSearch>) -> Self {
        Self { restaurant_repo, table_search }
    }

    pub async fn check(&self, query: &AvailabilityQuery) -> Result<Vec<Availability>, AppError> {
        let restaurant = self.restaurant_repo.find_by_slug(&query.slug).await?
            .ok_or(AppError::InvalidInput)?;

        let candidates = self.table_search
            .find_available_tables(query.day, query.time, &restaurant)
            .await?
            .ok_or(AppError::InvalidInput)?;

        let availabilities = evaluate_candidates(query.day, query.party_size, &restaurant, &candidates);
        debug!(
            slug = %query.slug,
            candidates = candidates.len(),
            returned = availabilities.len(),
            "availability evaluated"
        );
        Ok(availabilities)
    }
}
