use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use tracing::debug;
use crate::domain::models::{availability::SearchTimeWithTables, restaurant::Restaurant};
use crate::domain::ports::{BookingRepository, TableSearch};
use crate::error::{AppError, SearchError};

const MINUTES_PER_DAY: i64 = 1440;

/// Times on the search grid within `window_min` of `time`, clamped to the same day.
///
/// `time` itself must sit on the grid: whole minutes, a multiple of `step_min` from midnight.
pub fn search_times(time: NaiveTime, window_min: u32, step_min: u32) -> Result<Vec<NaiveTime>, SearchError> {
    if step_min == 0 || time.second() != 0 || time.nanosecond() != 0 {
        return Err(SearchError::NoSearchTimes);
    }

    let minute_of_day = i64::from(time.hour() * 60 + time.minute());
    let step = i64::from(step_min);
    if minute_of_day % step != 0 {
        return Err(SearchError::NoSearchTimes);
    }

    let steps = i64::from(window_min) / step;
    let times = (-steps..=steps)
        .map(|offset| minute_of_day + offset * step)
        .filter(|m| (0..MINUTES_PER_DAY).contains(m))
        .filter_map(|m| NaiveTime::from_hms_opt((m / 60) as u32, (m % 60) as u32, 0))
        .collect();

    Ok(times)
}

/// Offers every restaurant table at each search time unless a booking already holds it then.
pub struct BookingAwareTableSearch {
    booking_repo: Arc<dyn BookingRepository>,
    window_min: u32,
    step_min: u32,
}

impl BookingAwareTableSearch {
    pub fn new(booking_repo: Arc<dyn BookingRepository>, window_min: u32, step_min: u32) -> Self {
        Self { booking_repo, window_min, step_min }
    }
}

#[async_trait]
impl TableSearch for BookingAwareTableSearch {
    async fn find_available_tables(
        &self,
        day: NaiveDate,
        time: NaiveTime,
        restaurant: &Restaurant,
    ) -> Result<Option<Vec<SearchTimeWithTables>>, AppError> {
        if restaurant.tables.is_empty() {
            return Ok(None);
        }

        let times = search_times(time, self.window_min, self.step_min)?;
        let (Some(first), Some(last)) = (times.first(), times.last()) else {
            return Ok(None);
        };

        let booked = self.booking_repo
            .list_booked_tables(&restaurant.id, day.and_time(*first), day.and_time(*last))
            .await?;

        let mut held: HashMap<NaiveDateTime, HashSet<&str>> = HashMap::new();
        for b in &booked {
            held.entry(b.booking_time).or_default().insert(b.table_id.as_str());
        }
        debug!(restaurant_id = %restaurant.id, bookings = booked.len(), "loaded booked tables for search window");

        let candidates = times
            .into_iter()
            .map(|t| {
                let taken = held.get(&day.and_time(t));
                SearchTimeWithTables {
                    time: t,
                    tables: restaurant.tables
                        .iter()
                        .filter(|table| taken.is_none_or(|ids| !ids.contains(table.id.as_str())))
                        .cloned()
                        .collect(),
                }
            })
            .collect();

        Ok(Some(candidates))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::booking::BookedTable;
    use std::sync::Mutex;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 2, 3).unwrap()
    }

    #[derive(Default)]
    struct InMemoryBookings {
        rows: Vec<BookedTable>,
        requested: Mutex<Vec<(NaiveDateTime, NaiveDateTime)>>,
    }

    #[async_trait]
    impl BookingRepository for InMemoryBookings {
        async fn list_booked_tables(&self, _restaurant_id: &str, start: NaiveDateTime, end: NaiveDateTime) -> Result<Vec<BookedTable>, AppError> {
            self.requested.lock().unwrap().push((start, end));
            Ok(self.rows.iter().filter(|b| b.booking_time >= start && b.booking_time <= end).cloned().collect())
        }
    }

    #[test]
    fn test_search_times_span_window_in_steps() {
        let times = search_times(t(15, 0), 60, 30).unwrap();
        assert_eq!(times, vec![t(14, 0), t(14, 30), t(15, 0), t(15, 30), t(16, 0)]);
    }

    #[test]
    fn test_search_times_clamped_to_day() {
        assert_eq!(search_times(t(0, 0), 60, 30).unwrap(), vec![t(0, 0), t(0, 30), t(1, 0)]);
        assert_eq!(search_times(t(23, 30), 60, 30).unwrap(), vec![t(22, 30), t(23, 0), t(23, 30)]);
    }

    #[test]
    fn test_off_grid_time_is_rejected() {
        assert_eq!(search_times(t(15, 10), 60, 30), Err(SearchError::NoSearchTimes));
        assert_eq!(search_times(NaiveTime::from_hms_opt(15, 0, 30).unwrap(), 60, 30), Err(SearchError::NoSearchTimes));
        assert_eq!(search_times(t(15, 0), 60, 0), Err(SearchError::NoSearchTimes));
    }

    #[tokio::test]
    async fn test_booked_table_removed_only_at_its_time() {
        let restaurant = Restaurant::new("R".into(), "r".into(), t(9, 0), t(22, 0)).with_tables(&[2, 4]);
        let held_id = restaurant.tables[0].id.clone();
        let repo = Arc::new(InMemoryBookings {
            rows: vec![BookedTable {
                booking_id: "b1".into(),
                table_id: held_id.clone(),
                booking_time: day().and_time(t(15, 0)),
            }],
            ..Default::default()
        });
        let search = BookingAwareTableSearch::new(repo.clone(), 30, 30);

        let candidates = search.find_available_tables(day(), t(15, 0), &restaurant).await.unwrap().unwrap();
        assert_eq!(candidates.len(), 3);
        assert_eq!(candidates[0].tables.len(), 2);
        assert_eq!(candidates[1].time, t(15, 0));
        assert_eq!(candidates[1].tables.len(), 1);
        assert!(candidates[1].tables.iter().all(|tb| tb.id != held_id));
        assert_eq!(candidates[2].tables.len(), 2);

        let requested = repo.requested.lock().unwrap().clone();
        assert_eq!(requested, vec![(day().and_time(t(14, 30)), day().and_time(t(15, 30)))]);
    }

    #[tokio::test]
    async fn test_restaurant_without_tables_has_no_candidates() {
        let restaurant = Restaurant::new("R".into(), "r".into(), t(9, 0), t(22, 0));
        let search = BookingAwareTableSearch::new(Arc::new(InMemoryBookings::default()), 60, 30);
        assert!(search.find_available_tables(day(), t(15, 0), &restaurant).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_off_grid_request_is_a_search_failure() {
        let restaurant = Restaurant::new("R".into(), "r".into(), t(9, 0), t(22, 0)).with_tables(&[2]);
        let search = BookingAwareTableSearch::new(Arc::new(InMemoryBookings::default()), 60, 30);
        match search.find_available_tables(day(), t(15, 15), &restaurant).await {
            Err(AppError::SearchFailure(msg)) => assert_eq!(msg, "No times available for this party size"),
            other => panic!("expected search failure, got {:?}", other.map(|c| c.map(|v| v.len()))),
        }
    }
}
