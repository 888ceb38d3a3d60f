use std::sync::Arc;
use crate::domain::ports::{BookingRepository, RestaurantRepository};
use crate::domain::services::availability::AvailabilityService;

#[derive(Clone)]
pub struct AppState {
    pub restaurant_repo: Arc<dyn RestaurantRepository>,
    pub booking_repo: Arc<dyn BookingRepository>,
    pub availability_service: Arc<AvailabilityService>,
}
