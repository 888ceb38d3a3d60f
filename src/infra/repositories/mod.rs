pub mod sqlite_restaurant_repo;
pub mod sqlite_booking_repo;

pub mod postgres_restaurant_repo;
pub mod postgres_booking_repo;
