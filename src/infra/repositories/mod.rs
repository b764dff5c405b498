pub mod postgres_booking_repo;
pub mod sqlite_booking_repo;
