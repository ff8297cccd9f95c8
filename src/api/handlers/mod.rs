pub mod auth;
pub mod bookings;
pub mod calendar;
pub mod drive;
pub mod expenses;
