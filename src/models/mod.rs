pub mod booking;
pub mod common;
pub mod expense;
pub mod user;

pub use booking::*;
pub use expense::*;
pub use user::*;
