pub mod admin;
pub mod error;
pub mod feed;
pub mod repos;
pub mod session;
pub mod uploads;
