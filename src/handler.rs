pub mod auth;
pub mod dashboard;
pub mod knowledge;
pub mod tickets;
pub mod users;
