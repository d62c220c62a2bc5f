pub mod access;
pub mod analytics;
pub mod auth_service;
pub mod error;
pub mod ticket_service;
