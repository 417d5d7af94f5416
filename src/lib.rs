pub mod config;
pub mod domain;
pub mod forms;
pub mod models;
pub mod payment;
pub mod repository;
pub mod routes;
pub mod schema;
pub mod services;

/// Role granting access to the back office.
pub const SERVICE_ACCESS_ROLE: &str = "admin";
