#![doc = "The `taskminder` library crate."]
#![doc = ""]
#![doc = "Authentication (registration, login, the token-checking request gate),"]
#![doc = "the ownership-scoped task store and the HTTP routes. The binary in"]
#![doc = "`main.rs` wires these together around a PostgreSQL pool."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod response;
pub mod routes;
pub mod store;

pub use crate::error::AppError;
pub use crate::routes::AppState;
