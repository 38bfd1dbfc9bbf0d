//! SED tracker backend: REST CRUD over log entries stored in SQLite.

pub mod config;
pub mod error;
pub mod handlers;
pub mod model;
pub mod response;
pub mod routes;
pub mod state;
pub mod store;

pub use config::Settings;
pub use error::{AppError, ConfigError};
pub use model::{Entry, EntryPatch, NewEntry};
pub use routes::{app, common_routes, common_routes_with_ready, entry_routes};
pub use state::AppState;
pub use store::{ensure_database_exists, ensure_entry_table, EntryStore};
