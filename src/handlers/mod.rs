//! HTTP handlers for entry CRUD.

pub mod entry;
pub use entry::*;
