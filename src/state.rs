//! Shared application state for all routes.

use crate::store::EntryStore;

#[derive(Clone)]
pub struct AppState {
    pub store: EntryStore,
}

impl AppState {
    pub fn new(store: EntryStore) -> Self {
        AppState { store }
    }
}
