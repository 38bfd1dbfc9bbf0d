//! Entry CRUD routes, relative to the `/api` prefix.

use crate::handlers::entry::{create, delete as delete_handler, list, read, update};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn entry_routes(state: AppState) -> Router {
    Router::new()
        .route("/entries", get(list).post(create))
        .route("/entries/:id", get(read).put(update).delete(delete_handler))
        .with_state(state)
}
