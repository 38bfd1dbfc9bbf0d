//! Router assembly: service routes at the root, entry routes under `/api`.

mod common;
mod entry;
pub use common::{common_routes, common_routes_with_ready};
pub use entry::entry_routes;

use crate::config::Settings;
use crate::state::AppState;
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;

/// The full application router.
pub fn app(state: AppState, settings: &Settings) -> Router {
    Router::new()
        .merge(common_routes_with_ready(state.clone()))
        .nest("/api", entry_routes(state))
        .layer(RequestBodyLimitLayer::new(settings.body_limit_bytes))
}
