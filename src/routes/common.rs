//! Service routes: banner, liveness, readiness.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;

pub const BANNER: &str = "Hello from SED Tracker Backend!";

/// Body of `/health` and `/ready`. `database` is only reported by readiness.
#[derive(Serialize)]
struct ServiceStatus {
    service: &'static str,
    version: &'static str,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    database: Option<&'static str>,
}

impl ServiceStatus {
    fn new(status: &'static str, database: Option<&'static str>) -> Self {
        ServiceStatus {
            service: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            status,
            database,
        }
    }
}

async fn banner() -> &'static str {
    BANNER
}

async fn health() -> Json<ServiceStatus> {
    Json(ServiceStatus::new("ok", None))
}

async fn ready(State(state): State<AppState>) -> (StatusCode, Json<ServiceStatus>) {
    match state.store.ping().await {
        Ok(()) => (StatusCode::OK, Json(ServiceStatus::new("ok", Some("ok")))),
        Err(e) => {
            tracing::warn!(error = %e, "readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ServiceStatus::new("degraded", Some("unavailable"))),
            )
        }
    }
}

/// Stateless routes: GET / and GET /health.
pub fn common_routes() -> Router {
    Router::new().route("/", get(banner)).route("/health", get(health))
}

/// Stateless routes plus GET /ready, which pings the entry store.
pub fn common_routes_with_ready(state: AppState) -> Router {
    Router::new()
        .route("/ready", get(ready))
        .with_state(state)
        .merge(common_routes())
}
