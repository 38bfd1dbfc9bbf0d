//! Entry CRUD handlers: create, read, update, delete, list.

use crate::error::AppError;
use crate::model::{EntryPatch, NewEntry};
use crate::response::{created, message, ok};
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::Value;

/// Any body that is absent or not parseable JSON is the same client error.
fn json_body(body: Result<Json<Value>, JsonRejection>) -> Result<Value, AppError> {
    match body {
        Ok(Json(v)) => Ok(v),
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            Err(AppError::PayloadTooLarge(rejection.body_text()))
        }
        Err(rejection) => {
            tracing::debug!(%rejection, "rejected request body");
            Err(AppError::BadRequest("Invalid input, no data provided".into()))
        }
    }
}

pub async fn list(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let entries = state.store.list().await.map_err(|e| e.during("retrieve entries"))?;
    Ok(ok(entries))
}

pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let new = NewEntry::from_body(json_body(body)?)?;
    let entry = state.store.create(new).await.map_err(|e| e.during("create entry"))?;
    tracing::info!(id = %entry.id, "entry created");
    Ok(created(entry))
}

pub async fn read(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let entry = state.store.get(&id).await.map_err(|e| e.during("retrieve entry"))?;
    Ok(ok(entry))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let patch = EntryPatch::from_body(json_body(body)?)?;
    let entry = state.store.update(&id, patch).await.map_err(|e| e.during("update entry"))?;
    tracing::info!(id = %entry.id, "entry updated");
    Ok(ok(entry))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.store.delete(&id).await.map_err(|e| e.during("delete entry"))?;
    tracing::info!(id = %id, "entry deleted");
    Ok(message("Entry deleted successfully"))
}
