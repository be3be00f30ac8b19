use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::registry::{RedirectEntry, RegistryError, SaveOutcome};
use crate::routing::{trim_trailing_slash, Redirect, Resolution};

#[derive(Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
}

pub async fn get_status() -> Json<SystemStatus> {
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
    })
}

pub async fn list_entries(
    State(state): State<AppState>,
) -> Result<Json<Vec<RedirectEntry>>, ApiError> {
    let entries = state.registry.list()?;
    Ok(Json(entries))
}

pub async fn get_entry(
    State(state): State<AppState>,
    Path(source): Path<String>,
) -> Result<Json<RedirectEntry>, ApiError> {
    match state.registry.get(&source)? {
        Some(destination) => Ok(Json(RedirectEntry::new(source, destination))),
        None => Err(ApiError::NotFound(source)),
    }
}

/// Writes wait for the single store writer and sync to disk on commit, so
/// they run on the blocking pool. Reads take a snapshot and never wait on
/// a writer; handlers run them inline.
pub async fn save_entry(
    State(state): State<AppState>,
    Json(entry): Json<RedirectEntry>,
) -> Result<StatusCode, ApiError> {
    let registry = state.registry.clone();
    let outcome = tokio::task::spawn_blocking(move || registry.save(entry))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))??;

    if let SaveOutcome::Deleted { existed: false } = outcome {
        tracing::debug!("Save with empty destination for unknown source");
    }
    metrics::record_response("save", StatusCode::NO_CONTENT.as_u16());
    Ok(StatusCode::NO_CONTENT)
}

pub async fn resolve_path(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<Json<Redirect>, ApiError> {
    let path = trim_trailing_slash(&path);
    match state.resolver.resolve(path).map_err(RegistryError::from)? {
        Resolution::Found(redirect) => Ok(Json(redirect)),
        Resolution::NotFound => Err(ApiError::NotFound(path.to_owned())),
    }
}
