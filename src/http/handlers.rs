//! Public redirect and edit handlers.
//!
//! Everything that is not an admin route is a short link: the request
//! path is resolved against the registry and answered with a 307. Paths
//! with no registered redirect are sent to the edit page instead.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
};

use crate::http::request::request_id;
use crate::http::response::{edit_location, edit_page, temporary_redirect, ApiError};
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::registry::RegistryError;
use crate::routing::{trim_trailing_slash, Resolution, WILDCARD_TOKEN};

pub async fn redirect_root(State(state): State<AppState>, headers: HeaderMap) -> Response {
    redirect_path(&state, "", &headers)
}

pub async fn redirect(
    State(state): State<AppState>,
    Path(path): Path<String>,
    headers: HeaderMap,
) -> Response {
    redirect_path(&state, &path, &headers)
}

fn redirect_path(state: &AppState, path: &str, headers: &HeaderMap) -> Response {
    let request_id = request_id(headers);
    let path = trim_trailing_slash(path);

    match state.resolver.resolve(path) {
        Ok(Resolution::Found(redirect)) => {
            tracing::debug!(
                request_id = %request_id,
                path = %path,
                destination = %redirect.destination,
                "Redirecting"
            );
            metrics::record_response("redirect", StatusCode::TEMPORARY_REDIRECT.as_u16());
            temporary_redirect(&redirect.destination)
        }
        Ok(Resolution::NotFound) => {
            tracing::debug!(request_id = %request_id, path = %path, "No redirect registered");
            metrics::record_response("redirect", StatusCode::TEMPORARY_REDIRECT.as_u16());
            temporary_redirect(&edit_location(path))
        }
        Err(e) => {
            tracing::error!(request_id = %request_id, path = %path, error = %e, "Resolution failed");
            metrics::record_response("redirect", StatusCode::INTERNAL_SERVER_ERROR.as_u16());
            ApiError::from(RegistryError::from(e)).into_response()
        }
    }
}

/// `/edit/` edits the catch-all wildcard key.
pub async fn edit_root() -> Response {
    temporary_redirect(&edit_location(WILDCARD_TOKEN))
}

pub async fn edit(
    State(state): State<AppState>,
    Path(key): Path<String>,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    // A trailing slash asks for the wildcard entry under that prefix.
    if uri.path().ends_with('/') {
        return temporary_redirect(&format!("{}{}", uri.path(), WILDCARD_TOKEN));
    }

    match state.registry.get(&key) {
        Ok(destination) => {
            metrics::record_response("edit", StatusCode::OK.as_u16());
            edit_page(&key, destination.as_deref().unwrap_or_default()).into_response()
        }
        Err(e) => {
            tracing::error!(request_id = %request_id(&headers), key = %key, error = %e, "Edit lookup failed");
            metrics::record_response("edit", StatusCode::INTERNAL_SERVER_ERROR.as_u16());
            ApiError::from(e).into_response()
        }
    }
}
