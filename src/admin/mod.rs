//! Registry administration API.
//!
//! # Routes
//! - `GET  /registryz`               every entry, key-ordered
//! - `GET  /apiz/status`             service version
//! - `POST /apiz/save`               store or (empty destination) delete
//! - `GET  /apiz/entries/{*source}`  one entry
//! - `GET  /apiz/resolve/{*path}`    resolve without redirecting
//!
//! All routes require `Authorization: Bearer <admin.api_key>` when a key
//! is configured.

pub mod auth;
pub mod handlers;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use self::auth::admin_auth_middleware;
use self::handlers::*;
use crate::http::server::AppState;

pub fn setup_admin_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/registryz", get(list_entries))
        .route("/apiz/status", get(get_status))
        .route("/apiz/save", post(save_entry))
        .route("/apiz/entries/{*source}", get(get_entry))
        .route("/apiz/resolve/{*path}", get(resolve_path))
        .route_layer(middleware::from_fn_with_state(state, admin_auth_middleware))
}
