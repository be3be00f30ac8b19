use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::Next,
    response::Response,
};

use crate::http::request::request_id;
use crate::http::server::AppState;

pub async fn admin_auth_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(expected) = state.api_key.as_deref() else {
        return Ok(next.run(request).await);
    };

    let provided = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    if provided == Some(expected) {
        return Ok(next.run(request).await);
    }

    tracing::warn!(
        request_id = %request_id(request.headers()),
        path = %request.uri().path(),
        "Rejected admin request"
    );
    Err(StatusCode::UNAUTHORIZED)
}
