//! Response construction.
//!
//! # Responsibilities
//! - Map registry and store errors to HTTP status codes
//! - Build temporary redirects
//! - Render the edit page shown for unregistered paths
//!
//! # Design Decisions
//! - Malformed entries are the client's fault (400); store failures are 500
//! - Error bodies are JSON `{"error": "..."}`
//! - Redirects are always 307 so the method is preserved

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Json;

use std::borrow::Cow;

use crate::registry::RegistryError;
use crate::routing::WILDCARD_TOKEN;

/// Errors returned by HTTP handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("{0} is not registered")]
    NotFound(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Registry(RegistryError::Malformed(_)) => StatusCode::BAD_REQUEST,
            ApiError::Registry(RegistryError::Store(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = serde_json::json!({ "error": self.to_string() });
        (status, Json(body)).into_response()
    }
}

/// 307 Temporary Redirect to `location`.
pub fn temporary_redirect(location: &str) -> Response {
    Redirect::temporary(location).into_response()
}

/// Where an unregistered path is sent to be created.
///
/// `path` is already percent-decoded; each segment is encoded again so
/// the edit page receives the same key. A whole `%s` segment stays literal.
pub fn edit_location(path: &str) -> String {
    let segments: Vec<Cow<'_, str>> = path
        .split('/')
        .map(|segment| {
            if segment == WILDCARD_TOKEN {
                Cow::Borrowed(segment)
            } else {
                urlencoding::encode(segment)
            }
        })
        .collect();
    format!("/edit/{}", segments.join("/"))
}

/// Minimal edit page for `key`, saving through `/apiz/save`.
pub fn edit_page(key: &str, destination: &str) -> Html<String> {
    let source = serde_json::Value::from(key).to_string().replace('<', "\\u003c");
    let key = escape_html(key);
    let destination = escape_html(destination);
    Html(format!(
        r#"<!doctype html>
<html>
<head><meta charset="utf-8"><title>Edit {key}</title></head>
<body>
<h1>{key}</h1>
<form id="edit">
<input id="destination" name="destination" type="url" size="80" value="{destination}" placeholder="https://">
<button type="submit">Save</button>
</form>
<script>
document.getElementById("edit").addEventListener("submit", function (event) {{
    event.preventDefault();
    fetch("/apiz/save", {{
        method: "POST",
        headers: {{ "Content-Type": "application/json" }},
        body: JSON.stringify({{
            source: {source},
            destination: document.getElementById("destination").value,
        }}),
    }});
}});
</script>
</body>
</html>
"#
    ))
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
