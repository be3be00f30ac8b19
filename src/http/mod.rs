//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID)
//!     → handlers.rs (redirect / edit) or admin (registry API)
//!     → response.rs (status mapping, redirects, edit page)
//!     → Send to client
//! ```

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::{UuidRequestId, X_REQUEST_ID};
pub use response::ApiError;
pub use server::{AppState, HttpServer};
