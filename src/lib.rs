//! Shortlinks: a go-link style redirect service.
//!
//! Short paths such as `/docs` or `/team/eng` are looked up in a durable
//! registry and answered with a temporary redirect. Keys may contain a
//! single `%s` wildcard segment whose matched value is substituted into
//! the destination.

// Core subsystems
pub mod config;
pub mod http;
pub mod registry;
pub mod routing;
pub mod store;

// Administration
pub mod admin;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::schema::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use registry::{RedirectEntry, Registry};
pub use routing::{Resolution, Resolver};
pub use store::{LmdbStore, MemoryStore, RegistryStore};
