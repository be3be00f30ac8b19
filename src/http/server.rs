//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, timeout, body limit)
//! - Bind server to listener
//! - Stop accepting on shutdown and drain in-flight requests

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header::CACHE_CONTROL, HeaderValue},
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    set_header::SetResponseHeaderLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::admin;
use crate::config::ServiceConfig;
use crate::http::handlers;
use crate::http::request::UuidRequestId;
use crate::lifecycle::shutdown;
use crate::registry::Registry;
use crate::routing::Resolver;
use crate::store::RegistryStore;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub resolver: Resolver,
    pub registry: Registry,
    pub api_key: Option<Arc<str>>,
}

impl AppState {
    pub fn new(store: Arc<dyn RegistryStore>, config: &ServiceConfig) -> Self {
        Self {
            resolver: Resolver::new(store.clone()),
            registry: Registry::new(store),
            api_key: config.admin.api_key.as_deref().map(Arc::from),
        }
    }
}

/// HTTP server for the redirect service.
pub struct HttpServer {
    router: Router,
    config: ServiceConfig,
}

impl HttpServer {
    /// Create a new HTTP server serving the registry in `store`.
    pub fn new(config: ServiceConfig, store: Arc<dyn RegistryStore>) -> Self {
        let state = AppState::new(store, &config);
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServiceConfig, state: AppState) -> Router {
        let middleware = ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetResponseHeaderLayer::overriding(
                CACHE_CONTROL,
                HeaderValue::from_static("no-store"),
            ))
            .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )));

        // "/{*path}" does not match the empty path, hence the separate root
        // routes.
        Router::new()
            .route("/", get(handlers::redirect_root))
            .route("/{*path}", get(handlers::redirect))
            .route("/edit/", get(handlers::edit_root))
            .route("/edit/{*key}", get(handlers::edit))
            .merge(admin::setup_admin_router(state.clone()))
            .with_state(state)
            .layer(middleware)
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown::wait(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The fully layered router, for serving without a listener.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }
}
