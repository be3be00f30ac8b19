//! Shared utilities for integration and load testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use reqwest::redirect::Policy;
use shortlinks::config::ServiceConfig;
use shortlinks::http::HttpServer;
use shortlinks::lifecycle::Shutdown;
use shortlinks::registry::{RedirectEntry, Registry};
use shortlinks::store::{LmdbStore, ReadOp, RegistryStore, StoreError, WriteOp};
use tempfile::TempDir;
use tokio::net::TcpListener;

/// A running server backed by a throwaway LMDB registry.
pub struct TestServer {
    pub addr: SocketAddr,
    pub registry: Registry,
    shutdown: Shutdown,
    _dir: TempDir,
}

impl TestServer {
    pub async fn start() -> Self {
        Self::start_with(|_| {}).await
    }

    pub async fn start_with(configure: impl FnOnce(&mut ServiceConfig)) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let mut config = ServiceConfig::default();
        config.storage.path = dir.path().join("registry").display().to_string();
        configure(&mut config);

        let store: Arc<dyn RegistryStore> = Arc::new(
            LmdbStore::open(&config.storage.path, config.storage.map_size_bytes()).unwrap(),
        );
        Self::serve(config, store, dir).await
    }

    /// Serve an arbitrary store, e.g. one that fails every transaction.
    pub async fn start_with_store(store: Arc<dyn RegistryStore>) -> Self {
        let dir = tempfile::tempdir().unwrap();
        Self::serve(ServiceConfig::default(), store, dir).await
    }

    async fn serve(mut config: ServiceConfig, store: Arc<dyn RegistryStore>, dir: TempDir) -> Self {
        config.listener.bind_address = "127.0.0.1:0".into();
        let registry = Registry::new(store.clone());

        let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
        let addr = listener.local_addr().unwrap();

        let shutdown = Shutdown::new();
        let server_shutdown = shutdown.subscribe();
        let server = HttpServer::new(config, store);
        tokio::spawn(async move {
            let _ = server.run(listener, server_shutdown).await;
        });

        Self {
            addr,
            registry,
            shutdown,
            _dir: dir,
        }
    }

    /// Store entries directly, bypassing HTTP.
    pub fn seed(&self, entries: &[(&str, &str)]) {
        for (source, destination) in entries {
            self.registry
                .put(RedirectEntry::new(*source, *destination))
                .unwrap();
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn stop(&self) {
        self.shutdown.trigger();
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// A store whose every transaction fails with an I/O error.
pub struct FailingStore;

impl RegistryStore for FailingStore {
    fn read(&self, _op: &mut ReadOp<'_>) -> Result<(), StoreError> {
        Err(StoreError::Io("disk unavailable".into()))
    }

    fn write(&self, _op: &mut WriteOp<'_>) -> Result<(), StoreError> {
        Err(StoreError::Io("disk unavailable".into()))
    }
}

/// Client that reports redirects instead of following them.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(Policy::none())
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

/// The `Location` header of a response.
pub fn location(res: &reqwest::Response) -> &str {
    res.headers()
        .get(reqwest::header::LOCATION)
        .expect("missing Location header")
        .to_str()
        .unwrap()
}
