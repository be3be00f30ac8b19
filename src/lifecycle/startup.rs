//! Startup orchestration.
//!
//! # Responsibilities
//! - Open the registry store named by the configuration
//! - Report the effective configuration
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - The store handle is created once and shared by reference count

use std::sync::Arc;

use crate::config::ServiceConfig;
use crate::store::{LmdbStore, RegistryStore, StoreError};

/// Open the durable registry store described by `config`.
pub fn open_store(config: &ServiceConfig) -> Result<Arc<dyn RegistryStore>, StoreError> {
    let store = LmdbStore::open(&config.storage.path, config.storage.map_size_bytes())?;
    Ok(Arc::new(store))
}

/// Log the settings that shape runtime behavior.
pub fn log_config(config: &ServiceConfig) {
    tracing::info!(
        bind_address = %config.listener.bind_address,
        storage_path = %config.storage.path,
        map_size_mb = config.storage.map_size_mb,
        request_timeout_secs = config.timeouts.request_secs,
        admin_auth = config.admin.api_key.is_some(),
        metrics_enabled = config.observability.metrics_enabled,
        "Configuration loaded"
    );
}
