//! Dependency wiring: turns a [`TrackerConfig`] into concrete adapters and
//! a running [`TrackerSession`].

use std::path::Path;
use std::sync::Arc;

use rc_app::{LoadingIndicator, SessionDeps, TrackerSession};
use rc_core::config::StorageBackend;
use rc_core::ports::KeyValueStorePort;
use rc_core::TrackerConfig;
use rc_infra::kv::DEFAULT_HTTP_TIMEOUT;
use rc_infra::{
    FileKeyValueStore, HttpKeyValueStore, InMemoryKeyValueStore, StaticIdentity, TracingNotifier,
};
use tracing::info;

/// Build the key-value store adapter named by `backend`.
///
/// An empty file path falls back to `default_store_path`.
pub fn build_store(
    backend: &StorageBackend,
    default_store_path: &Path,
) -> anyhow::Result<Arc<dyn KeyValueStorePort>> {
    let store: Arc<dyn KeyValueStorePort> = match backend {
        StorageBackend::File { path } => {
            let path = if path.as_os_str().is_empty() {
                default_store_path
            } else {
                path.as_path()
            };
            info!(path = %path.display(), "using file store");
            Arc::new(FileKeyValueStore::new(path))
        }
        StorageBackend::Http { url } => {
            info!(%url, "using http store");
            Arc::new(HttpKeyValueStore::new(url.as_str(), DEFAULT_HTTP_TIMEOUT)?)
        }
        StorageBackend::Memory => {
            info!("using in-memory store");
            Arc::new(InMemoryKeyValueStore::new())
        }
    };
    Ok(store)
}

/// Wire every adapter and start the session.
pub async fn start_session(
    config: &TrackerConfig,
    default_store_path: &Path,
    loading: Arc<dyn LoadingIndicator>,
) -> anyhow::Result<TrackerSession> {
    let store = build_store(&config.storage, default_store_path)?;

    let deps = SessionDeps {
        store,
        notifier: Arc::new(TracingNotifier::new(config.sync.notification_duration)),
        identity: Arc::new(StaticIdentity::new(config.profile.clone())),
        loading,
        rules: config.supply,
        sync: config.sync.clone(),
    };

    Ok(TrackerSession::start(deps).await)
}
