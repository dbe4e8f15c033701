use std::sync::Arc;

use landtrack_core::store::Store;
use tokio::sync::Mutex;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: everything sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Jobs, settings and users, whichever backend is configured.
    pub store: Arc<dyn Store>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Held across every settings read-modify-write. Each settings key is
    /// one document, so unserialized edits would overwrite each other.
    pub settings_write: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: ServerConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
            settings_write: Arc::new(Mutex::new(())),
        }
    }
}
