//! In-process change feed backed by a `tokio::sync::broadcast` channel.

use serde::Serialize;
use tokio::sync::broadcast;

use crate::types::DbId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Jobs,
    Settings,
    Users,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeAction {
    Created,
    Updated,
    Deleted,
}

/// A record changed in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreEvent {
    pub collection: Collection,
    pub action: ChangeAction,
    /// Id of the changed job or user.
    pub record_id: Option<DbId>,
    /// Key of the changed settings document.
    pub key: Option<String>,
}

impl StoreEvent {
    pub fn record(collection: Collection, action: ChangeAction, id: DbId) -> Self {
        Self {
            collection,
            action,
            record_id: Some(id),
            key: None,
        }
    }

    pub fn setting(key: impl Into<String>) -> Self {
        Self {
            collection: Collection::Settings,
            action: ChangeAction::Updated,
            record_id: None,
            key: Some(key.into()),
        }
    }
}

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// Fan-out of [`StoreEvent`]s to any number of subscribers.
///
/// Slow receivers that fall more than the capacity behind observe
/// `RecvError::Lagged` and miss the oldest events.
pub struct ChangeFeed {
    sender: broadcast::Sender<StoreEvent>,
}

impl ChangeFeed {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish to all current subscribers. Dropped when nobody listens.
    pub fn publish(&self, event: StoreEvent) {
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.sender.subscribe()
    }
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
