use std::sync::Arc;

use tokio::sync::{Mutex, broadcast};
use tracing::{debug, info};

use plaza_core::NotificationStore;
use plaza_types::events::{FeedCommand, FeedUpdate};
use plaza_types::models::NotificationRecord;

use crate::config::FeedConfig;
use crate::error::FeedError;

/// Shared owner of one notification feed.
///
/// Cloning is cheap; every clone talks to the same store. All mutations run
/// under a single lock, and the resulting update is published before the lock
/// is released so subscribers observe updates in mutation order.
#[derive(Clone)]
pub struct NotificationHub {
    inner: Arc<HubInner>,
}

struct HubInner {
    store: Mutex<NotificationStore>,

    /// Every subscriber receives every update
    updates_tx: broadcast::Sender<FeedUpdate>,
}

impl NotificationHub {
    pub fn new(config: &FeedConfig) -> Self {
        let (updates_tx, _) = broadcast::channel(config.broadcast_capacity);
        info!(capacity = config.broadcast_capacity, "notification hub started");
        Self {
            inner: Arc::new(HubInner {
                store: Mutex::new(NotificationStore::new()),
                updates_tx,
            }),
        }
    }

    /// Subscribe to feed updates. Returns a broadcast receiver.
    pub fn subscribe(&self) -> broadcast::Receiver<FeedUpdate> {
        self.inner.updates_tx.subscribe()
    }

    /// Apply a command. Returns the published update, or `None` if the
    /// command left the feed unchanged.
    pub async fn apply(&self, command: FeedCommand) -> Option<FeedUpdate> {
        let mut store = self.inner.store.lock().await;

        let update = match command {
            FeedCommand::Insert(record) => {
                let id = record.id.clone();
                let kind = record.kind;
                store.insert(record).then_some(FeedUpdate::Inserted { id, kind })
            }
            FeedCommand::MarkRead { id } => store.mark_read(&id).then_some(FeedUpdate::Read { id }),
            FeedCommand::MarkAllRead => match store.mark_all_read() {
                0 => None,
                count => Some(FeedUpdate::AllRead { count }),
            },
            FeedCommand::Clear => match store.clear() {
                0 => None,
                count => Some(FeedUpdate::Cleared { count }),
            },
        };

        if let Some(update) = &update {
            // No subscribers is fine
            let _ = self.inner.updates_tx.send(update.clone());
        }
        update
    }

    /// Decode one JSON command and apply it.
    pub async fn apply_json(&self, raw: &str) -> Result<Option<FeedUpdate>, FeedError> {
        let command = decode_command(raw)?;
        Ok(self.apply(command).await)
    }

    pub async fn insert(&self, record: NotificationRecord) -> bool {
        self.apply(FeedCommand::Insert(record)).await.is_some()
    }

    pub async fn mark_read(&self, id: &str) -> bool {
        self.apply(FeedCommand::MarkRead { id: id.to_string() }).await.is_some()
    }

    pub async fn mark_all_read(&self) -> usize {
        match self.apply(FeedCommand::MarkAllRead).await {
            Some(FeedUpdate::AllRead { count }) => count,
            _ => 0,
        }
    }

    pub async fn clear(&self) -> usize {
        match self.apply(FeedCommand::Clear).await {
            Some(FeedUpdate::Cleared { count }) => count,
            _ => 0,
        }
    }

    /// Copy of the feed, newest first.
    pub async fn snapshot(&self) -> Vec<NotificationRecord> {
        self.inner.store.lock().await.to_vec()
    }

    pub async fn unread_count(&self) -> usize {
        self.inner.store.lock().await.unread_count()
    }
}

/// Parse a `{"type": ..., "data": ...}` feed command.
pub fn decode_command(raw: &str) -> Result<FeedCommand, FeedError> {
    let command = serde_json::from_str(raw)?;
    debug!(?command, "decoded feed command");
    Ok(command)
}
