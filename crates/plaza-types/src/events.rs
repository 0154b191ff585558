use serde::{Deserialize, Serialize};

use crate::models::{NotificationKind, NotificationRecord};

/// Mutations accepted by a notification feed. Inbound server pushes arrive as
/// `Insert`; the rest come from the reader acting on the feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum FeedCommand {
    /// A notification arrived
    Insert(NotificationRecord),

    /// The reader opened a single notification
    MarkRead { id: String },

    /// The reader marked the whole feed as read
    MarkAllRead,

    /// The reader dismissed every notification
    Clear,
}

/// Changes published by a feed after a command altered it.
/// Commands that were no-ops produce no update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum FeedUpdate {
    Inserted { id: String, kind: NotificationKind },

    Read { id: String },

    /// `count` is the number of records that flipped from unread to read
    AllRead { count: usize },

    /// `count` is the number of records removed
    Cleared { count: usize },
}

impl FeedUpdate {
    /// Returns the notification id if this update concerns a single record.
    pub fn notification_id(&self) -> Option<&str> {
        match self {
            Self::Inserted { id, .. } => Some(id),
            Self::Read { id } => Some(id),
            // AllRead and Cleared touch the whole feed
            _ => None,
        }
    }
}
