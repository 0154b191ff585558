use std::collections::{HashSet, VecDeque};

use plaza_types::models::NotificationRecord;
use tracing::{debug, trace};

/// Newest-first notification feed with unique ids.
///
/// The four mutators below are the only way to change the feed. None of them
/// can fail: unknown ids and empty feeds are no-ops. Each reports whether it
/// changed anything so callers can decide whether to publish an update.
#[derive(Debug, Default)]
pub struct NotificationStore {
    items: VecDeque<NotificationRecord>,
    ids: HashSet<String>,
}

impl NotificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put `record` at the head of the feed, unread. If the id is already
    /// present the feed is left untouched (the first write for an id wins).
    /// Returns true if the record was added.
    pub fn insert(&mut self, mut record: NotificationRecord) -> bool {
        if self.ids.contains(&record.id) {
            trace!(id = %record.id, "duplicate notification ignored");
            return false;
        }

        record.read = false;
        debug!(id = %record.id, kind = ?record.kind, "notification inserted");
        self.ids.insert(record.id.clone());
        self.items.push_front(record);
        true
    }

    /// Mark one notification read. Returns true if it flipped from unread.
    pub fn mark_read(&mut self, id: &str) -> bool {
        match self.items.iter_mut().find(|r| r.id == id) {
            Some(record) if !record.read => {
                record.read = true;
                debug!(id, "notification marked read");
                true
            }
            Some(_) => false,
            None => {
                trace!(id, "mark_read on unknown notification");
                false
            }
        }
    }

    /// Mark every notification read. Returns how many flipped from unread.
    pub fn mark_all_read(&mut self) -> usize {
        let mut flipped = 0;
        for record in self.items.iter_mut().filter(|r| !r.read) {
            record.read = true;
            flipped += 1;
        }
        if flipped > 0 {
            debug!(flipped, "all notifications marked read");
        }
        flipped
    }

    /// Drop every notification. Returns how many were removed.
    pub fn clear(&mut self) -> usize {
        let removed = self.items.len();
        self.items.clear();
        self.ids.clear();
        if removed > 0 {
            debug!(removed, "notifications cleared");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn get(&self, id: &str) -> Option<&NotificationRecord> {
        self.items.iter().find(|r| r.id == id)
    }

    /// Iterate newest first.
    pub fn iter(&self) -> impl Iterator<Item = &NotificationRecord> {
        self.items.iter()
    }

    pub fn unread_count(&self) -> usize {
        self.items.iter().filter(|r| !r.read).count()
    }

    /// Owned copy of the feed, newest first.
    pub fn to_vec(&self) -> Vec<NotificationRecord> {
        self.items.iter().cloned().collect()
    }
}
