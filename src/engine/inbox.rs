use crate::models::Notification;
use crate::storage::Repository;
use std::sync::Arc;
use tracing::{debug, info};

/// Persisted notifications, stored newest first and bounded to `limit`
pub struct NotificationInbox {
    repo: Arc<Repository>,
    limit: usize,
}

impl NotificationInbox {
    pub fn new(repo: Arc<Repository>, limit: usize) -> Self {
        Self { repo, limit }
    }

    fn load(&self) -> Vec<Notification> {
        self.repo.load_list(&self.repo.keys().notifications)
    }

    fn store(&self, notifications: &[Notification]) -> bool {
        self.repo.save(&self.repo.keys().notifications, notifications)
    }

    /// Store a notification as unread, generating an id when it has none.
    /// Returns the stored record, or `None` when the write failed.
    pub fn add_notification(&self, notification: Notification) -> Option<Notification> {
        self.add_all(vec![notification]).into_iter().next()
    }

    /// Store a batch with a single write. Returns what was stored.
    pub fn add_all(&self, batch: Vec<Notification>) -> Vec<Notification> {
        if batch.is_empty() {
            return Vec::new();
        }
        let prepared: Vec<Notification> = batch.into_iter().map(prepare).collect();

        let mut notifications = self.load();
        // newest at the front, batch order preserved
        notifications.splice(0..0, prepared.iter().cloned());
        if notifications.len() > self.limit {
            debug!(
                "Inbox over limit, evicting {} oldest notification(s)",
                notifications.len() - self.limit
            );
            notifications.truncate(self.limit);
        }

        if !self.store(&notifications) {
            return Vec::new();
        }
        info!("Added {} notification(s) to inbox", prepared.len());
        prepared
    }

    /// Newest first
    pub fn get_notifications(&self) -> Vec<Notification> {
        let mut notifications = self.load();
        notifications.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        notifications
    }

    pub fn unread_count(&self) -> usize {
        self.load().iter().filter(|n| !n.read).count()
    }

    pub fn mark_notification_read(&self, id: &str) {
        let mut notifications = self.load();
        match notifications.iter_mut().find(|n| n.id == id) {
            Some(n) if !n.read => n.read = true,
            _ => return,
        }
        self.store(&notifications);
    }

    pub fn mark_all_read(&self) {
        let mut notifications = self.load();
        if notifications.iter().all(|n| n.read) {
            return;
        }
        notifications.iter_mut().for_each(|n| n.read = true);
        self.store(&notifications);
    }

    pub fn delete_notification(&self, id: &str) {
        let mut notifications = self.load();
        let before = notifications.len();
        notifications.retain(|n| n.id != id);
        if notifications.len() != before {
            self.store(&notifications);
        }
    }

    pub fn clear_notifications(&self) {
        if self.repo.remove(&self.repo.keys().notifications) {
            info!("Cleared notification inbox");
        }
    }
}

fn prepare(mut notification: Notification) -> Notification {
    if notification.id.is_empty() {
        notification.id = uuid::Uuid::new_v4().to_string();
    }
    notification.read = false;
    notification
}
