use crate::models::AreaSubscription;
use crate::storage::Repository;
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

/// Areas the user follows for `saved-area` alerts
pub struct AreaSubscriptions {
    repo: Arc<Repository>,
}

impl AreaSubscriptions {
    pub fn new(repo: Arc<Repository>) -> Self {
        Self { repo }
    }

    /// Follow an area. Re-subscribing returns the existing subscription.
    pub fn subscribe_to_area(&self, area: &str) -> Option<AreaSubscription> {
        let area = area.trim();
        if area.is_empty() {
            return None;
        }

        let mut subscriptions = self.get_area_subscriptions();
        if let Some(existing) = subscriptions
            .iter()
            .find(|s| s.area.to_lowercase() == area.to_lowercase())
        {
            return Some(existing.clone());
        }

        let subscription = AreaSubscription {
            id: uuid::Uuid::new_v4().to_string(),
            area: area.to_string(),
            created_at: Utc::now(),
        };
        subscriptions.push(subscription.clone());
        if !self.repo.save(&self.repo.keys().area_subscriptions, &subscriptions) {
            return None;
        }
        info!("Subscribed to area '{}'", subscription.area);
        Some(subscription)
    }

    pub fn unsubscribe_from_area(&self, id: &str) {
        let mut subscriptions = self.get_area_subscriptions();
        let before = subscriptions.len();
        subscriptions.retain(|s| s.id != id);
        if subscriptions.len() != before {
            self.repo.save(&self.repo.keys().area_subscriptions, &subscriptions);
        }
    }

    pub fn get_area_subscriptions(&self) -> Vec<AreaSubscription> {
        self.repo.load_list(&self.repo.keys().area_subscriptions)
    }
}
