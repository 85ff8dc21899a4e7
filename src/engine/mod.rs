//! Saved-search and engagement engine.
//!
//! Every component reads and writes through one shared [`Repository`].
//! [`NotificationEngine`] wires them together and runs the check cycle.

pub mod areas;
pub mod engagement;
pub mod generator;
pub mod inbox;
pub mod quick_replies;
pub mod response;
pub mod saved_searches;

pub use areas::AreaSubscriptions;
pub use engagement::EngagementTracker;
pub use generator::NotificationGenerator;
pub use inbox::NotificationInbox;
pub use quick_replies::QuickReplies;
pub use response::ResponseTracker;
pub use saved_searches::SavedSearchRegistry;

use crate::config::Config;
use crate::models::{Listing, Notification};
use crate::storage::Repository;
use std::sync::Arc;
use tracing::info;

pub struct NotificationEngine {
    pub searches: SavedSearchRegistry,
    pub generator: NotificationGenerator,
    pub inbox: NotificationInbox,
    pub engagement: EngagementTracker,
    pub responses: ResponseTracker,
    pub areas: AreaSubscriptions,
    pub quick_replies: QuickReplies,
}

impl NotificationEngine {
    pub fn new(repo: Arc<Repository>, config: &Config) -> Self {
        let limits = &config.limits;
        Self {
            searches: SavedSearchRegistry::new(repo.clone()),
            generator: NotificationGenerator::new(repo.clone(), limits.seen_listings),
            inbox: NotificationInbox::new(repo.clone(), limits.inbox),
            engagement: EngagementTracker::new(repo.clone(), limits.compare_list),
            responses: ResponseTracker::new(repo.clone(), config.badges.clone(), limits.landlord_history),
            areas: AreaSubscriptions::new(repo.clone()),
            quick_replies: QuickReplies::new(repo),
        }
    }

    /// Engine over the backend named in the config
    pub fn from_config(config: &Config) -> Self {
        Self::new(Arc::new(Repository::from_config(&config.storage)), config)
    }

    /// Run every generator against the current listing set and store what
    /// they produce in the inbox. Returns the notifications that were stored.
    pub fn run_checks(
        &self,
        listings: &[Listing],
        favorite_ids: &[String],
        user_id: Option<&str>,
    ) -> Vec<Notification> {
        let searches = self.searches.get_saved_searches();
        let areas = self.areas.get_area_subscriptions();

        let mut candidates = self.generator.check_listings(listings, &searches, &areas);
        candidates.extend(self.generator.check_price_drops(listings, favorite_ids, user_id));

        let stored = self.inbox.add_all(candidates);
        info!(
            "Checked {} listing(s) against {} search(es) and {} area(s): {} notification(s)",
            listings.len(),
            searches.len(),
            areas.len(),
            stored.len()
        );
        stored
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NotificationType, SearchCriteria};

    #[test]
    fn run_checks_fills_inbox() {
        let engine = NotificationEngine::new(Arc::new(Repository::in_memory()), &Config::default());
        engine
            .searches
            .save_search(SearchCriteria::in_location("Sandton").with_price_range(0, 5000))
            .unwrap();
        engine.areas.subscribe_to_area("Rosebank").unwrap();
        let favorites = vec!["L3".to_string()];

        let day_one = vec![
            Listing::new("L1", "Room", 4500, "Sandton"),
            Listing::new("L2", "Studio", 7000, "Rosebank"),
            Listing::new("L3", "Loft", 8000, "Maboneng"),
        ];
        let stored = engine.run_checks(&day_one, &favorites, Some("u1"));
        assert_eq!(stored.len(), 2);
        assert_eq!(engine.inbox.unread_count(), 2);

        let mut day_two = day_one.clone();
        day_two[2].price = 7500;
        let stored = engine.run_checks(&day_two, &favorites, Some("u1"));
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].notification_type, NotificationType::PriceDrop);
        assert_eq!(engine.inbox.get_notifications().len(), 3);
    }
}
