use crate::models::CompareResult;
use crate::storage::Repository;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Snapshot bucket for callers without a user id
pub const ANONYMOUS_USER: &str = "anonymous";

/// View counters, viewed-price snapshots and the compare list
pub struct EngagementTracker {
    repo: Arc<Repository>,
    compare_cap: usize,
}

impl EngagementTracker {
    pub fn new(repo: Arc<Repository>, compare_cap: usize) -> Self {
        Self { repo, compare_cap }
    }

    /// Count a view and return the listing's distinct-viewer total.
    ///
    /// A known user is counted once per listing. Anonymous views cannot be
    /// deduplicated and always count.
    pub fn track_listing_view(&self, listing_id: &str, user_id: Option<&str>) -> u64 {
        let keys = self.repo.keys();
        let mut counts: HashMap<String, u64> = self.repo.load_map(&keys.view_counts);
        let current = counts.get(listing_id).copied().unwrap_or(0);

        let mut viewers: HashMap<String, Vec<String>> = self.repo.load_map(&keys.viewers);
        let previous_viewers = viewers.clone();
        if let Some(user) = user_id {
            let seen_by = viewers.entry(listing_id.to_string()).or_default();
            if seen_by.iter().any(|v| v == user) {
                return current;
            }
            seen_by.push(user.to_string());
            // the viewer must be on record before the count moves
            if !self.repo.save(&keys.viewers, &viewers) {
                return current;
            }
        }

        let updated = current + 1;
        counts.insert(listing_id.to_string(), updated);
        if !self.repo.save(&keys.view_counts, &counts) {
            if user_id.is_some() {
                self.repo.save(&keys.viewers, &previous_viewers);
            }
            return current;
        }
        debug!("Listing {} now has {} viewer(s)", listing_id, updated);
        updated
    }

    pub fn get_view_count(&self, listing_id: &str) -> u64 {
        self.repo
            .load_map::<u64>(&self.repo.keys().view_counts)
            .get(listing_id)
            .copied()
            .unwrap_or(0)
    }

    /// Record the price the user just saw as their baseline for price drops
    pub fn track_user_viewed_listing(&self, user_id: Option<&str>, listing_id: &str, price: i64) {
        let mut snapshots = self.load_snapshots();
        snapshots
            .entry(user_id.unwrap_or(ANONYMOUS_USER).to_string())
            .or_default()
            .insert(listing_id.to_string(), price);
        self.save_snapshots(&snapshots);
    }

    pub fn get_viewed_price(&self, user_id: Option<&str>, listing_id: &str) -> Option<i64> {
        self.load_snapshots()
            .get(user_id.unwrap_or(ANONYMOUS_USER))
            .and_then(|prices| prices.get(listing_id))
            .copied()
    }

    fn load_snapshots(&self) -> HashMap<String, HashMap<String, i64>> {
        self.repo.load_map(&self.repo.keys().viewed_listings)
    }

    fn save_snapshots(&self, snapshots: &HashMap<String, HashMap<String, i64>>) -> bool {
        self.repo.save(&self.repo.keys().viewed_listings, snapshots)
    }

    pub fn add_to_compare(&self, listing_id: &str) -> CompareResult {
        let mut list = self.get_compare_list();
        if list.iter().any(|id| id == listing_id) {
            return CompareResult::rejected("This listing is already in your compare list");
        }
        if list.len() >= self.compare_cap {
            return CompareResult::rejected(format!(
                "You can compare up to {} listings at a time",
                self.compare_cap
            ));
        }

        list.push(listing_id.to_string());
        if !self.repo.save(&self.repo.keys().compare_list, &list) {
            return CompareResult::rejected("Could not save your compare list");
        }
        info!("Added {} to compare list ({}/{})", listing_id, list.len(), self.compare_cap);
        CompareResult::ok(format!("Added to compare ({}/{})", list.len(), self.compare_cap))
    }

    pub fn remove_from_compare(&self, listing_id: &str) {
        let mut list = self.get_compare_list();
        let before = list.len();
        list.retain(|id| id != listing_id);
        if list.len() != before {
            self.repo.save(&self.repo.keys().compare_list, &list);
        }
    }

    pub fn get_compare_list(&self) -> Vec<String> {
        self.repo.load_list(&self.repo.keys().compare_list)
    }

    pub fn clear_compare(&self) {
        self.repo.remove(&self.repo.keys().compare_list);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StorageKeys;
    use crate::storage::MemoryStore;

    fn tracker() -> EngagementTracker {
        EngagementTracker::new(Arc::new(Repository::in_memory()), 4)
    }

    #[test]
    fn same_user_counts_once() {
        let tracker = tracker();
        assert_eq!(tracker.track_listing_view("L1", Some("u1")), 1);
        assert_eq!(tracker.track_listing_view("L1", Some("u1")), 1);
        assert_eq!(tracker.get_view_count("L1"), 1);
    }

    #[test]
    fn distinct_users_count_separately() {
        let tracker = tracker();
        tracker.track_listing_view("L1", Some("u1"));
        assert_eq!(tracker.track_listing_view("L1", Some("u2")), 2);
        assert_eq!(tracker.get_view_count("L2"), 0);
    }

    #[test]
    fn anonymous_views_always_count() {
        let tracker = tracker();
        tracker.track_listing_view("L1", None);
        tracker.track_listing_view("L1", None);
        assert_eq!(tracker.track_listing_view("L1", Some("u1")), 3);
    }

    #[test]
    fn failed_viewer_write_never_inflates_count() {
        let repo = Repository::new(Box::new(MemoryStore::with_quota(40)), StorageKeys::default());
        let tracker = EngagementTracker::new(Arc::new(repo), 4);

        let counts: Vec<u64> = (0..3)
            .map(|_| tracker.track_listing_view("L1", Some("alice")))
            .collect();
        assert!(counts.windows(2).all(|w| w[0] == w[1]));
        assert!(tracker.get_view_count("L1") <= 1);
    }

    #[test]
    fn repeat_views_under_quota_count_once() {
        let repo = Repository::new(Box::new(MemoryStore::with_quota(60)), StorageKeys::default());
        let tracker = EngagementTracker::new(Arc::new(repo), 4);

        for _ in 0..3 {
            assert_eq!(tracker.track_listing_view("L1", Some("alice")), 1);
        }
    }

    #[test]
    fn viewed_price_is_per_user() {
        let tracker = tracker();
        tracker.track_user_viewed_listing(Some("u1"), "L1", 5000);
        tracker.track_user_viewed_listing(None, "L1", 4200);

        assert_eq!(tracker.get_viewed_price(Some("u1"), "L1"), Some(5000));
        assert_eq!(tracker.get_viewed_price(None, "L1"), Some(4200));
        assert_eq!(tracker.get_viewed_price(Some("u2"), "L1"), None);

        tracker.track_user_viewed_listing(Some("u1"), "L1", 5500);
        assert_eq!(tracker.get_viewed_price(Some("u1"), "L1"), Some(5500));
    }

    #[test]
    fn compare_list_is_capped() {
        let tracker = tracker();
        for id in ["L1", "L2", "L3", "L4"] {
            assert!(tracker.add_to_compare(id).success);
        }

        let fifth = tracker.add_to_compare("L5");
        assert!(!fifth.success);
        assert!(fifth.message.contains('4'));
        assert_eq!(tracker.get_compare_list(), vec!["L1", "L2", "L3", "L4"]);
    }

    #[test]
    fn compare_rejects_duplicates() {
        let tracker = tracker();
        assert!(tracker.add_to_compare("L1").success);
        assert!(!tracker.add_to_compare("L1").success);

        tracker.remove_from_compare("L1");
        tracker.remove_from_compare("L9");
        assert!(tracker.get_compare_list().is_empty());
        assert!(tracker.add_to_compare("L1").success);

        tracker.clear_compare();
        assert!(tracker.get_compare_list().is_empty());
    }
}
