use super::engagement::ANONYMOUS_USER;
use crate::models::{format_price, AreaSubscription, Listing, Notification, NotificationType, SavedSearch};
use crate::storage::Repository;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Turns listing snapshots into candidate notifications.
///
/// New-listing and saved-area detection share one persisted set of seen
/// listing ids: every listing passed to a check is marked seen afterwards,
/// so a listing is announced at most once. The set is bounded, but ids of
/// listings still present in the latest pass are never evicted.
pub struct NotificationGenerator {
    repo: Arc<Repository>,
    seen_limit: usize,
}

impl NotificationGenerator {
    pub fn new(repo: Arc<Repository>, seen_limit: usize) -> Self {
        Self { repo, seen_limit }
    }

    /// One `new-listing` candidate per unseen listing matching any search
    pub fn check_new_listings(&self, listings: &[Listing], searches: &[SavedSearch]) -> Vec<Notification> {
        self.check_listings(listings, searches, &[])
    }

    /// One `saved-area` candidate per unseen listing inside a followed area
    pub fn check_saved_areas(&self, listings: &[Listing], areas: &[AreaSubscription]) -> Vec<Notification> {
        self.check_listings(listings, &[], areas)
    }

    /// Both passes over a single seen-set snapshot. A listing matching a
    /// saved search is reported as `new-listing` only, never also as
    /// `saved-area`.
    pub fn check_listings(
        &self,
        listings: &[Listing],
        searches: &[SavedSearch],
        areas: &[AreaSubscription],
    ) -> Vec<Notification> {
        let mut seen = self.load_seen();
        let seen_set: HashSet<&str> = seen.iter().map(String::as_str).collect();

        let mut notifications = Vec::new();
        let mut fresh: Vec<String> = Vec::new();
        let mut announced = HashSet::new();
        for listing in listings {
            if seen_set.contains(listing.id.as_str()) || !announced.insert(listing.id.as_str()) {
                continue;
            }
            fresh.push(listing.id.clone());
            if searches.iter().any(|s| s.matches(listing)) {
                notifications.push(new_listing_notification(listing));
            } else if let Some(area) = areas.iter().find(|a| listing.location_contains(&a.area)) {
                notifications.push(saved_area_notification(listing, &area.area));
            }
        }

        if !fresh.is_empty() {
            let current: HashSet<&str> = listings.iter().map(|l| l.id.as_str()).collect();
            seen.extend(fresh);
            if !self.store_seen(seen, &current) {
                warn!(
                    "Could not record seen listings, holding back {} notification(s) so they are not repeated",
                    notifications.len()
                );
                return Vec::new();
            }
        }

        if !notifications.is_empty() {
            info!("Found {} new matching listing(s)", notifications.len());
        }
        notifications
    }

    /// Compare favorited listings against the user's last observed prices.
    ///
    /// The first observation records a baseline. A strictly lower price
    /// yields a `price-drop` candidate and becomes the new baseline.
    pub fn check_price_drops(
        &self,
        listings: &[Listing],
        favorite_ids: &[String],
        user_id: Option<&str>,
    ) -> Vec<Notification> {
        let key = &self.repo.keys().viewed_listings;
        let mut snapshots: HashMap<String, HashMap<String, i64>> = self.repo.load_map(key);
        let prices = snapshots
            .entry(user_id.unwrap_or(ANONYMOUS_USER).to_string())
            .or_default();

        let favorites: HashSet<&str> = favorite_ids.iter().map(String::as_str).collect();
        let mut notifications = Vec::new();
        let mut changed = false;

        for listing in listings.iter().filter(|l| favorites.contains(l.id.as_str())) {
            match prices.get(&listing.id).copied() {
                None => {
                    debug!("Recording baseline price {} for {}", listing.price, listing.id);
                    prices.insert(listing.id.clone(), listing.price);
                    changed = true;
                }
                Some(previous) if listing.price < previous => {
                    notifications.push(price_drop_notification(listing, previous));
                    prices.insert(listing.id.clone(), listing.price);
                    changed = true;
                }
                Some(_) => {}
            }
        }

        if changed {
            self.repo.save(key, &snapshots);
        }
        if !notifications.is_empty() {
            info!("Found {} price drop(s)", notifications.len());
        }
        notifications
    }

    pub fn is_seen(&self, listing_id: &str) -> bool {
        self.load_seen().iter().any(|id| id == listing_id)
    }

    fn load_seen(&self) -> Vec<String> {
        self.repo.load_list(&self.repo.keys().seen_listings)
    }

    /// Persist the seen ids. Past the limit the oldest ids are evicted, but
    /// only ids absent from `current`: a listing still in the feed stays seen
    /// even if that leaves the set above the limit.
    fn store_seen(&self, mut seen: Vec<String>, current: &HashSet<&str>) -> bool {
        if seen.len() > self.seen_limit {
            let mut excess = seen.len() - self.seen_limit;
            seen.retain(|id| {
                if excess > 0 && !current.contains(id.as_str()) {
                    excess -= 1;
                    false
                } else {
                    true
                }
            });
        }
        self.repo.save(&self.repo.keys().seen_listings, &seen)
    }
}

fn new_listing_notification(listing: &Listing) -> Notification {
    Notification::new(
        NotificationType::NewListing,
        format!("New listing in {}", listing.location),
        format!("{} - {}/month", listing.title, format_price(listing.price)),
        Some(listing.id.clone()),
    )
}

fn saved_area_notification(listing: &Listing, area: &str) -> Notification {
    Notification::new(
        NotificationType::SavedArea,
        format!("New in {}", area),
        format!("{} - {}/month", listing.title, format_price(listing.price)),
        Some(listing.id.clone()),
    )
}

fn price_drop_notification(listing: &Listing, previous: i64) -> Notification {
    Notification::new(
        NotificationType::PriceDrop,
        format!("Price drop: {}", listing.title),
        format!(
            "Now {}/month (was {})",
            format_price(listing.price),
            format_price(previous)
        ),
        Some(listing.id.clone()),
    )
}
