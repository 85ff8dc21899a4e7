use crate::config::BadgeConfig;
use crate::models::ResponseBadge;
use crate::storage::Repository;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

const GREEN: &str = "#16a34a";
const AMBER: &str = "#d97706";
const GRAY: &str = "#6b7280";

/// Contact-click history per landlord, summarized as a response-time badge
pub struct ResponseTracker {
    repo: Arc<Repository>,
    badges: BadgeConfig,
    history_limit: usize,
}

impl ResponseTracker {
    pub fn new(repo: Arc<Repository>, badges: BadgeConfig, history_limit: usize) -> Self {
        Self {
            repo,
            badges,
            history_limit,
        }
    }

    pub fn track_landlord_contact_click(&self, landlord_id: &str) {
        self.track_contact_click_at(landlord_id, Utc::now());
    }

    pub fn track_contact_click_at(&self, landlord_id: &str, at: DateTime<Utc>) {
        let key = &self.repo.keys().landlord_responses;
        let mut records: HashMap<String, Vec<DateTime<Utc>>> = self.repo.load_map(key);
        let clicks = records.entry(landlord_id.to_string()).or_default();
        clicks.push(at);
        if clicks.len() > self.history_limit {
            let excess = clicks.len() - self.history_limit;
            clicks.drain(..excess);
        }
        let total = clicks.len();
        if self.repo.save(key, &records) {
            debug!("Landlord {} has {} contact click(s) on record", landlord_id, total);
        }
    }

    pub fn get_response_time_badge(&self, landlord_id: &str) -> Option<ResponseBadge> {
        self.badge_at(landlord_id, Utc::now())
    }

    /// Badge as it would read at `now`. `None` when the landlord has no history.
    pub fn badge_at(&self, landlord_id: &str, now: DateTime<Utc>) -> Option<ResponseBadge> {
        let records: HashMap<String, Vec<DateTime<Utc>>> =
            self.repo.load_map(&self.repo.keys().landlord_responses);
        let latest = records.get(landlord_id)?.iter().max()?;
        let age = now - *latest;

        let defaults = BadgeConfig::default();
        let fast = Duration::try_hours(self.badges.fast_window_hours)
            .or_else(|| Duration::try_hours(defaults.fast_window_hours))
            .unwrap_or_default();
        let active = Duration::try_days(self.badges.active_window_days)
            .or_else(|| Duration::try_days(defaults.active_window_days))
            .unwrap_or_default();

        let (text, color) = if age <= fast {
            ("Responds within hours", GREEN)
        } else if age <= active {
            ("Responds within a day", AMBER)
        } else {
            ("Usually responds within a week", GRAY)
        };

        Some(ResponseBadge {
            text: text.to_string(),
            color: color.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker(history_limit: usize) -> ResponseTracker {
        ResponseTracker::new(
            Arc::new(Repository::in_memory()),
            BadgeConfig::default(),
            history_limit,
        )
    }

    #[test]
    fn no_history_no_badge() {
        assert!(tracker(10).get_response_time_badge("LL1").is_none());
    }

    #[test]
    fn badge_follows_latest_click() {
        let tracker = tracker(10);
        let now = Utc::now();

        tracker.track_contact_click_at("LL1", now - Duration::hours(2));
        assert_eq!(tracker.badge_at("LL1", now).unwrap().text, "Responds within hours");

        tracker.track_contact_click_at("LL2", now - Duration::days(3));
        let badge = tracker.badge_at("LL2", now).unwrap();
        assert_eq!(badge.text, "Responds within a day");
        assert_eq!(badge.color, AMBER);

        tracker.track_contact_click_at("LL3", now - Duration::days(30));
        assert_eq!(tracker.badge_at("LL3", now).unwrap().color, GRAY);
    }

    #[test]
    fn fresh_click_upgrades_badge() {
        let tracker = tracker(10);
        let now = Utc::now();
        tracker.track_contact_click_at("LL1", now - Duration::days(30));
        tracker.track_landlord_contact_click("LL1");

        assert_eq!(tracker.get_response_time_badge("LL1").unwrap().color, GREEN);
    }

    #[test]
    fn out_of_range_windows_fall_back_to_defaults() {
        let tracker = ResponseTracker::new(
            Arc::new(Repository::in_memory()),
            BadgeConfig {
                fast_window_hours: i64::MAX,
                active_window_days: i64::MIN,
            },
            10,
        );
        let now = Utc::now();
        tracker.track_contact_click_at("LL1", now - Duration::hours(2));
        tracker.track_contact_click_at("LL2", now - Duration::days(3));

        assert_eq!(tracker.badge_at("LL1", now).unwrap().color, GREEN);
        assert_eq!(tracker.badge_at("LL2", now).unwrap().color, AMBER);
    }

    #[test]
    fn history_is_bounded() {
        let tracker = tracker(3);
        let now = Utc::now();
        for i in 0..5 {
            tracker.track_contact_click_at("LL1", now - Duration::days(10 - i));
        }

        let records: HashMap<String, Vec<DateTime<Utc>>> = tracker
            .repo
            .load_map(&tracker.repo.keys().landlord_responses);
        assert_eq!(records["LL1"].len(), 3);
        assert_eq!(records["LL1"][2], now - Duration::days(6));
    }
}
