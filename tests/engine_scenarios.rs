use room_alerts::config::{Config, StorageConfig};
use room_alerts::models::{Listing, NotificationType, SearchCriteria};
use room_alerts::storage::{KeyValueStore, MemoryStore, Repository};
use room_alerts::NotificationEngine;
use std::sync::Arc;
use tempfile::TempDir;

fn memory_engine() -> NotificationEngine {
    NotificationEngine::new(Arc::new(Repository::in_memory()), &Config::default())
}

#[test]
fn sandton_listing_is_announced_exactly_once() {
    let engine = memory_engine();
    let search = engine
        .searches
        .save_search(SearchCriteria::in_location("Sandton").with_price_range(0, 5000))
        .unwrap();
    let listings = vec![Listing::new("L1", "Room near Gautrain", 4500, "Sandton, Johannesburg")];

    let first = engine
        .generator
        .check_new_listings(&listings, &[search.clone()]);
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].notification_type, NotificationType::NewListing);
    assert_eq!(first[0].listing_id.as_deref(), Some("L1"));

    let again = engine.generator.check_new_listings(&listings, &[search]);
    assert!(again.is_empty());
}

#[test]
fn saved_search_round_trip() {
    let engine = memory_engine();
    let criteria = SearchCriteria::in_location("Observatory")
        .with_price_range(2500, 6000)
        .with_amenity("WiFi")
        .with_amenity("Laundry");

    engine.searches.save_search(criteria.clone()).unwrap();
    let stored = engine.searches.get_saved_searches();

    assert!(stored.iter().any(|s| s.criteria.location == criteria.location
        && s.criteria.price_range == criteria.price_range
        && s.criteria.amenities == criteria.amenities));
}

#[test]
fn view_counts_dedupe_per_user() {
    let engine = memory_engine();
    engine.engagement.track_listing_view("L1", Some("alice"));
    engine.engagement.track_listing_view("L1", Some("alice"));
    assert_eq!(engine.engagement.get_view_count("L1"), 1);

    engine.engagement.track_listing_view("L1", Some("bob"));
    assert_eq!(engine.engagement.get_view_count("L1"), 2);
}

#[test]
fn viewed_price_feeds_price_drop_check() {
    let engine = memory_engine();
    let favorites = vec!["L7".to_string()];
    engine
        .engagement
        .track_user_viewed_listing(Some("alice"), "L7", 5200);

    let equal = vec![Listing::new("L7", "Cottage", 5200, "Melville")];
    assert!(engine
        .generator
        .check_price_drops(&equal, &favorites, Some("alice"))
        .is_empty());

    let lower = vec![Listing::new("L7", "Cottage", 4800, "Melville")];
    let drops = engine
        .generator
        .check_price_drops(&lower, &favorites, Some("alice"));
    assert_eq!(drops.len(), 1);
    assert_eq!(engine.engagement.get_viewed_price(Some("alice"), "L7"), Some(4800));
}

#[test]
fn fifth_compare_entry_is_rejected() {
    let engine = memory_engine();
    for id in ["A", "B", "C", "D"] {
        assert!(engine.engagement.add_to_compare(id).success);
    }
    let result = engine.engagement.add_to_compare("E");
    assert!(!result.success);
    assert!(!result.message.is_empty());
}

#[test]
fn state_persists_across_engines_on_disk() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = Config::default();
    config.storage = StorageConfig {
        path: Some(temp_dir.path().join("state.json")),
        ..Default::default()
    };

    {
        let engine = NotificationEngine::from_config(&config);
        engine
            .searches
            .save_search(SearchCriteria::in_location("Sandton"))
            .unwrap();
        let stored = engine.run_checks(&[Listing::new("L1", "Room", 4000, "Sandton")], &[], None);
        assert_eq!(stored.len(), 1);
    }

    let engine = NotificationEngine::from_config(&config);
    assert_eq!(engine.searches.get_saved_searches().len(), 1);
    assert_eq!(engine.inbox.unread_count(), 1);
    assert!(engine
        .run_checks(&[Listing::new("L1", "Room", 4000, "Sandton")], &[], None)
        .is_empty());
}

#[test]
fn unusable_storage_never_fails_the_caller() {
    let engine = NotificationEngine::new(
        Arc::new(Repository::new(
            Box::new(MemoryStore::disabled()),
            Default::default(),
        )),
        &Config::default(),
    );

    assert!(engine
        .searches
        .save_search(SearchCriteria::in_location("Sandton"))
        .is_none());
    assert!(engine.searches.get_saved_searches().is_empty());
    assert_eq!(engine.engagement.track_listing_view("L1", None), 0);
    assert!(!engine.engagement.add_to_compare("L1").success);
    assert!(engine.responses.get_response_time_badge("LL1").is_none());
    engine.inbox.mark_notification_read("n1");
    engine.inbox.clear_notifications();
}

#[test]
fn corrupt_blob_reads_as_empty() {
    let store = MemoryStore::new();
    store
        .set("notifications", "[{\"id\":\"n1\",\"type\":".to_string())
        .unwrap();
    store
        .set(
            "savedSearches",
            r#"[{"id":"s1","location":"Sandton","createdAt":"2024-05-01T10:00:00Z"},{"id":7}]"#.to_string(),
        )
        .unwrap();
    let engine = NotificationEngine::new(
        Arc::new(Repository::new(Box::new(store), Default::default())),
        &Config::default(),
    );

    assert!(engine.inbox.get_notifications().is_empty());
    let searches = engine.searches.get_saved_searches();
    assert_eq!(searches.len(), 1);
    assert_eq!(searches[0].id, "s1");
}
