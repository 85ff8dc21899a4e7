use crate::models::{SavedSearch, SearchCriteria};
use crate::storage::Repository;
use std::sync::Arc;
use tracing::{debug, info};

/// Persisted list of the user's saved searches
pub struct SavedSearchRegistry {
    repo: Arc<Repository>,
}

impl SavedSearchRegistry {
    pub fn new(repo: Arc<Repository>) -> Self {
        Self { repo }
    }

    /// Store a new search. Returns `None` when the write did not persist.
    pub fn save_search(&self, criteria: SearchCriteria) -> Option<SavedSearch> {
        let key = &self.repo.keys().saved_searches;
        let mut searches: Vec<SavedSearch> = self.repo.load_list(key);
        let search = SavedSearch::new(criteria);
        searches.push(search.clone());

        if !self.repo.save(key, &searches) {
            return None;
        }
        info!("Saved search {} for '{}'", search.id, search.criteria.location);
        Some(search)
    }

    /// All saved searches, newest first
    pub fn get_saved_searches(&self) -> Vec<SavedSearch> {
        let mut searches: Vec<SavedSearch> = self.repo.load_list(&self.repo.keys().saved_searches);
        // stored oldest first; reverse so timestamp ties list the latest insert first
        searches.reverse();
        searches.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        searches
    }

    pub fn delete_saved_search(&self, id: &str) {
        let key = &self.repo.keys().saved_searches;
        let mut searches: Vec<SavedSearch> = self.repo.load_list(key);
        let before = searches.len();
        searches.retain(|s| s.id != id);

        if searches.len() != before && self.repo.save(key, &searches) {
            debug!("Deleted saved search {}", id);
        }
    }
}
