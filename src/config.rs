use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Names of the storage entries, one JSON blob per key
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StorageKeys {
    pub saved_searches: String,
    pub notifications: String,
    pub view_counts: String,
    pub viewers: String,
    pub viewed_listings: String,
    pub area_subscriptions: String,
    pub seen_listings: String,
    pub landlord_responses: String,
    pub compare_list: String,
    pub quick_replies: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            saved_searches: "savedSearches".to_string(),
            notifications: "notifications".to_string(),
            view_counts: "listingViewCounts".to_string(),
            viewers: "listingViewers".to_string(),
            viewed_listings: "userViewedListings".to_string(),
            area_subscriptions: "areaSubscriptions".to_string(),
            seen_listings: "seenListingIds".to_string(),
            landlord_responses: "landlordResponseTimes".to_string(),
            compare_list: "compareList".to_string(),
            quick_replies: "quickReplyTemplates".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StorageConfig {
    /// Backing file for the key-value store; in-memory when unset
    pub path: Option<PathBuf>,
    /// Upper bound on total stored bytes, mimicking a browser storage quota
    pub quota_bytes: Option<usize>,
    pub keys: StorageKeys,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LimitsConfig {
    /// Inbox size; oldest notifications are evicted past it
    pub inbox: usize,
    /// Remembered listing ids for new-listing detection; ids still in the
    /// current feed are kept even past this bound
    pub seen_listings: usize,
    pub compare_list: usize,
    /// Contact clicks kept per landlord
    pub landlord_history: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            inbox: 100,
            seen_listings: 1000,
            compare_list: 4,
            landlord_history: 50,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BadgeConfig {
    pub fast_window_hours: i64,
    pub active_window_days: i64,
}

impl Default for BadgeConfig {
    fn default() -> Self {
        Self {
            fast_window_hours: 24,
            active_window_days: 7,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SourceConfig {
    /// Listing feed endpoint used when no file is given on the command line
    pub url: Option<String>,
    pub timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: None,
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub log_level: String,
    pub storage: StorageConfig,
    pub limits: LimitsConfig,
    pub badges: BadgeConfig,
    pub source: SourceConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            storage: StorageConfig::default(),
            limits: LimitsConfig::default(),
            badges: BadgeConfig::default(),
            source: SourceConfig::default(),
        }
    }
}

impl Config {
    /// Read a TOML config file. Missing sections fall back to defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&raw).with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        toml::from_str(raw).context("Failed to parse TOML config")
    }
}
