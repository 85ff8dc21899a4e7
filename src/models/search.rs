use super::Listing;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Filter criteria a renter saves to be alerted about
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchCriteria {
    /// Area or suburb, matched as a case-insensitive substring
    #[serde(default)]
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_min: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_max: Option<i64>,
    /// `[min, max]`, takes precedence over `price_min`/`price_max`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_range: Option<[i64; 2]>,
    #[serde(default)]
    pub amenities: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
}

impl SearchCriteria {
    pub fn in_location(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            ..Default::default()
        }
    }

    pub fn with_price_range(mut self, min: i64, max: i64) -> Self {
        self.price_range = Some([min, max]);
        self
    }

    pub fn with_amenity(mut self, amenity: impl Into<String>) -> Self {
        self.amenities.insert(amenity.into());
        self
    }

    /// Inclusive price bounds after resolving `price_range` against the
    /// individual min/max fields
    pub fn price_bounds(&self) -> (i64, i64) {
        match self.price_range {
            Some([min, max]) => (min, max),
            None => (
                self.price_min.unwrap_or(0),
                self.price_max.unwrap_or(i64::MAX),
            ),
        }
    }

    pub fn matches(&self, listing: &Listing) -> bool {
        let (min, max) = self.price_bounds();
        listing.location_contains(&self.location)
            && listing.price >= min
            && listing.price <= max
            && self.amenities.iter().all(|a| listing.has_amenity(a))
    }
}

/// A persisted search
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SavedSearch {
    pub id: String,
    #[serde(flatten)]
    pub criteria: SearchCriteria,
    pub created_at: DateTime<Utc>,
}

impl SavedSearch {
    pub fn new(criteria: SearchCriteria) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            criteria,
            created_at: Utc::now(),
        }
    }

    pub fn matches(&self, listing: &Listing) -> bool {
        self.criteria.matches(listing)
    }
}
