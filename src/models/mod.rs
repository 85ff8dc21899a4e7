mod engagement;
mod notification;
mod search;

pub use engagement::{AreaSubscription, CompareResult, QuickReply, ResponseBadge};
pub use notification::{Notification, NotificationType};
pub use search::{SavedSearch, SearchCriteria};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Room listing as served by the listing backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: String,
    #[serde(default)]
    pub title: String,
    /// Monthly rent in whole rand
    pub price: i64,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landlord_id: Option<String>,
    /// Backend fields this crate does not interpret
    #[serde(flatten)]
    pub raw_data: serde_json::Map<String, serde_json::Value>,
}

impl Listing {
    pub fn new(id: impl Into<String>, title: impl Into<String>, price: i64, location: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            price,
            location: location.into(),
            amenities: Vec::new(),
            created_at: None,
            landlord_id: None,
            raw_data: serde_json::Map::new(),
        }
    }

    pub fn with_amenities<I, S>(mut self, amenities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.amenities = amenities.into_iter().map(Into::into).collect();
        self
    }

    /// Case-insensitive amenity lookup
    pub fn has_amenity(&self, amenity: &str) -> bool {
        let wanted = amenity.trim().to_lowercase();
        self.amenities
            .iter()
            .any(|a| a.trim().to_lowercase() == wanted)
    }

    /// Case-insensitive containment of `needle` in the listing location.
    /// An empty needle matches every listing.
    pub fn location_contains(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        needle.is_empty() || self.location.to_lowercase().contains(&needle)
    }
}

/// Render a rand amount with thousands separators, e.g. `R4,500`
pub fn format_price(price: i64) -> String {
    let digits = price.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if price < 0 {
        format!("-R{}", grouped)
    } else {
        format!("R{}", grouped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_prices_with_separators() {
        assert_eq!(format_price(0), "R0");
        assert_eq!(format_price(950), "R950");
        assert_eq!(format_price(4500), "R4,500");
        assert_eq!(format_price(1_250_000), "R1,250,000");
    }

    #[test]
    fn location_match_ignores_case() {
        let listing = Listing::new("L1", "Room", 4500, "Sandton, Johannesburg");
        assert!(listing.location_contains("sandton"));
        assert!(listing.location_contains("  JOHANNESBURG "));
        assert!(listing.location_contains(""));
        assert!(!listing.location_contains("Rosebank"));
    }

    #[test]
    fn keeps_unknown_backend_fields() {
        let json = r#"{"id":"L9","title":"Garden cottage","price":6200,"location":"Parkhurst","amenities":["WiFi"],"bedrooms":1,"landlordId":"LL1"}"#;
        let listing: Listing = serde_json::from_str(json).unwrap();

        assert_eq!(listing.landlord_id.as_deref(), Some("LL1"));
        assert!(listing.has_amenity("wifi"));
        assert_eq!(listing.raw_data.get("bedrooms"), Some(&serde_json::json!(1)));

        let back = serde_json::to_value(&listing).unwrap();
        assert_eq!(back["bedrooms"], 1);
    }
}
