use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum NotificationType {
    NewListing,
    PriceDrop,
    SavedArea,
}

/// Inbox entry. Only `read` changes after creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listing_id: Option<String>,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub read: bool,
}

impl Notification {
    /// Candidate notification; the inbox assigns its id when it is stored
    pub fn new(
        notification_type: NotificationType,
        title: impl Into<String>,
        body: impl Into<String>,
        listing_id: Option<String>,
    ) -> Self {
        Self {
            id: String::new(),
            notification_type,
            title: title.into(),
            body: body.into(),
            listing_id,
            timestamp: Utc::now(),
            read: false,
        }
    }
}
