pub mod file;
pub mod http;
pub mod traits;

pub use file::JsonFileSource;
pub use http::HttpListingSource;
pub use traits::ListingSource;

use crate::models::Listing;
use crate::storage::repository::decode_lenient;
use anyhow::{bail, Context, Result};

/// Decode a listing feed body: either a bare array or `{"listings": [...]}`.
/// Records that do not parse are skipped.
pub fn parse_listings(context: &str, body: &str) -> Result<Vec<Listing>> {
    let value: serde_json::Value =
        serde_json::from_str(body).with_context(|| format!("{} is not valid JSON", context))?;
    let items = match value {
        serde_json::Value::Array(items) => items,
        serde_json::Value::Object(mut map) => match map.remove("listings") {
            Some(serde_json::Value::Array(items)) => items,
            _ => bail!("{} has no 'listings' array", context),
        },
        _ => bail!("{} is neither a list nor an object", context),
    };
    Ok(decode_lenient(context, items))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_bare_array_and_wrapped_object() {
        let bare = r#"[{"id":"L1","title":"Room","price":4500,"location":"Sandton"}]"#;
        let wrapped = r#"{"listings":[{"id":"L1","title":"Room","price":4500,"location":"Sandton"}]}"#;

        assert_eq!(parse_listings("bare", bare).unwrap().len(), 1);
        assert_eq!(parse_listings("wrapped", wrapped).unwrap().len(), 1);
    }

    #[test]
    fn skips_broken_records() {
        let body = r#"[{"id":"L1","price":4500},{"title":"no id"},{"id":"L3","price":"cheap"}]"#;
        let listings = parse_listings("feed", body).unwrap();
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].id, "L1");
    }

    #[test]
    fn rejects_unusable_bodies() {
        assert!(parse_listings("feed", "not json").is_err());
        assert!(parse_listings("feed", r#"{"items":[]}"#).is_err());
        assert!(parse_listings("feed", "42").is_err());
    }
}
