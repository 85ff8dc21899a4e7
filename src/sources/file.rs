use super::{parse_listings, ListingSource};
use crate::models::Listing;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::{debug, info};

/// Listings read from a JSON export of the backend collection
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ListingSource for JsonFileSource {
    async fn fetch(&self) -> Result<Vec<Listing>> {
        debug!("Reading listings from {}", self.path.display());

        let body = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read listings file {}", self.path.display()))?;

        let listings = parse_listings(&self.path.display().to_string(), &body)?;
        info!("Loaded {} listing(s) from {}", listings.len(), self.path.display());
        Ok(listings)
    }

    fn source_name(&self) -> &'static str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn reads_listing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("listings.json");
        std::fs::write(
            &path,
            r#"[{"id":"L1","title":"Room","price":4500,"location":"Sandton","amenities":["WiFi"]}]"#,
        )
        .unwrap();

        let listings = JsonFileSource::new(&path).fetch().await.unwrap();
        assert_eq!(listings.len(), 1);
        assert!(listings[0].has_amenity("wifi"));
    }

    #[tokio::test]
    async fn missing_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let source = JsonFileSource::new(temp_dir.path().join("absent.json"));

        let err = source.fetch().await.unwrap_err();
        assert!(err.to_string().contains("Failed to read listings file"));
    }
}
