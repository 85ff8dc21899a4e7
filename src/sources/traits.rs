use crate::models::Listing;
use anyhow::Result;
use async_trait::async_trait;

/// Common trait for listing feeds
/// Lets the checker run against a dumped file or the live backend alike
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Fetch the current listing set
    async fn fetch(&self) -> Result<Vec<Listing>>;

    /// Get the name of the source
    fn source_name(&self) -> &'static str;
}
