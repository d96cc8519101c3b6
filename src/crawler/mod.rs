use async_trait::async_trait;
use serde_json::Value;

use crate::error::FeedResult;

/// Campus exchange backend
pub mod campus;

/// Anything the feed can poll for a raw quote collection.
///
/// Implementations only fetch; sanitizing the payload is the adapter's job.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    async fn fetch(&self) -> FeedResult<Value>;
}
