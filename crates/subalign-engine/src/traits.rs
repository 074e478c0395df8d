//! Engine traits

use anyhow::Result;
use async_trait::async_trait;

/// The external sentence-splitting collaborator.
///
/// Implementations take flattened caption text and return an ordered list
/// of sentences that, concatenated, approximately reconstruct the input.
/// The engine relies on that ordering guarantee and nothing else.
#[async_trait]
pub trait SentenceSplitter: Send + Sync {
    /// Split flattened text into ordered sentences. `use_cache` lets the
    /// implementation serve a repeat request without a round trip.
    async fn split(&self, text: &str, use_cache: bool) -> Result<Vec<String>>;
}
