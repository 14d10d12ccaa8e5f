use async_trait::async_trait;

use super::AccessToken;
use crate::error::Error;

/// Performs one token-endpoint exchange.
///
/// Implementations must not cache; caching and refresh coalescing belong to
/// [`super::TokenCache`].
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn fetch_token(&self) -> Result<AccessToken, Error>;

    /// Short name used in log lines.
    fn name(&self) -> &str;
}
