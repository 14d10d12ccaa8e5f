//! Access-token caching with coalesced refresh.

mod cache;
mod clock;
mod source;
mod tokens;

pub use cache::TokenCache;
pub use clock::{Clock, SystemClock};
pub use source::TokenSource;
pub use tokens::{AccessToken, CachedToken};
