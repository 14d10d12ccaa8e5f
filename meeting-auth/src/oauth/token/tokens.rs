//! OAuth token types.

use chrono::{DateTime, Duration, Utc};
use secrecy::SecretString;

/// A freshly minted access token as returned by a token endpoint.
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub value: SecretString,
    /// Lifetime reported by the provider (`expires_in`).
    pub expires_in: Duration,
}

/// An access token held by a cache, anchored to an absolute expiry instant.
#[derive(Debug, Clone)]
pub struct CachedToken {
    pub value: SecretString,
    pub expires_at: DateTime<Utc>,
}

impl CachedToken {
    pub fn issued_at(token: AccessToken, now: DateTime<Utc>) -> Self {
        Self {
            value: token.value,
            expires_at: now
                .checked_add_signed(token.expires_in)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        }
    }

    /// A token is usable only while `now + margin` is strictly before its expiry.
    pub fn is_valid_at(&self, now: DateTime<Utc>, margin: Duration) -> bool {
        now.checked_add_signed(margin)
            .is_some_and(|deadline| deadline < self.expires_at)
    }
}
