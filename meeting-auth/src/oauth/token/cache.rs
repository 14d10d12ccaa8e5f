//! Single-token cache with coalesced refresh.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Duration;
use secrecy::SecretString;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};

use super::{CachedToken, Clock, SystemClock, TokenSource};
use crate::error::{Error, ErrorKind};

/// Holds one access token for one credential set and refreshes it on demand.
///
/// Concurrent callers that find the token stale queue on `refresh_lock`; the first
/// one performs the exchange and the rest take its outcome, so N concurrent callers
/// cause exactly one call to the token endpoint whether that call succeeds or fails.
pub struct TokenCache<S: TokenSource, C: Clock = SystemClock> {
    source: S,
    clock: C,
    margin: Duration,
    cached: RwLock<Option<CachedToken>>,
    /// Bumped after every exchange, successful or not.
    generation: AtomicU64,
    /// Failure of the most recent exchange, handed to callers that queued behind it.
    refresh_lock: Mutex<Option<FailedRefresh>>,
}

struct FailedRefresh {
    generation: u64,
    error_kind: ErrorKind,
    message: String,
}

impl FailedRefresh {
    fn to_error(&self) -> Error {
        Error {
            source: Some(self.message.clone().into()),
            error_kind: self.error_kind.clone(),
        }
    }
}

impl<S: TokenSource> TokenCache<S, SystemClock> {
    pub fn new(source: S, margin: std::time::Duration) -> Self {
        Self::with_clock(source, SystemClock, margin)
    }
}

impl<S: TokenSource, C: Clock> TokenCache<S, C> {
    pub fn with_clock(source: S, clock: C, margin: std::time::Duration) -> Self {
        Self {
            source,
            clock,
            margin: Duration::from_std(margin).unwrap_or(Duration::MAX),
            cached: RwLock::new(None),
            generation: AtomicU64::new(0),
            refresh_lock: Mutex::new(None),
        }
    }

    /// Returns a token that is valid for at least the configured margin, fetching a
    /// new one when the cache is empty or stale.
    pub async fn get_token(&self) -> Result<SecretString, Error> {
        if let Some(token) = self.current().await {
            return Ok(token);
        }

        let seen = self.generation.load(Ordering::Acquire);
        let mut last_failure = self.refresh_lock.lock().await;

        // Another caller may have refreshed while we waited for the lock.
        if let Some(token) = self.current().await {
            debug!(source = self.source.name(), "token refreshed by a concurrent caller");
            return Ok(token);
        }
        if let Some(failure) = last_failure
            .as_ref()
            .filter(|failure| failure.generation > seen)
        {
            debug!(source = self.source.name(), "concurrent token refresh failed");
            return Err(failure.to_error());
        }

        debug!(source = self.source.name(), "access token missing or stale, fetching");
        // Expiry counts from before the request so a slow exchange cannot eat the margin.
        let requested_at = self.clock.now();
        let result = self.source.fetch_token().await;
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;

        match result {
            Ok(fresh) => {
                *last_failure = None;
                let cached = CachedToken::issued_at(fresh, requested_at);
                let value = cached.value.clone();
                *self.cached.write().await = Some(cached);
                Ok(value)
            }
            Err(err) => {
                warn!(source = self.source.name(), "token exchange failed: {err}");
                *last_failure = Some(FailedRefresh {
                    generation,
                    error_kind: err.error_kind.clone(),
                    message: err.to_string(),
                });
                Err(err)
            }
        }
    }

    /// Drops the cached token so the next `get_token` fetches a new one.
    pub async fn invalidate(&self) {
        *self.cached.write().await = None;
    }

    async fn current(&self) -> Option<SecretString> {
        let now = self.clock.now();
        self.cached
            .read()
            .await
            .as_ref()
            .filter(|token| token.is_valid_at(now, self.margin))
            .map(|token| token.value.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{oauth_error, OAuthErrorKind};
    use crate::oauth::token::AccessToken;
    use async_trait::async_trait;
    use chrono::{DateTime, TimeZone, Utc};
    use secrecy::ExposeSecret;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex as StdMutex};

    #[derive(Clone)]
    struct FakeClock {
        now: Arc<StdMutex<DateTime<Utc>>>,
    }

    impl FakeClock {
        fn new() -> Self {
            Self {
                now: Arc::new(StdMutex::new(
                    Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap(),
                )),
            }
        }

        fn advance(&self, by: Duration) {
            let mut now = self.now.lock().unwrap();
            *now += by;
        }
    }

    impl Clock for FakeClock {
        fn now(&self) -> DateTime<Utc> {
            *self.now.lock().unwrap()
        }
    }

    struct CountingSource {
        calls: Arc<AtomicUsize>,
        expires_in: Duration,
        delay: std::time::Duration,
        fail: AtomicBool,
        always_fail: bool,
        slow_clock: Option<(FakeClock, Duration)>,
    }

    impl CountingSource {
        fn new(calls: Arc<AtomicUsize>, expires_in: Duration) -> Self {
            Self {
                calls,
                expires_in,
                delay: std::time::Duration::ZERO,
                fail: AtomicBool::new(false),
                always_fail: false,
                slow_clock: None,
            }
        }
    }

    #[async_trait]
    impl TokenSource for CountingSource {
        async fn fetch_token(&self) -> Result<AccessToken, Error> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            if let Some((clock, by)) = &self.slow_clock {
                clock.advance(*by);
            }
            if self.always_fail {
                return Err(oauth_error(
                    OAuthErrorKind::TokenExchangeFailed { status: 429 },
                    "rate limited",
                ));
            }
            if self.fail.swap(false, Ordering::SeqCst) {
                return Err(oauth_error(
                    OAuthErrorKind::TokenExchangeFailed { status: 401 },
                    "invalid_client",
                ));
            }
            Ok(AccessToken {
                value: SecretString::from(format!("token-{n}")),
                expires_in: self.expires_in,
            })
        }

        fn name(&self) -> &str {
            "counting"
        }
    }

    fn margin() -> std::time::Duration {
        std::time::Duration::from_secs(10)
    }

    #[tokio::test]
    async fn repeated_calls_inside_window_fetch_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let clock = FakeClock::new();
        let cache = TokenCache::with_clock(
            CountingSource::new(calls.clone(), Duration::hours(1)),
            clock.clone(),
            margin(),
        );

        for _ in 0..5 {
            let token = cache.get_token().await.unwrap();
            assert_eq!(token.expose_secret(), "token-1");
            clock.advance(Duration::minutes(5));
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn token_inside_safety_margin_is_refreshed() {
        let calls = Arc::new(AtomicUsize::new(0));
        let clock = FakeClock::new();
        let cache = TokenCache::with_clock(
            CountingSource::new(calls.clone(), Duration::seconds(60)),
            clock.clone(),
            margin(),
        );

        cache.get_token().await.unwrap();
        clock.advance(Duration::seconds(49));
        assert_eq!(cache.get_token().await.unwrap().expose_secret(), "token-1");

        // 50s in: now + 10s margin is no longer strictly before expiry.
        clock.advance(Duration::seconds(1));
        assert_eq!(cache.get_token().await.unwrap().expose_secret(), "token-2");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn concurrent_callers_after_expiry_share_one_refresh() {
        let calls = Arc::new(AtomicUsize::new(0));
        let clock = FakeClock::new();
        let mut source = CountingSource::new(calls.clone(), Duration::hours(1));
        source.delay = std::time::Duration::from_millis(50);
        let cache = Arc::new(TokenCache::with_clock(source, clock.clone(), margin()));

        cache.get_token().await.unwrap();
        clock.advance(Duration::hours(2));

        let mut tasks = tokio::task::JoinSet::new();
        for _ in 0..16 {
            let cache = Arc::clone(&cache);
            tasks.spawn(async move {
                cache
                    .get_token()
                    .await
                    .map(|t| t.expose_secret().to_string())
            });
        }

        while let Some(result) = tasks.join_next().await {
            assert_eq!(result.unwrap().unwrap(), "token-2");
        }
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn concurrent_callers_share_one_failed_refresh() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut source = CountingSource::new(calls.clone(), Duration::hours(1));
        source.delay = std::time::Duration::from_millis(100);
        source.always_fail = true;
        let cache = Arc::new(TokenCache::with_clock(source, FakeClock::new(), margin()));

        let started = std::time::Instant::now();
        let mut tasks = tokio::task::JoinSet::new();
        for _ in 0..8 {
            let cache = Arc::clone(&cache);
            tasks.spawn(async move { cache.get_token().await.map(|_| ()) });
        }

        while let Some(result) = tasks.join_next().await {
            let err = result.unwrap().unwrap_err();
            assert_eq!(
                err.error_kind,
                crate::ErrorKind::OAuth(OAuthErrorKind::TokenExchangeFailed { status: 429 })
            );
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(started.elapsed() < std::time::Duration::from_millis(400));
    }

    #[tokio::test]
    async fn expiry_counts_from_before_a_slow_exchange() {
        let calls = Arc::new(AtomicUsize::new(0));
        let clock = FakeClock::new();
        let mut source = CountingSource::new(calls.clone(), Duration::seconds(60));
        source.slow_clock = Some((clock.clone(), Duration::seconds(8)));
        let cache = TokenCache::with_clock(source, clock.clone(), margin());

        // Requested at t0, answered at t0+8; the token expires at t0+60.
        cache.get_token().await.unwrap();
        // The fetch advanced the clock to t0+8; move to t0+50, inside the margin.
        clock.advance(Duration::seconds(42));

        assert_eq!(cache.get_token().await.unwrap().expose_secret(), "token-2");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failed_exchange_is_not_cached() {
        let calls = Arc::new(AtomicUsize::new(0));
        let source = CountingSource::new(calls.clone(), Duration::hours(1));
        source.fail.store(true, Ordering::SeqCst);
        let cache = TokenCache::with_clock(source, FakeClock::new(), margin());

        let err = cache.get_token().await.unwrap_err();
        assert_eq!(
            err.error_kind,
            crate::ErrorKind::OAuth(OAuthErrorKind::TokenExchangeFailed { status: 401 })
        );

        assert_eq!(cache.get_token().await.unwrap().expose_secret(), "token-2");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn invalidate_forces_a_new_exchange() {
        let calls = Arc::new(AtomicUsize::new(0));
        let cache = TokenCache::with_clock(
            CountingSource::new(calls.clone(), Duration::hours(1)),
            FakeClock::new(),
            margin(),
        );

        cache.get_token().await.unwrap();
        cache.invalidate().await;
        assert_eq!(cache.get_token().await.unwrap().expose_secret(), "token-2");
    }
}
