//! HTTP client builder. Every client it produces has a request and a connect timeout.

use std::time::Duration;

/// HTTP client configuration.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Upper bound for a whole request, including reading the body.
    pub timeout: Duration,
    /// Upper bound for establishing the TCP/TLS connection.
    pub connect_timeout: Duration,
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(5),
            user_agent: format!("dealflow-meeting-auth/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Builder for provider HTTP clients.
///
/// Clients never retry on their own; the caller decides whether a failed call is
/// worth repeating.
pub struct HttpClientBuilder {
    config: HttpClientConfig,
    default_headers: reqwest::header::HeaderMap,
}

impl HttpClientBuilder {
    pub fn new() -> Self {
        Self {
            config: HttpClientConfig::default(),
            default_headers: reqwest::header::HeaderMap::new(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn with_connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.config.connect_timeout = connect_timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: String) -> Self {
        self.config.user_agent = user_agent;
        self
    }

    /// Headers sent with every request, e.g. a static API key. Mark secrets sensitive.
    pub fn with_default_headers(mut self, headers: reqwest::header::HeaderMap) -> Self {
        self.default_headers = headers;
        self
    }

    pub fn build(self) -> Result<reqwest::Client, crate::Error> {
        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(self.config.timeout)
            .connect_timeout(self.config.connect_timeout)
            .user_agent(self.config.user_agent)
            .default_headers(self.default_headers)
            .build()?;

        Ok(client)
    }
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
