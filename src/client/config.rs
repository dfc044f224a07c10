//! Client configuration: where to send requests, how long to wait, how often
//! to retry.

use std::time::Duration;

use url::Url;

use crate::error::{Result, SchoolDiggerError};

pub const DEFAULT_BASE_URL: &str = "https://api.schooldigger.com/v2.3/";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Versioned API root. Always ends with `/`.
    pub base_url: Url,
    /// Per-attempt request timeout.
    pub timeout: Duration,
    pub retry: RetryConfig,
}

impl ClientConfig {
    /// Parse a base URL, appending the trailing slash `Url::join` needs to
    /// keep the version segment.
    pub fn parse_base_url(raw: &str) -> Result<Url> {
        let mut raw = raw.trim().to_string();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        let url = Url::parse(&raw).map_err(|e| {
            SchoolDiggerError::Configuration(format!("invalid base URL '{raw}': {e}"))
        })?;
        if url.cannot_be_a_base() {
            return Err(SchoolDiggerError::Configuration(format!(
                "base URL '{raw}' cannot be used as a base"
            )));
        }
        Ok(url)
    }

    pub fn with_base_url(mut self, raw: &str) -> Result<Self> {
        self.base_url = Self::parse_base_url(raw)?;
        Ok(self)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            timeout: DEFAULT_TIMEOUT,
            retry: RetryConfig::default(),
        }
    }
}

/// Retry policy for transport-level failures only.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Extra attempts after the first one.
    pub max_retries: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_backoff: Duration::from_millis(200),
            max_backoff: Duration::from_secs(2),
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }

    /// Backoff before retry number `attempt` (0-based).
    pub fn backoff_for_attempt(&self, attempt: u32) -> Duration {
        let backoff_ms = self.initial_backoff.as_millis() as f64
            * self.backoff_multiplier.powi(attempt as i32);
        let backoff = Duration::from_millis(backoff_ms as u64);
        std::cmp::min(backoff, self.max_backoff)
    }

    pub fn total_attempts(&self) -> u32 {
        self.max_retries + 1
    }
}
