//! Client configuration.

use std::time::Duration;

use crate::types::ApiUrl;

/// Request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// User agent sent with every request.
pub const DEFAULT_USER_AGENT: &str = concat!("collegeconnect/", env!("CARGO_PKG_VERSION"));

/// Settings for the shared HTTP client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base address every endpoint path is resolved against.
    pub base_url: ApiUrl,
    /// Per-request timeout.
    pub timeout: Duration,
    pub user_agent: String,
}

impl ClientConfig {
    /// Configuration for `base_url` with default timeout and user agent.
    pub fn new(base_url: ApiUrl) -> Self {
        Self {
            base_url,
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(ApiUrl::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DEFAULT_API_URL;

    #[test]
    fn default_points_at_local_backend() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url.as_str(), DEFAULT_API_URL);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.user_agent.starts_with("collegeconnect/"));
    }

    #[test]
    fn setters_override_defaults() {
        let config = ClientConfig::default()
            .with_timeout(Duration::from_secs(5))
            .with_user_agent("campus-kiosk/1.0");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.user_agent, "campus-kiosk/1.0");
    }
}
