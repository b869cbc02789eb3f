//! Client configuration.

use std::time::Duration;

use quill_core::ApiBase;

/// Configuration for [`crate::AuthClient`] and its reqwest transport.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL.
    pub base: ApiBase,
    /// Per-request timeout. `None` leaves timeouts to the OS.
    pub timeout: Option<Duration>,
    /// `User-Agent` header value.
    pub user_agent: String,
}

impl ClientConfig {
    /// Configuration with defaults for the given base URL.
    pub fn new(base: ApiBase) -> Self {
        Self {
            base,
            timeout: None,
            user_agent: concat!("quill/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}
