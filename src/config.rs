//! Configuration consumed by the tracker.
//!
//! Two kinds of configuration live here:
//!
//! - **Destination settings** (`server_name`, `port`) are owned by the host
//!   application and read through a [`ConfigProvider`]. They are looked up fresh
//!   on every report, so a change made by the host takes effect on the next
//!   event without restarting anything.
//! - **Reporter settings** ([`ReporterConfig`]) control the HTTP client itself
//!   and are fixed when the tracker is built.
//!
//! # Example
//!
//! ```rust
//! use ring_tracker::config::{ConfigProvider, Destination, InMemoryConfig, KEY_SERVER_NAME};
//!
//! let store = InMemoryConfig::new();
//! assert_eq!(Destination::resolve(&store).unwrap().url().unwrap().as_str(), "http://henfred.hopto.org:5155/");
//!
//! store.set(KEY_SERVER_NAME, "10.0.0.7");
//! assert_eq!(Destination::resolve(&store).unwrap().host, "10.0.0.7");
//! ```

mod json;
mod memory;

pub use json::JsonConfigStore;
pub use memory::InMemoryConfig;

use crate::errors::{ConfigError, DeliveryError};
use std::fmt::{Display, Formatter};
use std::time::Duration;
use url::Url;

/// Key holding the listener's host name or address.
pub const KEY_SERVER_NAME: &str = "server_name";
/// Key holding the listener's port, stored as a string.
pub const KEY_PORT: &str = "port";

pub const DEFAULT_SERVER_NAME: &str = "henfred.hopto.org";
pub const DEFAULT_PORT: u16 = 5155;

const DEFAULT_USER_AGENT: &str = concat!("RingTracker/", env!("CARGO_PKG_VERSION"));
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Read-only view on the host's settings store.
pub trait ConfigProvider: Send + Sync {
    /// Returns the raw value stored under `key`, or `None` when unset.
    fn get_string(&self, key: &str) -> Option<String>;
}

/// Where reports are sent to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    pub host: String,
    pub port: u16,
}

impl Default for Destination {
    fn default() -> Self {
        Self {
            host: DEFAULT_SERVER_NAME.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl Destination {
    /// Looks up the destination in `provider`, falling back to the defaults for
    /// unset keys. A port that is set but not a valid port number is an error.
    pub fn resolve(provider: &dyn ConfigProvider) -> Result<Self, DeliveryError> {
        let host = provider
            .get_string(KEY_SERVER_NAME)
            .unwrap_or_else(|| DEFAULT_SERVER_NAME.to_string());

        let port = match provider.get_string(KEY_PORT) {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| DeliveryError::InvalidPort(raw.clone()))?,
            None => DEFAULT_PORT,
        };

        Ok(Self { host, port })
    }

    /// Listener URL, always the root path.
    pub fn url(&self) -> Result<Url, DeliveryError> {
        Ok(Url::parse(&format!("http://{}:{}/", self.host, self.port))?)
    }
}

impl Display for Destination {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Settings for the reporter's HTTP client.
#[derive(Debug, Clone)]
pub struct ReporterConfig {
    /// User agent sent with every report
    pub user_agent: String,
    /// Upper bound for a single report, connect included
    pub request_timeout: Duration,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ReporterConfig {
    pub fn builder() -> ReporterConfigBuilder {
        ReporterConfigBuilder::default()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReporterConfigBuilder {
    inner: ReporterConfig,
}

impl ReporterConfigBuilder {
    #[inline]
    fn map(mut self, f: impl FnOnce(&mut ReporterConfig)) -> Self {
        f(&mut self.inner);
        self
    }

    pub fn user_agent<S: Into<String>>(self, ua: S) -> Self { self.map(|c| c.user_agent = ua.into()) }
    pub fn request_timeout(self, timeout: Duration) -> Self { self.map(|c| c.request_timeout = timeout) }

    /// Validate and build the final config.
    pub fn build(self) -> Result<ReporterConfig, ConfigError> {
        if self.inner.request_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.inner.user_agent.trim().is_empty() {
            return Err(ConfigError::EmptyUserAgent);
        }
        Ok(self.inner)
    }
}
