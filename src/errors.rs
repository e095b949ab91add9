use crate::event::TransitionKind;

/// Errors that stop a single transition event from being turned into a report.
///
/// None of these affect later events; the tracker simply drops the event.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TrackerError {
    #[error("Transition event carried no triggering zones")]
    NoTriggeringZones,

    #[error("Malformed zone id: {0:?}")]
    MalformedZoneId(String),

    #[error("Transition {0} does not map to a ring")]
    UnsupportedTransition(TransitionKind),
}

/// Errors raised while delivering a report. These never leave the reporter task.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("Invalid port in configuration: {0:?}")]
    InvalidPort(String),

    #[error("Invalid destination URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error(transparent)]
    Net(#[from] reqwest::Error),

    #[error("Listener answered with status {0}")]
    Status(u16),
}

/// Errors for reporter settings and configuration stores.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("request timeout must be greater than zero")]
    ZeroTimeout,

    #[error("user agent must not be empty")]
    EmptyUserAgent,

    #[error("Cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}
