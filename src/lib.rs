pub mod config;
pub mod errors;
pub mod event;
pub mod net;
pub mod tracker;
pub mod zone;

pub use config::{ConfigProvider, Destination, ReporterConfig};
pub use errors::{ConfigError, DeliveryError, TrackerError};
pub use event::{TransitionEvent, TransitionKind};
pub use tracker::{Dispatch, RingIndex, RingReporter, RingResolver, Tracker, WatchSummary};
pub use zone::ZoneId;
