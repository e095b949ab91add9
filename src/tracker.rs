//! The tracker turns geofence transitions into ring reports.
//!
//! It wires a [`RingResolver`] to a [`RingReporter`]: each event is resolved
//! synchronously and, when that works, a report is dispatched in the
//! background. Events are independent of each other; a failed event leaves
//! nothing behind that could affect the next one.
//!
//! ```no_run
//! # use std::sync::Arc;
//! # use ring_tracker::config::{InMemoryConfig, ReporterConfig};
//! # use ring_tracker::event::{TransitionEvent, TransitionKind};
//! # use ring_tracker::tracker::Tracker;
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let tracker = Tracker::new(
//!     Arc::new(InMemoryConfig::new()),
//!     ReporterConfig::default(),
//!     tokio::runtime::Handle::current(),
//! )?;
//!
//! let ev = TransitionEvent::parse(TransitionKind::Enter, ["2", "0", "1"])?;
//! let dispatch = tracker.handle_event(&ev)?;
//! assert_eq!(dispatch.ring.get(), 0);
//! # Ok(()) }
//! ```

mod reporter;
mod resolver;

pub use reporter::{RingReporter, RING_FIELD};
pub use resolver::{resolve, RingIndex, RingResolver};

use crate::config::{ConfigProvider, ReporterConfig};
use crate::errors::{DeliveryError, TrackerError};
use crate::event::{TransitionEvent, TransitionKind};
use crate::net::{HttpTransport, Transport};
use log::{error, info, warn};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::runtime::Handle;
use tokio::task::{JoinError, JoinHandle, JoinSet};

/// Outcome of a handled event: the resolved ring and the in-flight report.
#[derive(Debug)]
pub struct Dispatch {
    pub ring: RingIndex,
    /// Completes once the report attempt is over, whatever its outcome.
    pub report: JoinHandle<()>,
}

/// Counters for a [`Tracker::watch`] session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WatchSummary {
    /// Events resolved and reported
    pub handled: usize,
    /// Events that parsed but did not resolve
    pub rejected: usize,
    /// Lines that were not a transition event
    pub unreadable: usize,
}

pub struct Tracker {
    resolver: RingResolver,
    reporter: RingReporter,
}

impl Tracker {
    /// Creates a tracker that reports over HTTP.
    pub fn new(config: Arc<dyn ConfigProvider>, reporter_config: ReporterConfig, runtime: Handle) -> Result<Self, DeliveryError> {
        let transport = HttpTransport::new(&reporter_config.user_agent, reporter_config.request_timeout)?;
        Ok(Self::with_transport(config, Arc::new(transport), runtime))
    }

    pub fn with_transport(config: Arc<dyn ConfigProvider>, transport: Arc<dyn Transport>, runtime: Handle) -> Self {
        Self {
            resolver: RingResolver::new(),
            reporter: RingReporter::new(config, transport, runtime),
        }
    }

    /// Resolves `event` and dispatches its report.
    ///
    /// Resolution errors are returned and nothing is sent. Delivery problems
    /// never show up here.
    pub fn handle_event(&self, event: &TransitionEvent) -> Result<Dispatch, TrackerError> {
        let ring = match self.resolver.resolve(event) {
            Ok(ring) => ring,
            Err(e) => {
                warn!("Dropping {} event: {}", event.kind, e);
                return Err(e);
            }
        };

        info!("{} {:?} resolved to ring {}", event.kind, event.triggered_zone_ids, ring);
        let report = self.reporter.report(ring);

        Ok(Dispatch { ring, report })
    }

    /// Same as [`Tracker::handle_event`] for the host's string request ids.
    pub fn handle_raw<I, S>(&self, kind: TransitionKind, request_ids: I) -> Result<Dispatch, TrackerError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let event = TransitionEvent::parse(kind, request_ids).inspect_err(|e| {
            warn!("Dropping {} event: {}", kind, e);
        })?;
        self.handle_event(&event)
    }

    pub fn reporter(&self) -> &RingReporter {
        &self.reporter
    }

    /// Handles JSON-line transition events from `reader` until it is exhausted.
    ///
    /// Unreadable lines and rejected events are logged and skipped. Finished
    /// reports are reaped while reading, so a long session only holds the ones
    /// still in flight. Once input ends, the remaining reports are awaited.
    /// `on_ring` is called for every resolved ring.
    pub async fn watch<R>(&self, reader: R, mut on_ring: impl FnMut(RingIndex)) -> std::io::Result<WatchSummary>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut summary = WatchSummary::default();
        let mut in_flight = JoinSet::new();
        let mut lines = reader.lines();

        while let Some(line) = lines.next_line().await? {
            while let Some(done) = in_flight.try_join_next() {
                log_report_outcome(done);
            }

            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let event: TransitionEvent = match serde_json::from_str(line) {
                Ok(ev) => ev,
                Err(e) => {
                    error!("Skipping unreadable event {line:?}: {e}");
                    summary.unreadable += 1;
                    continue;
                }
            };

            match self.handle_event(&event) {
                Ok(dispatch) => {
                    summary.handled += 1;
                    on_ring(dispatch.ring);
                    in_flight.spawn(dispatch.report);
                }
                Err(_) => summary.rejected += 1,
            }
        }

        info!("Input closed, waiting for {} report(s)", in_flight.len());
        while let Some(done) = in_flight.join_next().await {
            log_report_outcome(done);
        }

        Ok(summary)
    }
}

fn log_report_outcome(outcome: Result<Result<(), JoinError>, JoinError>) {
    if let Err(e) = outcome.and_then(|report| report) {
        error!("Report task failed: {e}");
    }
}
