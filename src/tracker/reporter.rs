use crate::config::{ConfigProvider, Destination};
use crate::errors::DeliveryError;
use crate::net::Transport;
use crate::tracker::resolver::RingIndex;
use log::{debug, info, warn};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Form field carrying the ring index.
pub const RING_FIELD: &str = "ring";

/// Best-effort delivery of ring indices to the remote listener.
///
/// Every report runs on its own task. The destination is looked up when the
/// task starts, failures are logged and dropped, and nothing is retried.
#[derive(Clone)]
pub struct RingReporter {
    config: Arc<dyn ConfigProvider>,
    transport: Arc<dyn Transport>,
    runtime: Handle,
}

impl RingReporter {
    pub fn new(config: Arc<dyn ConfigProvider>, transport: Arc<dyn Transport>, runtime: Handle) -> Self {
        Self {
            config,
            transport,
            runtime,
        }
    }

    /// Spawns the report and returns straight away.
    ///
    /// The returned handle only tells when the attempt is over. It can be
    /// dropped; the task keeps running detached.
    pub fn report(&self, ring: RingIndex) -> JoinHandle<()> {
        let config = self.config.clone();
        let transport = self.transport.clone();

        self.runtime.spawn(async move {
            if let Err(e) = deliver(config.as_ref(), transport.as_ref(), ring).await {
                warn!("Report of ring {} not delivered: {}", ring, e);
            }
        })
    }
}

async fn deliver(config: &dyn ConfigProvider, transport: &dyn Transport, ring: RingIndex) -> Result<(), DeliveryError> {
    let destination = Destination::resolve(config)?;
    let url = destination.url()?;

    debug!("Posting ring {} to {}", ring, url);
    let resp = transport
        .post_form(url, vec![(RING_FIELD.to_string(), ring.to_string())])
        .await?;

    if !resp.is_success() {
        return Err(DeliveryError::Status(resp.status));
    }

    info!("Ring {} delivered to {} ({} {})", ring, destination, resp.status, resp.status_text);
    debug!("Listener replied: {}", resp.text());
    Ok(())
}
