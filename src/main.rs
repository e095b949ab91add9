use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use ring_tracker::config::{ConfigProvider, InMemoryConfig, JsonConfigStore, ReporterConfig};
use ring_tracker::{RingIndex, RingResolver, Tracker, TransitionKind};
use tokio::io::BufReader;

#[derive(Parser, Debug)]
#[command(version, about = "Turns geofence transitions into ring reports")]
struct Cli {
    /// JSON settings file with `server_name` and `port`. Defaults apply when omitted.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Request timeout in milliseconds
    #[arg(long, global = true, default_value_t = 10_000)]
    timeout_ms: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the ring for a transition without reporting it
    Resolve {
        kind: Kind,
        /// Triggering zone ids
        #[arg(required = true)]
        zones: Vec<String>,
    },
    /// Send a single ring report and wait for the attempt to finish
    Report { ring: u64 },
    /// Read JSON-line transition events from stdin and report each one
    Watch,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Kind {
    Enter,
    Exit,
    Dwell,
}

impl From<Kind> for TransitionKind {
    fn from(k: Kind) -> Self {
        match k {
            Kind::Enter => TransitionKind::Enter,
            Kind::Exit => TransitionKind::Exit,
            Kind::Dwell => TransitionKind::Dwell,
        }
    }
}

/// Settings store plus HTTP client, only needed by the commands that send reports.
fn build_tracker(config: Option<PathBuf>, timeout_ms: u64) -> anyhow::Result<Tracker> {
    let settings: Arc<dyn ConfigProvider> = match config {
        Some(path) => {
            let store = JsonConfigStore::new(path.clone());
            store.load().with_context(|| format!("cannot use settings file {}", path.display()))?;
            Arc::new(store)
        }
        None => Arc::new(InMemoryConfig::new()),
    };

    let reporter_config = ReporterConfig::builder()
        .request_timeout(Duration::from_millis(timeout_ms))
        .build()?;

    Ok(Tracker::new(settings, reporter_config, tokio::runtime::Handle::current())?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    run(Cli::parse()).await
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Resolve { kind, zones } => {
            let ring = RingResolver::new().resolve_raw(kind.into(), &zones)?;
            println!("{ring}");
        }
        Command::Report { ring } => {
            let tracker = build_tracker(cli.config, cli.timeout_ms)?;
            tracker.reporter().report(RingIndex(ring)).await?;
        }
        Command::Watch => {
            let tracker = build_tracker(cli.config, cli.timeout_ms)?;
            let summary = tracker
                .watch(BufReader::new(tokio::io::stdin()), |ring| println!("{ring}"))
                .await?;
            info!(
                "Input closed: {} handled, {} rejected, {} unreadable",
                summary.handled, summary.rejected, summary.unreadable
            );
        }
    }

    Ok(())
}
