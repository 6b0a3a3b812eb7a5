mod config;
mod logging;
mod prompt;
mod scenario;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracker_engine::{FileStore, FixedAnswer, HostRegistry, JsonLinesSink, SessionDeps, TimedOverlay};
use tracker_logging::tracker_info;

use crate::logging::LogDestination;

/// Replays a recorded browsing scenario through the job tracker and prints
/// every finalized application as a JSON line.
#[derive(Debug, Parser)]
#[command(name = "tracker_app", version)]
struct Cli {
    /// Scenario file (RON) listing page loads, clicks and page changes.
    scenario: PathBuf,
    /// Tracker configuration file (RON).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Directory backing the persistent store. Overrides the config file.
    #[arg(long)]
    store_dir: Option<PathBuf>,
    /// Answer "yes" to every tracking prompt instead of asking on the terminal.
    #[arg(long)]
    yes: bool,
    #[arg(long, value_enum, default_value_t = LogDestination::Terminal)]
    log: LogDestination,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::initialize(cli.log);

    let config = config::load(cli.config.as_deref())?;
    let store_dir = cli.store_dir.unwrap_or_else(|| config.store_dir.clone());
    let store = FileStore::open(&store_dir)
        .with_context(|| format!("opening store at {}", store_dir.display()))?;

    let prompt: Arc<dyn tracker_engine::ConfirmPrompt> = match (cli.yes, config.auto_confirm) {
        (true, _) => Arc::new(FixedAnswer(true)),
        (false, Some(answer)) => Arc::new(FixedAnswer(answer)),
        (false, None) => Arc::new(prompt::TerminalPrompt),
    };

    let deps = SessionDeps {
        registry: Arc::new(HostRegistry::builtin().with_overrides(config.hosts.clone())),
        store: Arc::new(store),
        sink: Arc::new(JsonLinesSink::new(std::io::stdout())),
        prompt,
        acknowledger: Arc::new(TimedOverlay::new(Duration::from_millis(config.ack_duration_ms))),
    };

    let scenario = scenario::load(&cli.scenario)?;
    let summary = scenario::replay(&scenario, &deps)?;
    tracker_info!(
        "Replay finished: {} page loads, {} apply clicks recognized",
        summary.page_loads,
        summary.apply_intents
    );
    Ok(())
}
