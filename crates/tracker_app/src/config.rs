use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;
use tracker_engine::HostProfile;
use tracker_logging::tracker_info;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub store_dir: PathBuf,
    pub ack_duration_ms: u64,
    /// Fixed answer for tracking prompts; `None` asks interactively.
    pub auto_confirm: Option<bool>,
    /// Added to, or replacing, the built-in host profiles by key.
    pub hosts: Vec<HostProfile>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            store_dir: PathBuf::from("./tracker_store"),
            ack_duration_ms: tracker_engine::DEFAULT_ACK_DURATION.as_millis() as u64,
            auto_confirm: None,
            hosts: Vec::new(),
        }
    }
}

pub fn load(path: Option<&Path>) -> anyhow::Result<TrackerConfig> {
    let Some(path) = path else {
        return Ok(TrackerConfig::default());
    };
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config = parse(&content).with_context(|| format!("parsing config {}", path.display()))?;
    tracker_info!(
        "Loaded config from {:?} with {} host override(s)",
        path,
        config.hosts.len()
    );
    Ok(config)
}

fn parse(content: &str) -> Result<TrackerConfig, ron::error::SpannedError> {
    ron::from_str(content)
}
