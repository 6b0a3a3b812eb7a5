use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use serde::Deserialize;
use tracker_engine::{decode_page, PageContext, PageSession, SessionDeps};
use tracker_logging::{tracker_debug, tracker_info};

/// One recorded browser event. Page paths are relative to the scenario file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub enum Step {
    /// Navigation: the previous page's in-memory state is discarded.
    Load { url: String, page: PathBuf },
    Click { selector: String },
    /// In-place content change on the current page.
    Change { page: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Scenario {
    pub steps: Vec<Step>,
    #[serde(skip)]
    pub base_dir: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReplaySummary {
    pub page_loads: usize,
    pub apply_intents: usize,
}

pub fn load(path: &Path) -> anyhow::Result<Scenario> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading scenario {}", path.display()))?;
    let mut scenario: Scenario =
        ron::from_str(&content).with_context(|| format!("parsing scenario {}", path.display()))?;
    scenario.base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
    Ok(scenario)
}

pub fn replay(scenario: &Scenario, deps: &SessionDeps) -> anyhow::Result<ReplaySummary> {
    let mut summary = ReplaySummary::default();
    let mut session: Option<PageSession> = None;

    for (index, step) in scenario.steps.iter().enumerate() {
        tracker_debug!("Step {}: {:?}", index, step);
        match step {
            Step::Load { url, page } => {
                let html = read_page(&scenario.base_dir.join(page))?;
                let context = PageContext::parse(url, &html)
                    .with_context(|| format!("step {index}: loading {url}"))?;
                // Dropping the old session is the navigation.
                session = Some(PageSession::load(context, deps.clone()));
                summary.page_loads += 1;
            }
            Step::Click { selector } => {
                let Some(current) = session.as_mut() else {
                    bail!("step {index}: click before any page load");
                };
                if current.click(selector) {
                    summary.apply_intents += 1;
                }
            }
            Step::Change { page } => {
                let Some(current) = session.as_mut() else {
                    bail!("step {index}: page change before any page load");
                };
                let html = read_page(&scenario.base_dir.join(page))?;
                current.page_changed(&html);
            }
        }
    }

    tracker_info!("Replayed {} steps", scenario.steps.len());
    Ok(summary)
}

fn read_page(path: &Path) -> anyhow::Result<String> {
    let bytes = fs::read(path).with_context(|| format!("reading page {}", path.display()))?;
    let decoded = decode_page(&bytes, None)
        .with_context(|| format!("decoding page {}", path.display()))?;
    Ok(decoded.html)
}
