use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::{error, warn};

use crate::config;
use crate::crawlers::ct_monitor::{self, MonitorFilter, MonitorOptions};
use crate::crawlers::typosquat::{scan_all, write_results, TyposquatScanner};
use crate::features;

/// Roster read/parse failures are logged, not fatal, and nothing is
/// written in that case.
pub fn run_gen_config(roster: &Path, out: &Path) -> Result<()> {
    if let Err(e) = config::generate(roster, out) {
        error!("Config generation failed: {}", e);
    }
    Ok(())
}

/// A missing config file is fatal here: the operator has to run
/// gen-config first. Feed failures also surface as errors.
pub async fn run_monitor(
    config_path: &Path,
    out: PathBuf,
    feed: String,
    keywords: Option<Vec<String>>,
) -> Result<()> {
    let (filter, output) = match keywords {
        Some(list) => {
            let lowered = list.into_iter().map(|k| k.to_lowercase()).collect();
            (MonitorFilter::keywords_only(lowered), None)
        }
        None => {
            let config = config::load(config_path)?;
            (MonitorFilter::from_config(&config), Some(out))
        }
    };
    ct_monitor::run(filter, MonitorOptions { feed_url: feed, output }).await?;
    Ok(())
}

/// One domain's scan failure never aborts the run; a roster that cannot
/// be read at all yields an empty (logged) run.
pub async fn run_typosquat(roster: &Path, out: &Path) -> Result<()> {
    let domains = match config::load_target_domains(roster) {
        Ok(domains) => domains,
        Err(e) => {
            error!("Could not load target domains: {}", e);
            return Ok(());
        }
    };
    if domains.is_empty() {
        warn!("Roster contains no target domains; nothing to scan");
        return Ok(());
    }

    let scanner = TyposquatScanner::from_system_conf()?;
    let found = scan_all(&scanner, &domains).await;
    write_results(&found, out)?;
    Ok(())
}

pub fn run_features(ct_input: &Path, typosquat_input: &Path, out: &Path) -> Result<()> {
    features::run(ct_input, typosquat_input, out)?;
    Ok(())
}
