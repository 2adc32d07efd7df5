use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::domain::clean_domain;
use crate::core::error::RadarError;

/// One row of the CSE roster CSV.
#[derive(Debug, Clone, Deserialize)]
pub struct RosterRecord {
    #[serde(rename = "Organisation Name")]
    pub organisation: String,
    #[serde(rename = "Whitelisted Domains")]
    pub domain: String,
}

/// The generated configuration document consumed by the CT monitor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    pub keywords: Vec<String>,
    pub whitelisted_domains: Vec<String>,
}

impl MonitorConfig {
    pub fn whitelist_set(&self) -> HashSet<String> {
        self.whitelisted_domains.iter().cloned().collect()
    }
}

/// Read the roster and load the legitimate domains, cleaned the same way
/// the config builder cleans them. Shared with the typosquat scanner.
pub fn load_target_domains(roster: &Path) -> Result<Vec<String>, RadarError> {
    let mut reader = csv::Reader::from_path(roster)
        .map_err(|e| RadarError::Roster(format!("{}: {}", roster.display(), e)))?;
    let mut domains = Vec::new();
    for record in reader.deserialize::<RosterRecord>() {
        let record = record?;
        domains.push(clean_domain(&record.domain));
    }
    Ok(domains)
}

/// Derive the keyword and whitelist sets from roster rows.
///
/// Keywords are the registrable-domain stems plus, for each organisation
/// name, its first word and (for multi-word names) an acronym of first
/// letters. Everything is case-folded.
pub fn build_config<R: io::Read>(reader: R) -> Result<MonitorConfig, RadarError> {
    let mut keywords = BTreeSet::new();
    let mut whitelist = BTreeSet::new();

    let mut csv_reader = csv::Reader::from_reader(reader);
    for record in csv_reader.deserialize::<RosterRecord>() {
        let record = record?;

        let domain = clean_domain(&record.domain);
        if let Some(stem) = domain.split('.').next() {
            if !stem.is_empty() {
                keywords.insert(stem.to_string());
            }
        }
        whitelist.insert(domain);

        let name = record.organisation.to_lowercase();
        let parts: Vec<&str> = name.split_whitespace().collect();
        if parts.len() > 1 {
            let acronym: String = parts.iter().filter_map(|p| p.chars().next()).collect();
            keywords.insert(acronym);
        }
        if let Some(first) = parts.first() {
            keywords.insert(first.to_string());
        }
    }

    Ok(MonitorConfig {
        keywords: keywords.into_iter().collect(),
        whitelisted_domains: whitelist.into_iter().collect(),
    })
}

/// Build the config from the roster CSV and persist it as JSON. Nothing
/// is written when the roster cannot be read or parsed.
pub fn generate(roster: &Path, out: &Path) -> Result<(), RadarError> {
    info!("Loading CSE roster from {}", roster.display());
    let file = fs::File::open(roster)
        .map_err(|e| RadarError::Roster(format!("{}: {}", roster.display(), e)))?;
    let config = build_config(file)?;

    if let Some(parent) = out.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(&config)?;
    fs::write(out, json)?;

    info!(
        "Wrote {} with {} keywords and {} whitelisted domains",
        out.display(),
        config.keywords.len(),
        config.whitelisted_domains.len()
    );
    Ok(())
}

/// Load a previously generated config. A missing file is a distinct
/// error so the monitor can tell the operator to run `gen-config`.
pub fn load(path: &Path) -> Result<MonitorConfig, RadarError> {
    if !path.exists() {
        return Err(RadarError::Config(format!(
            "config file not found at {}; run `phishradar gen-config` first",
            path.display()
        )));
    }
    let content = fs::read_to_string(path)?;
    let config: MonitorConfig = serde_json::from_str(&content)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROSTER: &str = "\
Organisation Name,Whitelisted Domains
Real Bank of Testland,www.Example.com
Single,example.org
";

    #[test]
    fn whitelist_is_cleaned_and_case_folded() {
        let config = build_config(ROSTER.as_bytes()).unwrap();
        assert_eq!(
            config.whitelisted_domains,
            vec!["example.com".to_string(), "example.org".to_string()]
        );
    }

    #[test]
    fn keywords_cover_stems_first_words_and_acronyms() {
        let config = build_config(ROSTER.as_bytes()).unwrap();
        for expected in ["example", "real", "rbot", "single"] {
            assert!(
                config.keywords.contains(&expected.to_string()),
                "missing keyword {expected}: {:?}",
                config.keywords
            );
        }
    }

    #[test]
    fn duplicate_rows_do_not_duplicate_entries() {
        let roster = "\
Organisation Name,Whitelisted Domains
Real Bank,realbank.com
Real Bank,www.realbank.com
";
        let config = build_config(roster.as_bytes()).unwrap();
        assert_eq!(config.whitelisted_domains, vec!["realbank.com".to_string()]);
    }
}
