use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::{info, warn};
use url::Url;

use crate::core::error::RadarError;

const SPECIAL_CHARS: &[char] = &['@', '?', '=', '&', '%', '$', '#', '/'];

/// One row of the lexical feature table. Field order is the column
/// order, and the serde names are the header.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FeatureRow {
    pub url: String,
    pub url_length: usize,
    pub domain: String,
    pub domain_length: usize,
    pub dots_count: usize,
    pub hyphens_count: usize,
    pub special_chars_count: usize,
}

/// Load one domain per line, skipping blanks. A missing file is a
/// warning, not an error; the stage runs on whatever inputs exist.
pub fn load_domain_list(path: &Path) -> Vec<String> {
    if !path.exists() {
        warn!("Input file not found at {}; skipping", path.display());
        return Vec::new();
    }
    match fs::read_to_string(path) {
        Ok(content) => content
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect(),
        Err(e) => {
            warn!("Could not read {}: {}; skipping", path.display(), e);
            Vec::new()
        }
    }
}

/// Hostname of a URL string, with `http://` prefixed first when no
/// scheme is present so bare domains parse. Empty on parse failure.
pub fn hostname_of(url: &str) -> String {
    let candidate = if url.contains("://") {
        url.to_string()
    } else {
        format!("http://{}", url)
    };
    match Url::parse(&candidate) {
        Ok(parsed) => parsed.host_str().unwrap_or("").to_string(),
        Err(_) => String::new(),
    }
}

pub fn extract(url: &str) -> FeatureRow {
    let domain = hostname_of(url);
    FeatureRow {
        url: url.to_string(),
        url_length: url.chars().count(),
        domain_length: domain.chars().count(),
        domain,
        dots_count: url.matches('.').count(),
        hyphens_count: url.matches('-').count(),
        special_chars_count: url.chars().filter(|c| SPECIAL_CHARS.contains(c)).count(),
    }
}

/// Union both discovery lists, dedupe, and emit the feature table in
/// lexicographic URL order. Zero input rows produce no file.
pub fn run(ct_input: &Path, typosquat_input: &Path, out: &Path) -> Result<(), RadarError> {
    let mut urls = BTreeSet::new();
    urls.extend(load_domain_list(ct_input));
    urls.extend(load_domain_list(typosquat_input));

    if urls.is_empty() {
        warn!("No domains found in source files; nothing to extract");
        return Ok(());
    }
    info!("Extracting features for {} unique domains", urls.len());

    if let Some(parent) = out.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut writer = csv::Writer::from_path(out)
        .map_err(|e| RadarError::Table(format!("{}: {}", out.display(), e)))?;
    for url in &urls {
        writer
            .serialize(extract(url))
            .map_err(|e| RadarError::Table(e.to_string()))?;
    }
    writer.flush()?;

    info!("Feature table saved to {}", out.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_match_for_a_full_url() {
        let row = extract("http://sub.ex-ample.com/a?b=1");
        assert_eq!(row.url_length, 29);
        assert_eq!(row.domain, "sub.ex-ample.com");
        assert_eq!(row.domain_length, 16);
        assert_eq!(row.dots_count, 2);
        assert_eq!(row.hyphens_count, 1);
        // three slashes, one '?', one '='
        assert_eq!(row.special_chars_count, 5);
    }

    #[test]
    fn bare_domains_parse_via_scheme_prefix() {
        let row = extract("login.example.com");
        assert_eq!(row.domain, "login.example.com");
        assert_eq!(row.special_chars_count, 0);
    }

    #[test]
    fn unparseable_urls_keep_their_row_with_empty_domain() {
        let row = extract("http://[not-a-host");
        assert_eq!(row.domain, "");
        assert_eq!(row.domain_length, 0);
        assert_eq!(row.url, "http://[not-a-host");
    }

    #[test]
    fn unwritable_table_surfaces_as_table_error() {
        let out = std::env::temp_dir().join("phishradar_features_out_is_dir");
        std::fs::create_dir_all(&out).unwrap();
        let input = std::env::temp_dir().join("phishradar_features_table_err.txt");
        std::fs::write(&input, "a.com\n").unwrap();

        let missing = std::env::temp_dir().join("phishradar_features_table_absent.txt");
        let err = run(&input, &missing, &out).unwrap_err();
        assert!(matches!(err, RadarError::Table(_)));
    }

    #[test]
    fn missing_input_files_load_as_empty() {
        let missing = std::env::temp_dir().join("phishradar_features_missing.txt");
        let _ = std::fs::remove_file(&missing);
        assert!(load_domain_list(&missing).is_empty());
    }

    #[test]
    fn blank_lines_are_skipped() {
        let path = std::env::temp_dir().join("phishradar_features_blank.txt");
        std::fs::write(&path, "a.com\n\n  \nb.com\n").unwrap();
        assert_eq!(load_domain_list(&path), vec!["a.com", "b.com"]);
    }
}
