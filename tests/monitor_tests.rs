use std::fs;
use std::path::PathBuf;

use phishradar::config::build_config;
use phishradar::crawlers::ct_monitor::{MonitorFilter, MonitorSession};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("phishradar_{name}"));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn repeated_sightings_append_exactly_one_line() {
    let dir = scratch_dir("monitor_dedup");
    let log = dir.join("discovered_urls.txt");
    let filter = MonitorFilter::keywords_only(vec!["realbank".to_string()]);
    let mut session = MonitorSession::new(Some(log.clone()));

    for _ in 0..2 {
        for domain in session.screen(&filter, &["*.realbank-login.top".to_string()]) {
            session.record(&domain).unwrap();
        }
    }

    assert_eq!(fs::read_to_string(&log).unwrap(), "realbank-login.top\n");
}

#[test]
fn zero_discovery_sessions_leave_no_log_file() {
    let dir = scratch_dir("monitor_no_hits");
    let log = dir.join("discovered_urls.txt");
    let filter = MonitorFilter::keywords_only(vec!["realbank".to_string()]);
    let mut session = MonitorSession::new(Some(log.clone()));

    for domain in session.screen(&filter, &["innocent.example".to_string()]) {
        session.record(&domain).unwrap();
    }

    assert!(!log.exists());
}

#[test]
fn config_built_from_roster_drives_the_filter() {
    let roster = "Organisation Name,Whitelisted Domains\n\
                  Real Bank,www.realbank.com\n";
    let config = build_config(roster.as_bytes()).unwrap();
    let filter = MonitorFilter::from_config(&config);
    let mut session = MonitorSession::new(None);

    let flagged = session.screen(
        &filter,
        &[
            "pay.realbank.com".to_string(),   // whitelisted subdomain
            "realbank-verify.com".to_string(), // impersonation
            "unrelated.example".to_string(),   // no keyword
        ],
    );
    assert_eq!(flagged, vec!["realbank-verify.com"]);
}
