use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

use crate::config::MonitorConfig;
use crate::core::domain::{is_whitelisted, matches_keyword, normalize_san};
use crate::core::error::RadarError;

/// A frame from the certificate-transparency feed, tagged on
/// `message_type`. Anything that is not a certificate update (heartbeats
/// and whatever else the feed emits) lands in the catch-all.
#[derive(Debug, Deserialize)]
#[serde(tag = "message_type")]
pub enum FeedMessage {
    #[serde(rename = "certificate_update")]
    CertificateUpdate { data: CertificateData },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
pub struct CertificateData {
    pub leaf_cert: LeafCert,
}

#[derive(Debug, Deserialize)]
pub struct LeafCert {
    #[serde(default)]
    pub all_domains: Vec<String>,
}

/// Keyword/whitelist screen applied to every SAN in a leaf certificate.
#[derive(Debug, Clone)]
pub struct MonitorFilter {
    pub keywords: Vec<String>,
    pub whitelist: HashSet<String>,
}

impl MonitorFilter {
    pub fn from_config(config: &MonitorConfig) -> Self {
        Self {
            whitelist: config.whitelist_set(),
            keywords: config.keywords.clone(),
        }
    }

    /// Ad-hoc keyword list with no whitelist, for prototype runs.
    pub fn keywords_only(keywords: Vec<String>) -> Self {
        Self {
            keywords,
            whitelist: HashSet::new(),
        }
    }
}

/// Per-run monitor state: the domains already reported this session and
/// the append-only discovery log. The log is opened on first write, so a
/// session with no discoveries leaves no file behind. Dropped (and
/// therefore reset) when the run ends.
pub struct MonitorSession {
    seen: HashSet<String>,
    output: Option<PathBuf>,
    sink: Option<fs::File>,
    pub started_at: DateTime<Utc>,
}

impl MonitorSession {
    pub fn new(output: Option<PathBuf>) -> Self {
        Self {
            seen: HashSet::new(),
            output,
            sink: None,
            started_at: Utc::now(),
        }
    }

    /// Run every SAN through the filter and return the domains newly
    /// flagged by this event, in SAN order.
    pub fn screen(&mut self, filter: &MonitorFilter, all_domains: &[String]) -> Vec<String> {
        let mut flagged = Vec::new();
        for raw in all_domains {
            let domain = normalize_san(raw);
            if self.seen.contains(&domain) {
                continue;
            }
            if !matches_keyword(&domain, &filter.keywords) {
                continue;
            }
            if is_whitelisted(&domain, &filter.whitelist) {
                continue;
            }
            self.seen.insert(domain.clone());
            flagged.push(domain);
        }
        flagged
    }

    /// Append one domain per line, flushed immediately so a killed
    /// process loses nothing.
    pub fn record(&mut self, domain: &str) -> Result<(), RadarError> {
        let Some(path) = self.output.as_ref() else {
            return Ok(());
        };
        if self.sink.is_none() {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            self.sink = Some(fs::OpenOptions::new().create(true).append(true).open(path)?);
        }
        if let Some(sink) = self.sink.as_mut() {
            writeln!(sink, "{}", domain)?;
            sink.flush()?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct MonitorOptions {
    pub feed_url: String,
    pub output: Option<PathBuf>,
}

/// Subscribe to the CT feed and report matching domains until the stream
/// fails or ctrl-c arrives. A dropped stream is an error; there is no
/// reconnect.
pub async fn run(filter: MonitorFilter, opts: MonitorOptions) -> Result<(), RadarError> {
    let mut session = MonitorSession::new(opts.output.clone());

    info!(
        "Starting CT monitor with {} keywords ({} whitelisted domains)",
        filter.keywords.len(),
        filter.whitelist.len()
    );
    match &opts.output {
        Some(path) => info!("Appending discoveries to {}", path.display()),
        None => info!("No output file; discoveries are printed only"),
    }

    let (stream, _) = connect_async(&opts.feed_url)
        .await
        .map_err(|e| RadarError::Feed(format!("connect {}: {}", opts.feed_url, e)))?;
    info!("Connected to feed {}", opts.feed_url);
    let (mut write, mut read) = stream.split();

    // Registered once, outside the loop; re-registering per iteration
    // can miss an interrupt that arrives while a frame is handled.
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                info!(
                    "Monitor stopped; session began {}, {} domains reported",
                    session.started_at.format("%Y-%m-%d %H:%M:%S"),
                    session.seen.len()
                );
                return Ok(());
            }
            frame = read.next() => {
                let frame = match frame {
                    Some(Ok(f)) => f,
                    Some(Err(e)) => return Err(RadarError::Feed(e.to_string())),
                    None => return Err(RadarError::Feed("feed closed the stream".into())),
                };
                match frame {
                    Message::Text(text) => {
                        handle_frame(&text, &filter, &mut session)?;
                    }
                    Message::Ping(payload) => {
                        write
                            .send(Message::Pong(payload))
                            .await
                            .map_err(|e| RadarError::Feed(e.to_string()))?;
                    }
                    Message::Close(_) => {
                        return Err(RadarError::Feed("feed closed the stream".into()));
                    }
                    _ => {}
                }
            }
        }
    }
}

fn handle_frame(
    text: &str,
    filter: &MonitorFilter,
    session: &mut MonitorSession,
) -> Result<(), RadarError> {
    let message: FeedMessage = match serde_json::from_str(text) {
        Ok(m) => m,
        Err(e) => {
            debug!("Skipping undecodable frame: {}", e);
            return Ok(());
        }
    };
    let FeedMessage::CertificateUpdate { data } = message else {
        return Ok(());
    };
    for domain in session.screen(filter, &data.leaf_cert.all_domains) {
        info!("Found: {}", domain);
        if let Err(e) = session.record(&domain) {
            warn!("Failed to append {}: {}", domain, e);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(keywords: &[&str], whitelist: &[&str]) -> MonitorFilter {
        MonitorFilter {
            keywords: keywords.iter().map(|s| s.to_string()).collect(),
            whitelist: whitelist.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn certificate_update_frames_deserialize() {
        let text = r#"{
            "message_type": "certificate_update",
            "data": {"leaf_cert": {"all_domains": ["*.realbank-login.com"]}}
        }"#;
        let msg: FeedMessage = serde_json::from_str(text).unwrap();
        let FeedMessage::CertificateUpdate { data } = msg else {
            panic!("expected a certificate update");
        };
        assert_eq!(data.leaf_cert.all_domains, vec!["*.realbank-login.com"]);
    }

    #[test]
    fn heartbeat_frames_map_to_catch_all() {
        let msg: FeedMessage =
            serde_json::from_str(r#"{"message_type": "heartbeat"}"#).unwrap();
        assert!(matches!(msg, FeedMessage::Other));
    }

    #[test]
    fn screen_strips_wildcards_and_dedups_within_session() {
        let f = filter(&["realbank"], &[]);
        let mut session = MonitorSession::new(None);

        let first = session.screen(&f, &["*.REALBANK-login.com".to_string()]);
        assert_eq!(first, vec!["realbank-login.com"]);

        let again = session.screen(&f, &["realbank-login.com".to_string()]);
        assert!(again.is_empty());
    }

    #[test]
    fn screen_rejects_whitelisted_suffixes_only() {
        let f = filter(&["realbank"], &["realbank.com"]);
        let mut session = MonitorSession::new(None);

        let flagged = session.screen(
            &f,
            &[
                "pay.realbank.com".to_string(),
                "notrealbank.com".to_string(),
            ],
        );
        assert_eq!(flagged, vec!["notrealbank.com"]);
    }

    #[test]
    fn screen_ignores_domains_without_keywords() {
        let f = filter(&["realbank"], &[]);
        let mut session = MonitorSession::new(None);
        assert!(session.screen(&f, &["innocent.example".to_string()]).is_empty());
    }
}
