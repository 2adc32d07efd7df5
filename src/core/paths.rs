//! Default file layout, relative to the working root. Every path can be
//! overridden on the command line.

pub const ROSTER_CSV: &str = "data/external/stage1_cse_domains.csv";
pub const CONFIG_JSON: &str = "src/crawlers/config.json";
pub const DISCOVERED_URLS: &str = "data/raw/discovered_urls.txt";
pub const TYPOSQUAT_DOMAINS: &str = "data/raw/typosquat_domains.txt";
pub const URL_FEATURES: &str = "data/processed/url_features.csv";
pub const FEED_URL: &str = "wss://certstream.calidog.io/";
pub const LOG_FILE: &str = "data/phishradar.log";
