use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::core::paths;

#[derive(Parser, Debug)]
#[command(
    name = "phishradar",
    version,
    about = "CT-log and typosquat monitoring for CSE impersonation"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Increase verbosity (info, debug, trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Log file path
    #[arg(long, global = true, default_value = paths::LOG_FILE)]
    pub log_file: PathBuf,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Derive the keyword/whitelist config from the CSE roster CSV
    GenConfig {
        /// Roster CSV with Organisation Name / Whitelisted Domains columns
        #[arg(long, default_value = paths::ROSTER_CSV)]
        roster: PathBuf,
        /// Where to write the JSON config
        #[arg(long, default_value = paths::CONFIG_JSON)]
        out: PathBuf,
    },
    /// Watch the live CT feed for impersonation domains
    Monitor {
        /// Config file produced by gen-config
        #[arg(long, default_value = paths::CONFIG_JSON)]
        config: PathBuf,
        /// Append-only discovery log
        #[arg(long, default_value = paths::DISCOVERED_URLS)]
        out: PathBuf,
        /// Websocket feed endpoint
        #[arg(long, default_value = paths::FEED_URL)]
        feed: String,
        /// Ad-hoc keyword list; skips the config and whitelist and only
        /// prints matches (no discovery log)
        #[arg(long, value_delimiter = ',')]
        keywords: Option<Vec<String>>,
    },
    /// Enumerate registered lookalike variants of the legitimate domains
    Typosquat {
        /// Roster CSV with the legitimate domains
        #[arg(long, default_value = paths::ROSTER_CSV)]
        roster: PathBuf,
        /// Where to write the sorted variant list
        #[arg(long, default_value = paths::TYPOSQUAT_DOMAINS)]
        out: PathBuf,
    },
    /// Build the lexical feature table from the discovery lists
    Features {
        /// Domains discovered by the CT monitor
        #[arg(long, default_value = paths::DISCOVERED_URLS)]
        ct_input: PathBuf,
        /// Domains discovered by the typosquat scanner
        #[arg(long, default_value = paths::TYPOSQUAT_DOMAINS)]
        typosquat_input: PathBuf,
        /// Where to write the feature CSV
        #[arg(long, default_value = paths::URL_FEATURES)]
        out: PathBuf,
    },
}
