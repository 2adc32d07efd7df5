pub mod cli;
pub mod config;
pub mod core;
pub mod crawlers;
pub mod features;
