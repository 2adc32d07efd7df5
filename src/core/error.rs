use std::io;

#[derive(thiserror::Error, Debug)]
pub enum RadarError {
    #[error("config error: {0}")]
    Config(String),
    #[error("roster error: {0}")]
    Roster(String),
    #[error("feed error: {0}")]
    Feed(String),
    #[error("dns error: {0}")]
    Dns(String),
    #[error("table error: {0}")]
    Table(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl From<csv::Error> for RadarError {
    fn from(err: csv::Error) -> Self {
        RadarError::Roster(err.to_string())
    }
}

impl From<serde_json::Error> for RadarError {
    fn from(err: serde_json::Error) -> Self {
        RadarError::Config(err.to_string())
    }
}
