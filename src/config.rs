//! Runtime settings for the binary, read from the environment.
//!
//! | Variable          | Default                                  |
//! |-------------------|------------------------------------------|
//! | `TRIP_DATA_PATH`  | `data/uber_analysis_2015_cleaned.csv`    |
//! | `LOG_FILE_PATH`   | `logs/trip_insights.log`                 |
//! | `HISTOGRAM_BINS`  | `25`                                     |

use crate::analyzers::aggregate::DEFAULT_HISTOGRAM_BINS;
use anyhow::{Context, Result, bail};
use std::path::PathBuf;

pub const DEFAULT_DATA_PATH: &str = "data/uber_analysis_2015_cleaned.csv";
pub const DEFAULT_LOG_FILE_PATH: &str = "logs/trip_insights.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_path: PathBuf,
    pub log_file_path: PathBuf,
    pub histogram_bins: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            log_file_path: PathBuf::from(DEFAULT_LOG_FILE_PATH),
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
        }
    }
}

impl AppConfig {
    /// Reads the process environment. Call after `dotenvy::dotenv()`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(path) = lookup("TRIP_DATA_PATH") {
            config.data_path = PathBuf::from(path);
        }
        if let Some(path) = lookup("LOG_FILE_PATH") {
            config.log_file_path = PathBuf::from(path);
        }
        if let Some(bins) = lookup("HISTOGRAM_BINS") {
            config.histogram_bins = parse_bins(&bins).context("HISTOGRAM_BINS")?;
        }

        Ok(config)
    }
}

/// Parses a histogram bucket count, which must be positive.
pub fn parse_bins(value: &str) -> Result<usize> {
    let bins: usize = value
        .trim()
        .parse()
        .with_context(|| format!("invalid bin count {value:?}"))?;
    if bins == 0 {
        bail!("bin count must be positive");
    }
    Ok(bins)
}
