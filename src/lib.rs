// scoutseed — lib.rs
// Public API, error types, run configuration, re-exports.
// Author: d65v <https://github.com/d65v>

pub mod batching;
pub mod client;
pub mod dataset;
pub mod orchestrator;
pub mod report;

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

pub use crate::batching::{partition, Batch, Batches};
pub use crate::client::{HttpIndexClient, IndexService, IndexTarget};
pub use crate::dataset::{load_dataset, Dataset};
pub use crate::orchestrator::Seeder;
pub use crate::report::{BatchOutcome, ConsoleReporter, NullReporter, Reporter, RunReport, StepTiming};

/// One unit to be indexed. Opaque to this crate and passed through as-is.
pub type Record = serde_json::Value;

// ── Defaults ──────────────────────────────────────────────────────────────────

pub const DEFAULT_HOST: &str = "http://164.90.253.179/";
pub const DEFAULT_INDEX: &str = "qc_rules";
pub const DEFAULT_DATA: &str = "qc_rules.json";
pub const DEFAULT_BATCH: i64 = 100;

// ── Errors ────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Cannot read data file {path}: {source}")]
    DataFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed data in {path}: {reason}")]
    MalformedData { path: PathBuf, reason: String },

    #[error("{method} {url} failed: {source}")]
    Transport {
        method: &'static str,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SeedError {
    /// True for every failure that aborts a run before any request is sent.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            SeedError::InvalidConfiguration(_)
                | SeedError::DataFile { .. }
                | SeedError::MalformedData { .. }
        )
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, SeedError::Transport { .. })
    }
}

pub type Result<T> = std::result::Result<T, SeedError>;

// ── Config ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct SeedConfig {
    /// Base address of the index service
    pub host: String,
    /// Name of the index to clear, create and fill
    pub index: String,
    /// JSON file holding the records
    pub data_path: PathBuf,
    /// Records per upload request. Signed so bad input reaches `validate`.
    pub batch_size: i64,
    /// Per-request timeout; `None` keeps the HTTP client's default
    pub timeout: Option<Duration>,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            index: DEFAULT_INDEX.to_string(),
            data_path: PathBuf::from(DEFAULT_DATA),
            batch_size: DEFAULT_BATCH,
            timeout: None,
        }
    }
}

impl SeedConfig {
    /// Load config from environment variables, falling back to defaults
    /// for unset ones.
    ///
    /// # Errors
    /// Returns `SeedError::InvalidConfiguration` if a numeric variable is set
    /// but does not parse.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env` but reads values through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let host = lookup("SCOUTSEED_HOST").unwrap_or(defaults.host);
        let index = lookup("SCOUTSEED_INDEX").unwrap_or(defaults.index);
        let data_path = lookup("SCOUTSEED_DATA")
            .map(PathBuf::from)
            .unwrap_or(defaults.data_path);

        let batch_size = match lookup("SCOUTSEED_BATCH") {
            Some(raw) => parse_var("SCOUTSEED_BATCH", &raw)?,
            None => defaults.batch_size,
        };

        let timeout = lookup("SCOUTSEED_TIMEOUT_SECS")
            .map(|raw| parse_var::<u64>("SCOUTSEED_TIMEOUT_SECS", &raw))
            .transpose()?
            .map(Duration::from_secs);

        Ok(Self {
            host,
            index,
            data_path,
            batch_size,
            timeout,
        })
    }

    /// Check everything that can be checked without touching disk or network.
    ///
    /// # Errors
    /// Returns `SeedError::InvalidConfiguration` for a non-positive batch size
    /// or an empty host / index name.
    pub fn validate(&self) -> Result<()> {
        if self.batch_size <= 0 {
            return Err(SeedError::InvalidConfiguration(format!(
                "batch size must be positive, got {}",
                self.batch_size
            )));
        }
        if self.host.trim().is_empty() {
            return Err(SeedError::InvalidConfiguration("host is empty".into()));
        }
        if self.index.trim().is_empty() {
            return Err(SeedError::InvalidConfiguration("index name is empty".into()));
        }
        Ok(())
    }

    pub fn target(&self) -> IndexTarget {
        IndexTarget::new(self.host.clone(), self.index.clone())
    }
}

fn parse_var<T>(key: &str, raw: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e| {
        SeedError::InvalidConfiguration(format!("{}={:?} is not valid: {}", key, raw, e))
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
