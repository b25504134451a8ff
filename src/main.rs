// scoutseed — main.rs
// Binary entry point: clears, recreates and seeds a scout index.
// Author: d65v <https://github.com/d65v>

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::Parser;

use seedcore::{HttpIndexClient, RunReport, SeedConfig, Seeder};

/// Seeds a scout index.
///
/// Values not given on the command line come from SCOUTSEED_HOST,
/// SCOUTSEED_INDEX, SCOUTSEED_DATA, SCOUTSEED_BATCH and SCOUTSEED_TIMEOUT_SECS
/// (a `.env` file is honoured), then from built-in defaults.
#[derive(Debug, Parser)]
#[command(name = "scoutseed", version, about)]
struct Cli {
    /// Scout index host [default: http://164.90.253.179/]
    #[arg(long)]
    host: Option<String>,

    /// Index name to create [default: qc_rules]
    #[arg(long)]
    index: Option<String>,

    /// Data file to load from [default: qc_rules.json]
    #[arg(long)]
    data: Option<PathBuf>,

    /// Batch size to load data with [default: 100]
    #[arg(long, allow_negative_numbers = true)]
    batch: Option<i64>,

    /// Per-request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Also write the run report as JSON to this file
    #[arg(long, value_name = "PATH")]
    report_json: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn into_config(self, base: SeedConfig) -> SeedConfig {
        SeedConfig {
            host: self.host.unwrap_or(base.host),
            index: self.index.unwrap_or(base.index),
            data_path: self.data.unwrap_or(base.data_path),
            batch_size: self.batch.unwrap_or(base.batch_size),
            timeout: self.timeout.map(Duration::from_secs).or(base.timeout),
        }
    }
}

fn main() {
    // Load .env if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("[scoutseed] Error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    // RUST_LOG still wins when set
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let report_json = cli.report_json.clone();
    let base = SeedConfig::from_env().context("reading SCOUTSEED_* environment")?;
    let config = cli.into_config(base);
    config.validate().context("refusing to start")?;

    log::info!(
        "Config: host={}, index={}, data={}, batch={}",
        config.host,
        config.index,
        config.data_path.display(),
        config.batch_size
    );

    let client = HttpIndexClient::new(config.timeout)?;
    let report = Seeder::new(config, client)
        .run()
        .context("seeding run aborted")?;

    if let Some(path) = report_json {
        write_report(&report, &path)?;
    }

    Ok(())
}

fn write_report(report: &RunReport, path: &Path) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json)
        .with_context(|| format!("writing report to {}", path.display()))?;
    log::info!("Run report written to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_env_config() {
        let cli = Cli::parse_from(["scoutseed", "--index", "other", "--batch", "-5"]);
        let base = SeedConfig {
            host: "http://env-host".into(),
            ..Default::default()
        };
        let cfg = cli.into_config(base);
        assert_eq!(cfg.host, "http://env-host");
        assert_eq!(cfg.index, "other");
        assert_eq!(cfg.batch_size, -5);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_cli_report_json_flag() {
        let cli = Cli::parse_from(["scoutseed", "--report-json", "out.json"]);
        assert_eq!(cli.report_json, Some(PathBuf::from("out.json")));
    }

    #[test]
    fn test_write_report_round_trips_through_json() {
        use seedcore::{BatchOutcome, StepTiming};

        let step = |name| StepTiming {
            name,
            elapsed: Duration::from_millis(5),
            status: 200,
        };
        let report = RunReport {
            loaded: 1,
            clear: step("clear_index"),
            create: step("create_index"),
            batches: vec![BatchOutcome {
                index: 0,
                records: 1,
                elapsed: Duration::from_millis(250),
                status: 500,
            }],
        };

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        write_report(&report, &path).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["loaded"], 1);
        assert_eq!(written["batches"][0]["status"], 500);
        assert_eq!(written["batches"][0]["rejected"], true);
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["scoutseed"]);
        assert_eq!(cli.into_config(SeedConfig::default()), SeedConfig::default());
    }
}
