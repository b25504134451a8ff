// scoutseed — orchestrator.rs
// Drives one seeding run: load, clear, create, then upload batch by batch.
// Author: d65v <https://github.com/d65v>
//
// Strictly sequential. Rejected batches are reported and the loop moves on;
// a transport failure ends the run at whatever step it happened, with no
// rollback of what was already applied.

use std::time::Instant;

use crate::batching::partition;
use crate::client::{IndexService, IndexTarget};
use crate::dataset::load_dataset;
use crate::report::{BatchOutcome, ConsoleReporter, Reporter, RunReport, StepTiming};
use crate::{Record, Result, SeedConfig};

const CLEAR_STEP: &str = "clear_index";
const CREATE_STEP: &str = "create_index";

pub struct Seeder<S, R = ConsoleReporter> {
    config: SeedConfig,
    service: S,
    reporter: R,
}

impl<S: IndexService> Seeder<S, ConsoleReporter> {
    /// Seeder that reports to the console.
    pub fn new(config: SeedConfig, service: S) -> Self {
        Self::with_reporter(config, service, ConsoleReporter)
    }
}

impl<S: IndexService, R: Reporter> Seeder<S, R> {
    pub fn with_reporter(config: SeedConfig, service: S, reporter: R) -> Self {
        Self {
            config,
            service,
            reporter,
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    /// Full run: validate config, load the data file, then seed.
    ///
    /// # Errors
    /// Configuration and data-file errors are returned before any request is
    /// sent. `SeedError::Transport` is returned as soon as a request fails.
    pub fn run(&self) -> Result<RunReport> {
        self.config.validate()?;
        let dataset = load_dataset(&self.config.data_path)?;
        self.reporter.dataset_loaded(dataset.len());
        log::info!(
            "Seeding {} records from {} into {}",
            dataset.len(),
            self.config.data_path.display(),
            self.config.target().url()
        );
        self.seed(&dataset)
    }

    /// Seed an already-loaded dataset.
    pub fn run_with_dataset(&self, records: &[Record]) -> Result<RunReport> {
        self.config.validate()?;
        self.reporter.dataset_loaded(records.len());
        self.seed(records)
    }

    fn seed(&self, records: &[Record]) -> Result<RunReport> {
        // Partition before the first request so a bad size never touches the index.
        let batches = partition(records, self.config.batch_size)?;
        let target = self.config.target();

        let clear = self.lifecycle(CLEAR_STEP, &target, |s, t| s.clear(t))?;
        let create = self.lifecycle(CREATE_STEP, &target, |s, t| s.create(t))?;

        let mut outcomes = Vec::with_capacity(batches.len());
        for batch in batches {
            self.reporter.batch_started(batch.index);

            let start = Instant::now();
            let status = self.service.upload_batch(&target, batch.records)?;
            let outcome = BatchOutcome {
                index: batch.index,
                records: batch.len(),
                elapsed: start.elapsed(),
                status,
            };

            self.reporter.batch_finished(&outcome);
            outcomes.push(outcome);
        }

        log::info!("Seeding finished: {} batches sent", outcomes.len());

        Ok(RunReport {
            loaded: records.len(),
            clear,
            create,
            batches: outcomes,
        })
    }

    fn lifecycle<F>(&self, name: &'static str, target: &IndexTarget, call: F) -> Result<StepTiming>
    where
        F: FnOnce(&S, &IndexTarget) -> Result<u16>,
    {
        self.reporter.step_started(name);
        let start = Instant::now();
        let status = call(&self.service, target)?;
        let step = StepTiming {
            name,
            elapsed: start.elapsed(),
            status,
        };
        self.reporter.step_finished(&step);
        Ok(step)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::NullReporter;
    use crate::SeedError;
    use serde_json::json;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Calls(RefCell<Vec<String>>);

    impl IndexService for Calls {
        fn clear(&self, _t: &IndexTarget) -> Result<u16> {
            self.0.borrow_mut().push("clear".into());
            Ok(200)
        }
        fn create(&self, _t: &IndexTarget) -> Result<u16> {
            self.0.borrow_mut().push("create".into());
            Ok(200)
        }
        fn upload_batch(&self, _t: &IndexTarget, records: &[Record]) -> Result<u16> {
            self.0.borrow_mut().push(format!("upload:{}", records.len()));
            Ok(200)
        }
    }

    fn seeder(batch_size: i64) -> Seeder<Calls, NullReporter> {
        let config = SeedConfig {
            batch_size,
            ..Default::default()
        };
        Seeder::with_reporter(config, Calls::default(), NullReporter)
    }

    #[test]
    fn test_call_sequence() {
        let s = seeder(2);
        let data: Vec<Record> = (0..5).map(|i| json!({ "id": i })).collect();
        let report = s.run_with_dataset(&data).unwrap();

        assert_eq!(
            *s.service().0.borrow(),
            vec!["clear", "create", "upload:2", "upload:2", "upload:1"]
        );
        assert_eq!(report.loaded, 5);
        assert_eq!(report.clear.name, "clear_index");
        assert_eq!(report.create.name, "create_index");
        assert_eq!(report.batches.len(), 3);
    }

    #[test]
    fn test_bad_batch_size_sends_nothing() {
        let s = seeder(0);
        let err = s.run_with_dataset(&[json!({})]).unwrap_err();
        assert!(matches!(err, SeedError::InvalidConfiguration(_)));
        assert!(s.service().0.borrow().is_empty());
    }

    #[test]
    fn test_missing_data_file_sends_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let config = SeedConfig {
            data_path: dir.path().join("missing.json"),
            ..Default::default()
        };
        let s = Seeder::with_reporter(config, Calls::default(), NullReporter);
        let err = s.run().unwrap_err();
        assert!(matches!(err, SeedError::DataFile { .. }));
        assert!(s.service().0.borrow().is_empty());
    }
}
