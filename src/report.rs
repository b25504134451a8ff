// scoutseed — report.rs
// Per-step timing / status outcomes and the console reporter.
// Author: d65v <https://github.com/d65v>

use std::time::Duration;

use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;

// ── Outcomes ──────────────────────────────────────────────────────────────────

/// Timing of one lifecycle call (clear or create).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepTiming {
    pub name: &'static str,
    #[serde(rename = "elapsed_secs", serialize_with = "as_secs")]
    pub elapsed: Duration,
    pub status: u16,
}

/// Result of one upload request.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOutcome {
    pub index: usize,
    pub records: usize,
    pub elapsed: Duration,
    pub status: u16,
}

impl BatchOutcome {
    /// Anything outside 2xx counts as a rejection by the remote service.
    pub fn is_rejected(&self) -> bool {
        !(200..=299).contains(&self.status)
    }
}

/// Everything a run observed, in the order it happened. No aggregates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub loaded: usize,
    pub clear: StepTiming,
    pub create: StepTiming,
    pub batches: Vec<BatchOutcome>,
}

impl Serialize for BatchOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut out = serializer.serialize_struct("BatchOutcome", 5)?;
        out.serialize_field("index", &self.index)?;
        out.serialize_field("records", &self.records)?;
        out.serialize_field("elapsed_secs", &self.elapsed.as_secs_f64())?;
        out.serialize_field("status", &self.status)?;
        out.serialize_field("rejected", &self.is_rejected())?;
        out.end()
    }
}

fn as_secs<S: Serializer>(elapsed: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(elapsed.as_secs_f64())
}

impl RunReport {
    pub fn rejected(&self) -> impl Iterator<Item = &BatchOutcome> {
        self.batches.iter().filter(|b| b.is_rejected())
    }
}

// ── Reporter ──────────────────────────────────────────────────────────────────

/// Observer notified as a run progresses.
pub trait Reporter {
    fn dataset_loaded(&self, records: usize);
    fn step_started(&self, name: &str);
    fn step_finished(&self, step: &StepTiming);
    fn batch_started(&self, index: usize);
    fn batch_finished(&self, outcome: &BatchOutcome);
}

/// Prints the operator-facing progress lines to stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn dataset_loaded(&self, records: usize) {
        println!("{}", loaded_line(records));
    }

    fn step_started(&self, name: &str) {
        println!("{}", started_line(name));
    }

    fn step_finished(&self, step: &StepTiming) {
        println!("{}", step_line(step));
    }

    fn batch_started(&self, index: usize) {
        println!("{}", batch_started_line(index));
    }

    fn batch_finished(&self, outcome: &BatchOutcome) {
        println!("{}", batch_line(outcome));
        if outcome.is_rejected() {
            log::warn!(
                "batch {} ({} records) rejected with status {}",
                outcome.index,
                outcome.records,
                outcome.status
            );
        }
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn dataset_loaded(&self, _records: usize) {}
    fn step_started(&self, _name: &str) {}
    fn step_finished(&self, _step: &StepTiming) {}
    fn batch_started(&self, _index: usize) {}
    fn batch_finished(&self, _outcome: &BatchOutcome) {}
}

// ── Line Formatting ───────────────────────────────────────────────────────────

pub fn loaded_line(records: usize) -> String {
    format!("Loaded {} rows", records)
}

pub fn started_line(name: &str) -> String {
    format!("Calling {}", name)
}

pub fn batch_started_line(index: usize) -> String {
    format!("Batch {:3}: Calling process_batch", index)
}

pub fn step_line(step: &StepTiming) -> String {
    format!(
        "Called {} in {:7.3} seconds",
        step.name,
        step.elapsed.as_secs_f64()
    )
}

pub fn batch_line(outcome: &BatchOutcome) -> String {
    format!(
        "Batch {:3}: Processed {:3} in {:7.3} seconds with status: {:3}",
        outcome.index,
        outcome.records,
        outcome.elapsed.as_secs_f64(),
        outcome.status
    )
}

// ── Tests ─────────────────────────────────────────────────────────────────────
