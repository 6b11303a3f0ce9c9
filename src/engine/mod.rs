//! One incremental cycle: prune, scan, extract, merge, stamp.
//!
//! A cycle consumes a [`CacheState`] and hands back a new one, so a fatal
//! error leaves the caller with nothing half-updated to persist.

mod report;

pub use report::CycleReport;

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::{debug, info};

use crate::cache::{self, CacheState};
use crate::config::EngineConfig;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::Result;
use crate::extract::Extractor;
use crate::index::Upsert;
use crate::paths::relative_key;
use crate::scanner::{millis_since_epoch, Scanner};

/// Where the state a cycle starts from comes from.
#[derive(Debug, Clone)]
pub enum CacheSource {
    Fresh,
    Document(String),
    File(PathBuf),
}

#[derive(Debug)]
pub struct Cycle {
    pub state: CacheState,
    pub report: CycleReport,
}

pub struct Engine<E> {
    root: PathBuf,
    extractor: E,
    config: EngineConfig,
}

impl<E: Extractor> Engine<E> {
    pub fn new(root: impl Into<PathBuf>, extractor: E) -> Self {
        Self {
            root: root.into(),
            extractor,
            config: EngineConfig::default(),
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Load or create the state and make this engine's root authoritative.
    pub fn prepare(
        &self,
        source: &CacheSource,
        diagnostics: &mut dyn Diagnostics,
    ) -> Result<CacheState> {
        let mut state = match source {
            CacheSource::Fresh => cache::init(&self.root),
            CacheSource::Document(document) => cache::parse(document)?,
            CacheSource::File(path) => cache::load(path)?,
        };
        state.reconcile_root(&self.root, diagnostics);
        Ok(state)
    }

    pub fn run(&self, source: &CacheSource, diagnostics: &mut dyn Diagnostics) -> Result<Cycle> {
        let state = self.prepare(source, diagnostics)?;
        self.run_cycle(state, diagnostics)
    }

    pub fn run_cycle(
        &self,
        state: CacheState,
        diagnostics: &mut dyn Diagnostics,
    ) -> Result<Cycle> {
        self.run_cycle_at(state, millis_since_epoch(SystemTime::now()), diagnostics)
    }

    /// Run a cycle whose start is `started_at` (epoch milliseconds).
    ///
    /// The start time, not the end time, becomes the next baseline: files
    /// touched while the cycle runs are picked up again next time.
    pub fn run_cycle_at(
        &self,
        mut state: CacheState,
        started_at: u64,
        diagnostics: &mut dyn Diagnostics,
    ) -> Result<Cycle> {
        let baseline = state.timestamp;
        let mut report = CycleReport::new(baseline);

        report.pruned = state.tests.prune(&self.root, diagnostics);
        for key in &report.pruned {
            diagnostics.report(Diagnostic::EntryPruned { key: key.clone() });
        }

        let outcome = Scanner::new(&self.root, &self.config.extension).scan(baseline, diagnostics)?;
        report.unchanged = outcome.unchanged;
        report.skipped = outcome.skipped;
        report.changed = outcome.changed.len();
        report.unreadable = outcome.unreadable;

        // Files below an unreadable directory were not seen, so nothing
        // proves they are older than the start time.
        let mut next_baseline = if outcome.is_complete() {
            started_at.max(baseline)
        } else {
            baseline
        };
        for file in outcome.changed {
            let key = match relative_key(&self.root, &file.path) {
                Ok(key) => key,
                Err(err) => {
                    report.failed.push(file.path.to_string_lossy().into_owned());
                    diagnostics.report(Diagnostic::PathUnresolvable(err));
                    continue;
                }
            };

            let methods = match self.extractor.extract(&file.path) {
                Ok(methods) => methods,
                Err(error) => {
                    // Hold the baseline below this file's stamp so the next
                    // cycle classifies it as changed again.
                    if let Some(stamp) = file.stamp.latest() {
                        next_baseline = next_baseline.min(stamp.saturating_sub(1)).max(baseline);
                    }
                    report.failed.push(key.clone());
                    diagnostics.report(Diagnostic::ExtractionFailed {
                        path: file.path,
                        key,
                        error,
                    });
                    continue;
                }
            };

            debug!(key = %key, tests = methods.len(), "extracted");
            match state.tests.upsert(key.clone(), methods) {
                Upsert::Inserted => report.inserted.push(key),
                Upsert::Replaced => report.replaced.push(key),
                Upsert::Removed => report.removed.push(key),
                Upsert::Unchanged | Upsert::Absent => {}
            }
        }

        state.timestamp = next_baseline;
        report.timestamp = next_baseline;

        info!(
            root = %self.root.display(),
            pruned = report.pruned.len(),
            changed = report.changed,
            unchanged = report.unchanged,
            failed = report.failed.len(),
            unreadable = report.unreadable,
            files = state.tests.len(),
            tests = state.tests.test_count(),
            "cycle complete"
        );
        Ok(Cycle { state, report })
    }
}
