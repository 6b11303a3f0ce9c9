//! Recoverable conditions raised during a cycle.
//!
//! Components never log these directly; they hand them to the
//! [`Diagnostics`] sink they were given. [`TracingDiagnostics`] is what the
//! binary uses, [`Collector`] keeps them around for inspection.

use std::fmt;
use std::path::PathBuf;

use tracing::{debug, warn};

use crate::error::{ExtractionError, FsError, PathResolutionError};

#[derive(Debug)]
pub enum Diagnostic {
    RootFolderChanged { cached: String, supplied: String },
    EntryPruned { key: String },
    FileUnreadable(FsError),
    PathUnresolvable(PathResolutionError),
    ExtractionFailed {
        path: PathBuf,
        key: String,
        error: ExtractionError,
    },
}

impl Diagnostic {
    pub fn is_warning(&self) -> bool {
        !matches!(self, Self::EntryPruned { .. })
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RootFolderChanged { cached, supplied } => write!(
                f,
                "cached root folder '{cached}' differs from '{supplied}'; keeping relative entries"
            ),
            Self::EntryPruned { key } => write!(f, "removed {key}: file no longer exists"),
            Self::FileUnreadable(error) => write!(f, "skipping file: {error}"),
            Self::PathUnresolvable(error) => write!(f, "skipping file: {error}"),
            Self::ExtractionFailed { key, error, .. } => {
                write!(f, "keeping previous tests for {key}: {error}")
            }
        }
    }
}

pub trait Diagnostics {
    fn report(&mut self, diagnostic: Diagnostic);
}

/// Forwards every diagnostic to `tracing`.
#[derive(Debug, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn report(&mut self, diagnostic: Diagnostic) {
        if diagnostic.is_warning() {
            warn!("{diagnostic}");
        } else {
            debug!("{diagnostic}");
        }
    }
}

#[derive(Debug, Default)]
pub struct Collector {
    pub diagnostics: Vec<Diagnostic>,
}

impl Collector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_warning())
    }
}

impl Diagnostics for Collector {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}
