//! Change detection over the source tree.
//!
//! The walk itself only filters candidates; whether a candidate changed is
//! decided by [`classify`], a pure function of its [`FileStamp`] and the
//! baseline timestamp.

mod stamp;

pub use stamp::{millis_since_epoch, FileStamp};

use std::ffi::OsStr;
use std::fs::Metadata;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};
use walkdir::{DirEntry, WalkDir};

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::FsError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Changed,
    Unchanged,
}

/// A file is changed when either its modification or its creation time is
/// newer than the baseline. Some filesystems keep the original mtime when a
/// file is copied in, which only the creation time reveals.
pub fn classify(stamp: &FileStamp, baseline: u64) -> Classification {
    match stamp.latest() {
        Some(latest) if latest <= baseline => Classification::Unchanged,
        _ => Classification::Changed,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangedFile {
    pub path: PathBuf,
    pub stamp: FileStamp,
}

#[derive(Debug, Default)]
pub struct ScanOutcome {
    pub changed: Vec<ChangedFile>,
    pub unchanged: usize,
    /// Candidates that vanished between listing and stat.
    pub skipped: usize,
    /// Directories or files the walk could not read. Anything below them is
    /// invisible to this scan, changed or not.
    pub unreadable: usize,
}

impl ScanOutcome {
    pub fn candidates(&self) -> usize {
        self.changed.len() + self.unchanged + self.skipped
    }

    pub fn is_complete(&self) -> bool {
        self.unreadable == 0
    }
}

pub struct Scanner<'a> {
    root: &'a Path,
    extension: &'a str,
}

impl<'a> Scanner<'a> {
    pub fn new(root: &'a Path, extension: &'a str) -> Self {
        Self { root, extension }
    }

    pub fn scan(
        &self,
        baseline: u64,
        diagnostics: &mut dyn Diagnostics,
    ) -> Result<ScanOutcome, FsError> {
        self.check_root()?;

        let mut outcome = ScanOutcome::default();
        for entry in WalkDir::new(self.root).follow_links(false) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) if err.depth() == 0 => {
                    return Err(FsError::root_unreadable(self.root, io::Error::from(err)));
                }
                Err(err) => {
                    let path = err.path().map(Path::to_path_buf).unwrap_or_default();
                    diagnostics.report(Diagnostic::FileUnreadable(FsError::file_unreadable(
                        path,
                        io::Error::from(err),
                    )));
                    outcome.unreadable += 1;
                    continue;
                }
            };

            if !entry.file_type().is_file() || !self.matches_extension(entry.path()) {
                continue;
            }

            let metadata = match entry.metadata() {
                Ok(metadata) => metadata,
                Err(err) => {
                    let err = io::Error::from(err);
                    if err.kind() == io::ErrorKind::NotFound {
                        trace!("{} disappeared during the walk", entry.path().display());
                        outcome.skipped += 1;
                    } else {
                        diagnostics.report(Diagnostic::FileUnreadable(FsError::file_unreadable(
                            entry.path(),
                            err,
                        )));
                        outcome.unreadable += 1;
                    }
                    continue;
                }
            };

            if is_hidden(&entry, &metadata) {
                trace!("Ignoring hidden file {}", entry.path().display());
                continue;
            }

            let stamp = FileStamp::from_metadata(&metadata);
            match classify(&stamp, baseline) {
                Classification::Changed => {
                    debug!("Changed: {}", entry.path().display());
                    outcome.changed.push(ChangedFile {
                        path: entry.into_path(),
                        stamp,
                    });
                }
                Classification::Unchanged => outcome.unchanged += 1,
            }
        }

        Ok(outcome)
    }

    fn check_root(&self) -> Result<(), FsError> {
        match std::fs::metadata(self.root) {
            Ok(metadata) if metadata.is_dir() => Ok(()),
            Ok(_) => Err(FsError::root_unreadable(
                self.root,
                io::Error::other("not a directory"),
            )),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                Err(FsError::root_not_found(self.root))
            }
            Err(err) => Err(FsError::root_unreadable(self.root, err)),
        }
    }

    fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(OsStr::to_str)
            .is_some_and(|ext| ext.eq_ignore_ascii_case(self.extension))
    }
}

fn is_hidden(entry: &DirEntry, metadata: &Metadata) -> bool {
    let dot_file = entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'));
    dot_file || has_hidden_attribute(metadata)
}

#[cfg(windows)]
fn has_hidden_attribute(metadata: &Metadata) -> bool {
    use std::os::windows::fs::MetadataExt;
    const FILE_ATTRIBUTE_HIDDEN: u32 = 0x2;
    metadata.file_attributes() & FILE_ATTRIBUTE_HIDDEN != 0
}

#[cfg(not(windows))]
fn has_hidden_attribute(_metadata: &Metadata) -> bool {
    false
}
