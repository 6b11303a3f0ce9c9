//! Persisted cycle state and its JSON form.
//!
//! ```json
//! {
//!   "root_folder": "/home/me/project",
//!   "timestamp": 1700000000000,
//!   "tests": {
//!     "src/test/java/pkg/FooTest.java": [
//!       {"class_path": "pkg.FooTest", "method_name": "testOne"}
//!     ]
//!   }
//! }
//! ```
//!
//! Unknown top-level fields survive a load/save round trip.

use std::fs;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::{CacheError, FsError, Result};
use crate::index::TestIndex;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheState {
    pub root_folder: String,
    /// Baseline for change detection, epoch milliseconds.
    pub timestamp: u64,
    pub tests: TestIndex,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl CacheState {
    pub fn new_empty(root_folder: impl Into<String>) -> Self {
        Self {
            root_folder: root_folder.into(),
            timestamp: 0,
            tests: TestIndex::new(),
            extra: serde_json::Map::new(),
        }
    }

    /// Make `root_folder` authoritative.
    ///
    /// Existing keys are kept as they are, on the assumption that the new root
    /// holds the same relative layout. Entries that do not resolve under the
    /// new root are pruned by the next cycle.
    pub fn reconcile_root(&mut self, root_folder: &Path, diagnostics: &mut dyn Diagnostics) {
        let supplied = root_folder.to_string_lossy();
        if self.root_folder == supplied {
            return;
        }
        if Path::new(&self.root_folder) != root_folder {
            diagnostics.report(Diagnostic::RootFolderChanged {
                cached: self.root_folder.clone(),
                supplied: supplied.to_string(),
            });
        }
        self.root_folder = supplied.into_owned();
    }
}

/// Fresh state for a tree that has never been scanned.
pub fn init(root_folder: &Path) -> CacheState {
    CacheState::new_empty(root_folder.to_string_lossy())
}

/// Parse a cache document. Malformed input is never repaired.
pub fn parse(document: &str) -> std::result::Result<CacheState, CacheError> {
    serde_json::from_str(document).map_err(CacheError::corrupt)
}

pub fn load(path: &Path) -> Result<CacheState> {
    let content = fs::read_to_string(path).map_err(|e| FsError::file_unreadable(path, e))?;
    let state = serde_json::from_str(&content).map_err(|e| CacheError::corrupt_file(path, e))?;
    debug!(path = %path.display(), "loaded cache");
    Ok(state)
}

pub fn save(state: &CacheState) -> std::result::Result<String, CacheError> {
    serde_json::to_string(state).map_err(CacheError::Serialize)
}

pub fn save_pretty(state: &CacheState) -> std::result::Result<String, CacheError> {
    serde_json::to_string_pretty(state).map_err(CacheError::Serialize)
}

/// Replace the cache file at `path` without ever exposing a partial write.
pub fn write(path: &Path, state: &CacheState) -> Result<()> {
    let document = save(state)?;
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut staged =
        tempfile::NamedTempFile::new_in(directory).map_err(|e| FsError::write_error(path, e))?;
    staged
        .write_all(document.as_bytes())
        .and_then(|()| staged.as_file().sync_all())
        .map_err(|e| FsError::write_error(path, e))?;
    staged
        .persist(path)
        .map_err(|e| FsError::write_error(path, e.error))?;

    debug!(path = %path.display(), "wrote cache");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Collector;
    use crate::error::Error;
    use crate::index::TestMethod;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn sample_state() -> CacheState {
        let mut state = CacheState::new_empty("/project");
        state.timestamp = 1_700_000_000_123;
        state.tests.upsert(
            "pkg/FooTest.java",
            vec![
                TestMethod::new("pkg.FooTest", "testTwo"),
                TestMethod::new("pkg.FooTest", "testOne"),
            ],
        );
        state
    }

    #[test]
    fn test_init_is_empty() {
        let state = init(Path::new("/project"));
        assert_eq!(state.root_folder, "/project");
        assert_eq!(state.timestamp, 0);
        assert!(state.tests.is_empty());
    }

    #[test]
    fn test_round_trip_keeps_method_order() {
        let state = sample_state();
        let restored = parse(&save(&state).unwrap()).unwrap();
        assert_eq!(restored, state);
    }

    #[test]
    fn test_schema_field_names() {
        let json: serde_json::Value = serde_json::from_str(&save(&sample_state()).unwrap()).unwrap();
        assert_eq!(json["root_folder"], "/project");
        assert_eq!(json["timestamp"], 1_700_000_000_123u64);
        assert_eq!(
            json["tests"]["pkg/FooTest.java"][0],
            serde_json::json!({"class_path": "pkg.FooTest", "method_name": "testTwo"})
        );
    }

    #[test]
    fn test_unknown_fields_are_preserved() {
        let document = r#"{"root_folder":"/p","timestamp":5,"tests":{},"schema":"v0","extra":{"a":1}}"#;
        let state = parse(document).unwrap();
        assert_eq!(state.extra["schema"], "v0");

        let reparsed: serde_json::Value = serde_json::from_str(&save(&state).unwrap()).unwrap();
        assert_eq!(reparsed["schema"], "v0");
        assert_eq!(reparsed["extra"]["a"], 1);
    }

    #[test]
    fn test_malformed_document_is_corrupt() {
        for document in [
            "",
            "{",
            "[]",
            r#"{"root_folder":"/p","timestamp":-1,"tests":{}}"#,
            r#"{"root_folder":"/p","tests":{}}"#,
            r#"{"root_folder":"/p","timestamp":0,"tests":{"A.java":[{"class_path":"A"}]}}"#,
        ] {
            assert!(
                matches!(parse(document), Err(CacheError::Corrupt { .. })),
                "expected corrupt: {document:?}"
            );
        }
    }

    #[test]
    fn test_reconcile_root_overwrites_and_warns() {
        let mut state = sample_state();
        state.root_folder = "/old".to_string();
        let mut diagnostics = Collector::new();

        state.reconcile_root(Path::new("/new"), &mut diagnostics);

        assert_eq!(state.root_folder, "/new");
        assert!(state.tests.contains_key("pkg/FooTest.java"));
        assert!(matches!(
            diagnostics.diagnostics.as_slice(),
            [Diagnostic::RootFolderChanged { .. }]
        ));
    }

    #[test]
    fn test_reconcile_same_root_is_silent() {
        let mut state = sample_state();
        let mut diagnostics = Collector::new();

        state.reconcile_root(Path::new("/project/"), &mut diagnostics);

        assert_eq!(state.root_folder, "/project/");
        assert!(diagnostics.diagnostics.is_empty());
    }

    #[test]
    fn test_write_then_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("cache.json");
        let state = sample_state();

        write(&path, &state).unwrap();
        write(&path, &state).unwrap();

        assert_eq!(load(&path).unwrap(), state);
    }

    #[test]
    fn test_load_corrupt_file_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("cache.json");
        fs::write(&path, "not json").unwrap();

        let err = load(&path).unwrap_err();
        assert!(matches!(err, Error::Cache(CacheError::Corrupt { .. })));
    }
}
