//! In-memory test inventory keyed by normalized relative path.
//!
//! The index owns the merge policy: a file's test list is only ever replaced
//! wholesale, and a file with no tests never has an entry.

mod item;

pub use item::TestItem;

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::FsError;
use crate::paths::resolve_key;

/// A discovered test: the enclosing type and the method name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TestMethod {
    pub class_path: String,
    pub method_name: String,
}

impl TestMethod {
    pub fn new(class_path: impl Into<String>, method_name: impl Into<String>) -> Self {
        Self {
            class_path: class_path.into(),
            method_name: method_name.into(),
        }
    }
}

/// What [`TestIndex::upsert`] did to the entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Inserted,
    Replaced,
    Unchanged,
    Removed,
    Absent,
}

/// Ordered mapping from relative file path to the tests declared in it.
///
/// Backed by a `BTreeMap` so that enumeration, and therefore the serialized
/// cache, is stable for a given content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TestIndex {
    entries: BTreeMap<String, Vec<TestMethod>>,
}

impl TestIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the entry for `key` with `methods`. An empty list removes it.
    pub fn upsert(&mut self, key: impl Into<String>, methods: Vec<TestMethod>) -> Upsert {
        let key = key.into();
        if methods.is_empty() {
            return if self.remove(&key) {
                Upsert::Removed
            } else {
                Upsert::Absent
            };
        }

        match self.entries.get_mut(&key) {
            Some(existing) if *existing == methods => Upsert::Unchanged,
            Some(existing) => {
                *existing = methods;
                Upsert::Replaced
            }
            None => {
                self.entries.insert(key, methods);
                Upsert::Inserted
            }
        }
    }

    /// Returns whether an entry was removed.
    pub fn remove(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Drop every entry whose file no longer exists under `root_folder`.
    ///
    /// An entry whose file cannot be checked is kept and reported: it is only
    /// removed once the filesystem says the file is gone.
    pub fn prune(
        &mut self,
        root_folder: &Path,
        diagnostics: &mut dyn Diagnostics,
    ) -> Vec<String> {
        let mut removed = Vec::new();
        self.entries.retain(|key, _| {
            let path = resolve_key(root_folder, key);
            match still_present(&path) {
                Ok(true) => true,
                Ok(false) => {
                    trace!("Pruning {key}: file no longer exists");
                    removed.push(key.clone());
                    false
                }
                Err(err) => {
                    diagnostics.report(Diagnostic::FileUnreadable(FsError::file_unreadable(
                        path, err,
                    )));
                    true
                }
            }
        });
        removed
    }

    pub fn get(&self, key: &str) -> Option<&[TestMethod]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[TestMethod])> {
        self.entries
            .iter()
            .map(|(key, methods)| (key.as_str(), methods.as_slice()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Flattened view of every test, ordered by file then declaration.
    pub fn items(&self) -> Vec<TestItem> {
        self.iter()
            .flat_map(|(path, methods)| {
                methods
                    .iter()
                    .map(move |method| TestItem::new(path, method))
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn test_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }
}

/// Whether `path` is still a regular file. `Ok(false)` only when the
/// filesystem reports it missing or no longer a file.
fn still_present(path: &Path) -> io::Result<bool> {
    match fs::metadata(path) {
        Ok(metadata) => Ok(metadata.is_file()),
        Err(err)
            if matches!(
                err.kind(),
                io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
            ) =>
        {
            Ok(false)
        }
        Err(err) => Err(err),
    }
}

impl FromIterator<(String, Vec<TestMethod>)> for TestIndex {
    fn from_iter<I: IntoIterator<Item = (String, Vec<TestMethod>)>>(iter: I) -> Self {
        let mut index = Self::new();
        for (key, methods) in iter {
            index.upsert(key, methods);
        }
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Collector;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn foo_tests() -> Vec<TestMethod> {
        vec![
            TestMethod::new("pkg.FooTest", "testOne"),
            TestMethod::new("pkg.FooTest", "testTwo"),
        ]
    }

    #[test]
    fn test_upsert_inserts_new_entry() {
        let mut index = TestIndex::new();
        assert_eq!(index.upsert("FooTest.java", foo_tests()), Upsert::Inserted);
        assert_eq!(index.get("FooTest.java"), Some(foo_tests().as_slice()));
    }

    #[test]
    fn test_upsert_replaces_wholesale() {
        let mut index = TestIndex::new();
        index.upsert("FooTest.java", foo_tests());

        let shrunk = vec![TestMethod::new("pkg.FooTest", "testTwo")];
        assert_eq!(index.upsert("FooTest.java", shrunk.clone()), Upsert::Replaced);
        assert_eq!(index.get("FooTest.java"), Some(shrunk.as_slice()));
    }

    #[test]
    fn test_upsert_same_content_is_unchanged() {
        let mut index = TestIndex::new();
        index.upsert("FooTest.java", foo_tests());
        assert_eq!(index.upsert("FooTest.java", foo_tests()), Upsert::Unchanged);
    }

    #[test]
    fn test_upsert_empty_removes_entry() {
        let mut index = TestIndex::new();
        index.upsert("FooTest.java", foo_tests());

        assert_eq!(index.upsert("FooTest.java", vec![]), Upsert::Removed);
        assert!(!index.contains_key("FooTest.java"));
        assert_eq!(index.upsert("FooTest.java", vec![]), Upsert::Absent);
        assert!(index.is_empty());
    }

    #[test]
    fn test_remove_missing_key_is_noop() {
        let mut index = TestIndex::new();
        assert!(!index.remove("Nope.java"));
    }

    #[test]
    fn test_prune_removes_deleted_files_only() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("a")).unwrap();
        fs::write(root.join("a/KeptTest.java"), "class KeptTest {}").unwrap();

        let mut index = TestIndex::new();
        index.upsert("a/KeptTest.java", vec![TestMethod::new("a.KeptTest", "kept")]);
        index.upsert("a/GoneTest.java", vec![TestMethod::new("a.GoneTest", "gone")]);

        let mut diagnostics = Collector::new();
        let removed = index.prune(root, &mut diagnostics);

        assert_eq!(removed, vec!["a/GoneTest.java".to_string()]);
        assert_eq!(index.keys().collect::<Vec<_>>(), vec!["a/KeptTest.java"]);
        assert!(diagnostics.diagnostics.is_empty());
    }

    #[test]
    fn test_still_present() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("dir.java")).unwrap();
        fs::write(root.join("FooTest.java"), "class FooTest {}").unwrap();

        assert!(still_present(&root.join("FooTest.java")).unwrap());
        assert!(!still_present(&root.join("Missing.java")).unwrap());
        assert!(!still_present(&root.join("dir.java")).unwrap());
        assert!(!still_present(&root.join("FooTest.java/Nested.java")).unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn test_prune_keeps_entries_it_cannot_check() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let locked = root.join("locked");
        fs::create_dir_all(&locked).unwrap();
        fs::write(locked.join("FooTest.java"), "class FooTest {}").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
        let bypasses_permissions = fs::metadata(locked.join("FooTest.java")).is_ok();

        let mut index = TestIndex::new();
        index.upsert("locked/FooTest.java", foo_tests());
        let mut diagnostics = Collector::new();
        let removed = index.prune(root, &mut diagnostics);

        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        assert!(removed.is_empty());
        assert!(index.contains_key("locked/FooTest.java"));
        if !bypasses_permissions {
            assert!(matches!(
                diagnostics.diagnostics.as_slice(),
                [Diagnostic::FileUnreadable(_)]
            ));
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_prune_keeps_backslash_file_names() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("Foo\\Test.java"), "class FooTest {}").unwrap();

        let mut index = TestIndex::new();
        index.upsert("Foo\\Test.java", foo_tests());
        let removed = index.prune(root, &mut Collector::new());

        assert!(removed.is_empty());
        assert!(index.contains_key("Foo\\Test.java"));
    }

    #[test]
    fn test_enumeration_is_sorted() {
        let mut index = TestIndex::new();
        index.upsert("b/BTest.java", vec![TestMethod::new("b.BTest", "b")]);
        index.upsert("a/ATest.java", vec![TestMethod::new("a.ATest", "a")]);

        assert_eq!(
            index.keys().collect::<Vec<_>>(),
            vec!["a/ATest.java", "b/BTest.java"]
        );
    }

    #[test]
    fn test_items_flatten_in_declaration_order() {
        let mut index = TestIndex::new();
        index.upsert("FooTest.java", foo_tests());

        let arguments: Vec<_> = index.items().iter().map(TestItem::runtime_argument).collect();
        assert_eq!(arguments, vec!["pkg.FooTest.testOne", "pkg.FooTest.testTwo"]);
        assert_eq!(index.test_count(), 2);
    }

    #[test]
    fn test_serializes_as_plain_map() {
        let mut index = TestIndex::new();
        index.upsert("FooTest.java", vec![TestMethod::new("pkg.FooTest", "testOne")]);

        let json = serde_json::to_value(&index).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "FooTest.java": [{"class_path": "pkg.FooTest", "method_name": "testOne"}]
            })
        );
    }
}
