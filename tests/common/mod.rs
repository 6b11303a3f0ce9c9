//! Shared helpers for building throwaway Java source trees.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tempfile::TempDir;
use testindex::diagnostics::Collector;
use testindex::{CacheSource, Cycle, Engine, JavaExtractor};

pub const FOO_TEST: &str = r#"
package pkg;

import org.junit.jupiter.api.Test;

public class FooTest {
    @Test
    void testOne() {}

    @Test
    void testTwo() {}

    void helper() {}
}
"#;

pub const FOO_TEST_SHRUNK: &str = r#"
package pkg;

import org.junit.jupiter.api.Test;

public class FooTest {
    @Test
    void testTwo() {}

    void helper() {}
}
"#;

pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.root().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    /// Rewrite a file and push its mtime into the future so it is newer than
    /// any baseline a previous cycle could have recorded.
    pub fn edit(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.write(relative, content);
        let file = fs::File::options().write(true).open(&path).unwrap();
        file.set_modified(SystemTime::now() + Duration::from_secs(60))
            .unwrap();
        path
    }

    pub fn remove(&self, relative: &str) {
        fs::remove_file(self.root().join(relative)).unwrap();
    }

    pub fn engine(&self) -> Engine<JavaExtractor> {
        Engine::new(self.root(), JavaExtractor::default())
    }

    pub fn cycle(&self, source: CacheSource) -> (Cycle, Collector) {
        let mut diagnostics = Collector::new();
        let cycle = self.engine().run(&source, &mut diagnostics).unwrap();
        (cycle, diagnostics)
    }
}
