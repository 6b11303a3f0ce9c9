/// Test Index
///
/// Keeps an incremental inventory of the test methods declared in a source
/// tree. Each cycle prunes entries for deleted files, re-extracts only files
/// changed since the stored timestamp, and returns the updated state.
pub mod cache;
pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod extract;
pub mod index;
pub mod logging;
pub mod paths;
pub mod scanner;

pub use cache::CacheState;
pub use engine::{CacheSource, Cycle, CycleReport, Engine};
pub use error::{Error, Result};
pub use extract::{Extractor, JavaExtractor};
pub use index::{TestIndex, TestMethod};
