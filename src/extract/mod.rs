pub mod java;

pub use java::{JavaExtractor, JavaExtractorConfig};

use std::path::Path;

use crate::error::ExtractionError;
use crate::index::TestMethod;

/// Source of the tests declared in a single file.
///
/// Implementations own all parsing concerns. The returned list is in
/// declaration order and only contains tests declared directly in `path`.
pub trait Extractor {
    fn extract(&self, path: &Path) -> Result<Vec<TestMethod>, ExtractionError>;
}

impl<F> Extractor for F
where
    F: Fn(&Path) -> Result<Vec<TestMethod>, ExtractionError>,
{
    fn extract(&self, path: &Path) -> Result<Vec<TestMethod>, ExtractionError> {
        self(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_is_an_extractor() {
        let extractor = |_: &Path| -> Result<Vec<TestMethod>, ExtractionError> {
            Ok(vec![TestMethod::new("pkg.FooTest", "testOne")])
        };
        let tests = extractor.extract(Path::new("FooTest.java")).unwrap();
        assert_eq!(tests, vec![TestMethod::new("pkg.FooTest", "testOne")]);
    }
}
