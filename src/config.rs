pub const DEFAULT_EXTENSION: &str = "java";

pub const PATH_ENV_VAR: &str = "JAVA_PROJECT_PATH";
pub const CACHE_ENV_VAR: &str = "JAVA_PROJECT_FZT_CACHE_PATH";

/// Simple names of the JUnit 4/5 annotations that mark a method as a test.
pub const DEFAULT_TEST_ANNOTATIONS: &[&str] = &[
    "Test",
    "ParameterizedTest",
    "RepeatedTest",
    "TestFactory",
    "TestTemplate",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Source file suffix without the leading dot, matched case-insensitively.
    pub extension: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }
}

impl EngineConfig {
    pub fn with_extension(extension: impl Into<String>) -> Self {
        let extension = extension.into();
        Self {
            extension: extension.trim_start_matches('.').to_string(),
        }
    }
}
