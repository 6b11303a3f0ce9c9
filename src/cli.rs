use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::config::{EngineConfig, CACHE_ENV_VAR, DEFAULT_EXTENSION, PATH_ENV_VAR};
use crate::engine::CacheSource;
use crate::error::ConfigError;
use crate::extract::JavaExtractorConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// The updated cache document
    Json,
    /// One `Class.method` selector per line
    List,
}

#[derive(Parser, Debug)]
#[command(name = "testindex")]
#[command(about = "Incremental test index - keep track of which tests live in which file", long_about = None)]
pub struct Args {
    /// Root of the source tree to index
    #[arg(short, long, value_name = "PATH", env = PATH_ENV_VAR)]
    pub path: Option<PathBuf>,

    /// Existing cache document (JSON text) from a previous run
    #[arg(short, long, value_name = "JSON", env = CACHE_ENV_VAR)]
    pub cache: Option<String>,

    /// Read the existing cache from a file (takes precedence over --cache)
    #[arg(long, value_name = "FILE")]
    pub cache_file: Option<PathBuf>,

    /// Write the updated cache back to --cache-file
    #[arg(long, requires = "cache_file")]
    pub write: bool,

    /// Output file path (prints to stdout if not specified)
    #[arg(short = 'O', long, value_name = "FILE")]
    pub output_file: Option<PathBuf>,

    /// Output format (json, list)
    #[arg(short = 'f', long, default_value = "json")]
    pub format: OutputFormat,

    /// Pretty-print the JSON document
    #[arg(long)]
    pub pretty: bool,

    /// Source file extension to track
    #[arg(long, value_name = "EXT", default_value = DEFAULT_EXTENSION)]
    pub extension: String,

    /// Annotation marking a test method. Can be specified multiple times.
    #[arg(long = "annotation", value_name = "NAME")]
    pub annotations: Vec<String>,

    /// Give up on a single file after this many milliseconds of parsing
    #[arg(long, value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// The root folder, required either as flag or environment variable.
    pub fn root(&self) -> Result<&Path, ConfigError> {
        let path = self
            .path
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or(ConfigError::MissingRootPath {
                env_var: PATH_ENV_VAR,
            })?;
        if path.exists() && !path.is_dir() {
            return Err(ConfigError::NotADirectory {
                path: path.to_path_buf(),
            });
        }
        Ok(path)
    }

    pub fn cache_source(&self) -> CacheSource {
        if let Some(path) = &self.cache_file {
            return CacheSource::File(path.clone());
        }
        match self.cache.as_deref().map(str::trim) {
            Some(document) if !document.is_empty() => CacheSource::Document(document.to_string()),
            _ => CacheSource::Fresh,
        }
    }

    pub fn engine_config(&self) -> Result<EngineConfig, ConfigError> {
        let config = EngineConfig::with_extension(self.extension.as_str());
        if config.extension.is_empty() || config.extension.contains(['/', '\\']) {
            return Err(ConfigError::InvalidExtension {
                extension: self.extension.clone(),
            });
        }
        Ok(config)
    }

    pub fn extractor_config(&self) -> JavaExtractorConfig {
        let mut config = JavaExtractorConfig::default();
        if !self.annotations.is_empty() {
            config.annotations = self
                .annotations
                .iter()
                .map(|name| name.trim_start_matches('@').to_string())
                .collect::<HashSet<_>>();
        }
        config.timeout = self.timeout_ms.map(Duration::from_millis);
        config
    }
}
