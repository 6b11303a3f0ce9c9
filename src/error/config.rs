use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing --path option or {env_var} env variable.")]
    MissingRootPath { env_var: &'static str },

    #[error("root path is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    #[error("invalid file extension '{extension}'")]
    InvalidExtension { extension: String },
}
