use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("cache document{} is corrupt: {source}", origin_suffix(.origin))]
    Corrupt {
        origin: Option<PathBuf>,
        source: serde_json::Error,
    },

    #[error("failed to serialize cache state: {0}")]
    Serialize(serde_json::Error),
}

fn origin_suffix(origin: &Option<PathBuf>) -> String {
    origin
        .as_ref()
        .map(|path| format!(" '{}'", path.display()))
        .unwrap_or_default()
}

impl CacheError {
    pub fn corrupt(source: serde_json::Error) -> Self {
        Self::Corrupt {
            origin: None,
            source,
        }
    }

    pub fn corrupt_file(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Corrupt {
            origin: Some(path.into()),
            source,
        }
    }
}
