mod cache;
mod config;
mod extract;
mod io;
mod path;

pub use cache::CacheError;
pub use config::ConfigError;
pub use extract::ExtractionError;
pub use io::FsError;
pub use path::PathResolutionError;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error(transparent)]
    Fs(#[from] FsError),
}

pub type Result<T> = std::result::Result<T, Error>;
