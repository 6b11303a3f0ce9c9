use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PathResolutionError {
    #[error("'{path}' is not under root folder '{root}'")]
    OutsideRoot { path: PathBuf, root: PathBuf },

    #[error("'{path}' is the root folder itself")]
    IsRoot { path: PathBuf },

    #[error("'{path}' contains a component that is not valid UTF-8")]
    NotUnicode { path: PathBuf },

    #[error("'{path}' contains an unsupported component")]
    UnsupportedComponent { path: PathBuf },
}

impl PathResolutionError {
    pub fn outside_root(path: impl Into<PathBuf>, root: impl Into<PathBuf>) -> Self {
        Self::OutsideRoot {
            path: path.into(),
            root: root.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outside_root_display() {
        let err = PathResolutionError::outside_root("/elsewhere/A.java", "/project");
        assert_eq!(
            err.to_string(),
            "'/elsewhere/A.java' is not under root folder '/project'"
        );
    }
}
