//! Conversion between absolute file paths and index keys.
//!
//! An index key is the file's path relative to the tracked root folder, with
//! components joined by `/` and no leading separator, so the same tree yields
//! the same keys on every platform.

use std::path::{Component, Path, PathBuf};

use crate::error::PathResolutionError;

/// Produce the index key of `file` relative to `root`.
pub fn relative_key(root: &Path, file: &Path) -> Result<String, PathResolutionError> {
    let relative = file
        .strip_prefix(root)
        .map_err(|_| PathResolutionError::outside_root(file, root))?;

    let mut segments = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(segment) => {
                let segment = segment
                    .to_str()
                    .ok_or_else(|| PathResolutionError::NotUnicode {
                        path: file.to_path_buf(),
                    })?;
                segments.push(segment);
            }
            Component::CurDir => {}
            Component::RootDir | Component::Prefix(_) | Component::ParentDir => {
                return Err(PathResolutionError::UnsupportedComponent {
                    path: file.to_path_buf(),
                });
            }
        }
    }

    if segments.is_empty() {
        return Err(PathResolutionError::IsRoot {
            path: file.to_path_buf(),
        });
    }

    Ok(segments.join("/"))
}

/// Separators accepted when turning a key back into a path. A backslash is
/// a legal file name character outside Windows.
#[cfg(windows)]
const KEY_SEPARATORS: &[char] = &['/', '\\'];
#[cfg(not(windows))]
const KEY_SEPARATORS: &[char] = &['/'];

/// Inverse of [`relative_key`]: the on-disk location of `key` under `root`.
///
/// A leading separator is tolerated.
pub fn resolve_key(root: &Path, key: &str) -> PathBuf {
    key.split(KEY_SEPARATORS)
        .filter(|segment| !segment.is_empty())
        .fold(root.to_path_buf(), |path, segment| path.join(segment))
}
