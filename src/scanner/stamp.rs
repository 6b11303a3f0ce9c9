use std::fs::Metadata;
use std::time::{SystemTime, UNIX_EPOCH};

/// Filesystem timestamps of a candidate, in epoch milliseconds.
///
/// Either may be missing: creation time is unsupported on several
/// filesystems and platforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FileStamp {
    pub modified: Option<u64>,
    pub created: Option<u64>,
}

impl FileStamp {
    pub fn from_metadata(metadata: &Metadata) -> Self {
        Self {
            modified: metadata.modified().ok().map(millis_since_epoch),
            created: metadata.created().ok().map(millis_since_epoch),
        }
    }

    pub fn latest(&self) -> Option<u64> {
        self.modified.max(self.created)
    }
}

/// Times before the epoch clamp to 0.
pub fn millis_since_epoch(time: SystemTime) -> u64 {
    time.duration_since(UNIX_EPOCH)
        .map(|elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}
