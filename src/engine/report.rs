/// What a cycle did, for logging and for callers deciding whether to persist.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub previous_timestamp: u64,
    pub timestamp: u64,
    /// Keys dropped because their file no longer exists.
    pub pruned: Vec<String>,
    pub changed: usize,
    pub unchanged: usize,
    pub skipped: usize,
    /// Paths the scan could not read. While non-zero the baseline stays put.
    pub unreadable: usize,
    pub inserted: Vec<String>,
    pub replaced: Vec<String>,
    /// Keys whose file no longer declares any test.
    pub removed: Vec<String>,
    /// Keys (or raw paths, when no key could be derived) left untouched after a failure.
    pub failed: Vec<String>,
}

impl CycleReport {
    pub fn new(previous_timestamp: u64) -> Self {
        Self {
            previous_timestamp,
            timestamp: previous_timestamp,
            ..Self::default()
        }
    }

    pub fn index_changed(&self) -> bool {
        !(self.pruned.is_empty()
            && self.inserted.is_empty()
            && self.replaced.is_empty()
            && self.removed.is_empty())
    }
}
