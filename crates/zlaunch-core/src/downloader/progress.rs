//! Percentage progress for a single download.

/// Tracks bytes written against the declared total and yields integer
/// percentages, each one only once.
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    /// Declared size in bytes; 0 means unknown and disables reporting.
    total_bytes: u64,
    bytes_done: u64,
    last_reported: Option<u32>,
}

impl ProgressTracker {
    pub fn new(total_bytes: u64) -> Self {
        Self {
            total_bytes,
            bytes_done: 0,
            last_reported: None,
        }
    }

    /// Account for `n` more bytes. Returns the new percentage
    /// (`floor(done * 100 / total)`) if it differs from the last one reported.
    pub fn advance(&mut self, n: u64) -> Option<u32> {
        self.bytes_done = self.bytes_done.saturating_add(n);
        if self.total_bytes == 0 {
            return None;
        }
        let pct = (u128::from(self.bytes_done) * 100 / u128::from(self.total_bytes)) as u32;
        if self.last_reported == Some(pct) {
            return None;
        }
        self.last_reported = Some(pct);
        Some(pct)
    }

    pub fn bytes_done(&self) -> u64 {
        self.bytes_done
    }

    pub fn total_bytes(&self) -> u64 {
        self.total_bytes
    }
}
