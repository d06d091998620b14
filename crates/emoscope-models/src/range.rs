//! Resolved frame windows.

use serde::{Deserialize, Serialize};

/// A resolved [start, end] frame window.
///
/// Both endpoints are guaranteed by construction (see the range resolver in
/// the analytics crate) to be members of the table's sampled-frame set,
/// never arbitrary integers that might fall in a sampling gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameRange {
    /// First sampled frame of the window (inclusive).
    pub start: u64,
    /// Last sampled frame of the window (inclusive).
    pub end: u64,
}

impl FrameRange {
    /// Create a range. Callers must ensure `start <= end`.
    pub fn new(start: u64, end: u64) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    /// Whether a frame index falls inside the window.
    pub fn contains(&self, frame_index: u64) -> bool {
        self.start <= frame_index && frame_index <= self.end
    }

    /// Window duration in seconds for a given frame rate.
    pub fn span_seconds(&self, fps: f64) -> f64 {
        (self.end - self.start) as f64 / fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_is_inclusive() {
        let range = FrameRange::new(10, 20);
        assert!(range.contains(10));
        assert!(range.contains(20));
        assert!(!range.contains(9));
        assert!(!range.contains(21));
    }
}
