//! Ingestion parameters.

use emoscope_detector::FaceMode;

/// Parameters of one ingestion run.
#[derive(Debug, Clone)]
pub struct ProcessConfig {
    /// Keep every k-th frame, `k >= 1`.
    pub sampling_interval: u64,
    /// Single- or multi-face adaptation.
    pub face_mode: FaceMode,
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self {
            sampling_interval: 10,
            face_mode: FaceMode::Single,
        }
    }
}
