//! Detector boundary for the emoscope pipeline.
//!
//! The face-detection / emotion-classification model is an external
//! collaborator: given an image it returns zero or more face observations,
//! each with a bounding box and a vector of per-category emotion scores. It
//! is treated as an opaque, possibly-slow, possibly-failing black box behind
//! the [`EmotionDetector`] trait.
//!
//! [`HttpDetector`] talks to the analysis service over HTTP;
//! [`DetectionAdapter`] normalizes raw service output into the fixed
//! [`FaceObservation`] record shape, assigning within-frame face identities.
//!
//! [`FaceObservation`]: emoscope_models::FaceObservation

pub mod adapter;
pub mod client;
pub mod error;
pub mod types;

use async_trait::async_trait;
use emoscope_media::Frame;

pub use adapter::{DetectionAdapter, FaceMode};
pub use client::{DetectorConfig, HttpDetector};
pub use error::{DetectorError, DetectorResult};
pub use types::{DetectResponse, RawBox, RawDetection};

/// Black-box detector boundary.
///
/// One frame in, zero or more raw detections out. Invocation is the dominant
/// cost of the ingestion loop and carries unbounded latency; callers must
/// treat any error as "this frame contributes zero rows", never as fatal.
#[async_trait]
pub trait EmotionDetector: Send + Sync {
    /// Analyze a single frame.
    async fn detect(&self, frame: &Frame) -> DetectorResult<Vec<RawDetection>>;

    /// Human-readable name for logging.
    fn name(&self) -> &'static str;
}
