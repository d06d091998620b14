//! Shared data models for the emoscope pipeline.
//!
//! This crate provides Serde-serializable types for:
//! - Emotion categories and per-face score vectors
//! - Face observations (one detected face in one frame)
//! - The accumulated time-series table and its invariants
//! - Resolved frame ranges
//! - CSV persistence of the finished table

pub mod emotion;
pub mod error;
pub mod observation;
pub mod range;
pub mod table;

// Re-export common types
pub use emotion::{EmotionCategory, EmotionParseError, EmotionScores};
pub use error::{ModelError, ModelResult};
pub use observation::{BoundingBox, FaceObservation};
pub use range::FrameRange;
pub use table::{TableBuilder, TimeSeriesTable};
