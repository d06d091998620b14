//! Face observation: one detected face's emotion vector in one frame.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::emotion::{EmotionCategory, EmotionScores};

/// Pixel-space bounding box of a detected face.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// X coordinate of the top-left corner
    pub x_min: f64,
    /// Y coordinate of the top-left corner
    pub y_min: f64,
    /// Width in pixels
    pub width: f64,
    /// Height in pixels
    pub height: f64,
}

impl BoundingBox {
    /// Create a new bounding box.
    pub fn new(x_min: f64, y_min: f64, width: f64, height: f64) -> Self {
        Self {
            x_min,
            y_min,
            width,
            height,
        }
    }

    /// Check that the box has positive extent and a non-negative origin.
    pub fn is_valid(&self) -> bool {
        self.x_min >= 0.0 && self.y_min >= 0.0 && self.width > 0.0 && self.height > 0.0
    }

    /// Box area in square pixels.
    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

/// One detected face's record for one sampled frame.
///
/// `face_id` is unique only within the same `frame_index`, assigned by
/// detector enumeration order. Two observations with the same `face_id` in
/// different frames are not guaranteed to be the same physical person.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceObservation {
    /// Frame index within the source video (1-based decode ordinal).
    pub frame_index: u64,

    /// 1-based face number within this frame.
    pub face_id: u32,

    /// Detector bounding box, when reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<BoundingBox>,

    /// Sparse per-category emotion intensities.
    pub emotion_scores: EmotionScores,

    /// Auxiliary signals (action units), only produced by the single-frame
    /// live-preview path, never by batch video processing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_units: Option<BTreeMap<String, f64>>,
}

impl FaceObservation {
    /// Create a new observation.
    pub fn new(frame_index: u64, face_id: u32, emotion_scores: EmotionScores) -> Self {
        Self {
            frame_index,
            face_id,
            bounding_box: None,
            emotion_scores,
            action_units: None,
        }
    }

    /// Attach a bounding box.
    pub fn with_bounding_box(mut self, bbox: BoundingBox) -> Self {
        self.bounding_box = Some(bbox);
        self
    }

    /// Attach auxiliary action-unit signals.
    pub fn with_action_units(mut self, units: BTreeMap<String, f64>) -> Self {
        self.action_units = Some(units);
        self
    }

    /// Dominant emotion for this row, if any category was reported.
    pub fn dominant_emotion(&self) -> Option<EmotionCategory> {
        self.emotion_scores.dominant()
    }

    /// Timestamp of this frame given a frame rate.
    pub fn second(&self, fps: f64) -> f64 {
        self.frame_index as f64 / fps
    }
}
