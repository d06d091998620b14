//! Normalizes raw service output into the fixed record shape.
//!
//! Identity assignment happens here: within one frame, faces are numbered
//! 1..k in detector enumeration order. The number is stable only inside that
//! frame; it is NOT a cross-frame identity, and no tracking is layered on
//! top of it.

use std::str::FromStr;

use tracing::debug;

use emoscope_models::{BoundingBox, EmotionCategory, EmotionScores, FaceObservation};

use crate::types::RawDetection;

/// How many faces per frame survive adaptation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FaceMode {
    /// Keep only the first detection; its face id is fixed at 1.
    #[default]
    Single,
    /// Keep every detection, numbered 1..k in detector output order.
    Multi,
}

/// Converts raw detections for one frame into table rows.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetectionAdapter {
    mode: FaceMode,
}

impl DetectionAdapter {
    /// Create an adapter for the given face mode.
    pub fn new(mode: FaceMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> FaceMode {
        self.mode
    }

    /// Normalize one frame's detections into observations.
    ///
    /// Detections whose emotion map contains no recognized category are
    /// dropped; face ids are assigned over the detections that survive, so
    /// the within-frame 1..k invariant holds regardless of drops. An empty
    /// result means the frame contributes zero rows.
    pub fn observe_frame(
        &self,
        frame_index: u64,
        detections: Vec<RawDetection>,
    ) -> Vec<FaceObservation> {
        let kept: Box<dyn Iterator<Item = RawDetection>> = match self.mode {
            FaceMode::Single => Box::new(detections.into_iter().take(1)),
            FaceMode::Multi => Box::new(detections.into_iter()),
        };

        let mut observations = Vec::new();
        for raw in kept {
            let scores = normalize_scores(&raw);
            if scores.is_empty() {
                debug!(
                    frame = frame_index,
                    "dropping detection with no recognized emotion categories"
                );
                continue;
            }

            let face_id = observations.len() as u32 + 1;
            let mut obs = FaceObservation::new(frame_index, face_id, scores);
            if let Some(bbox) = raw.bbox {
                let bbox = BoundingBox::new(bbox.x_min, bbox.y_min, bbox.width, bbox.height);
                if bbox.is_valid() {
                    obs = obs.with_bounding_box(bbox);
                }
            }
            if let Some(units) = raw.action_units {
                obs = obs.with_action_units(units);
            }
            observations.push(obs);
        }
        observations
    }
}

/// Keep the recognized categories, drop the rest of the open set.
fn normalize_scores(raw: &RawDetection) -> EmotionScores {
    let mut scores = EmotionScores::new();
    for (label, value) in &raw.emotions {
        if let Ok(category) = EmotionCategory::from_str(label) {
            scores.insert(category, *value);
        }
    }
    scores
}
