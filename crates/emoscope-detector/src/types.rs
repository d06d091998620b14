//! Wire types for the analysis service.
//!
//! The emotion category set is open on the wire; only the seven categories
//! the models crate defines are consumed downstream, everything else is
//! dropped during adaptation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Request body for a single-frame analysis call.
#[derive(Debug, Clone, Serialize)]
pub struct DetectRequest {
    /// PNG-encoded frame, base64.
    pub image: String,
    /// Hint that the caller wants every face, not just the most prominent.
    pub multi_face: bool,
}

/// Response body: zero or more face records.
#[derive(Debug, Clone, Deserialize)]
pub struct DetectResponse {
    pub faces: Vec<RawDetection>,
}

/// One face as reported by the service, before adaptation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawDetection {
    /// Bounding box, when the service reports one.
    #[serde(default)]
    pub bbox: Option<RawBox>,

    /// Open-set emotion label -> intensity map.
    pub emotions: BTreeMap<String, f64>,

    /// Auxiliary action-unit signals (live-preview responses only).
    #[serde(default)]
    pub action_units: Option<BTreeMap<String, f64>>,
}

/// Bounding box in pixel coordinates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RawBox {
    pub x_min: f64,
    pub y_min: f64,
    pub width: f64,
    pub height: f64,
}

/// Health endpoint response.
#[derive(Debug, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}
