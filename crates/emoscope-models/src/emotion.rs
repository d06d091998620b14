//! Emotion category definitions and per-face score vectors.
//!
//! The category set is closed: detectors may report an open set of labels on
//! the wire, but only the seven categories defined here are consumed
//! downstream. A category that a detector did not report is absent from the
//! score vector, never implicitly zero.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One of the seven consumed emotion categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmotionCategory {
    Anger,
    Happiness,
    Sadness,
    Surprise,
    Fear,
    Disgust,
    Neutral,
}

impl EmotionCategory {
    /// All categories in canonical order.
    pub const ALL: &'static [EmotionCategory] = &[
        EmotionCategory::Anger,
        EmotionCategory::Happiness,
        EmotionCategory::Sadness,
        EmotionCategory::Surprise,
        EmotionCategory::Fear,
        EmotionCategory::Disgust,
        EmotionCategory::Neutral,
    ];

    /// Returns the category name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            EmotionCategory::Anger => "anger",
            EmotionCategory::Happiness => "happiness",
            EmotionCategory::Sadness => "sadness",
            EmotionCategory::Surprise => "surprise",
            EmotionCategory::Fear => "fear",
            EmotionCategory::Disgust => "disgust",
            EmotionCategory::Neutral => "neutral",
        }
    }

    /// Fixed chart color used by every downstream artifact.
    pub fn chart_color(&self) -> &'static str {
        match self {
            EmotionCategory::Anger => "red",
            EmotionCategory::Happiness => "gold",
            EmotionCategory::Sadness => "blue",
            EmotionCategory::Surprise => "orange",
            EmotionCategory::Fear => "purple",
            EmotionCategory::Disgust => "green",
            EmotionCategory::Neutral => "gray",
        }
    }
}

impl fmt::Display for EmotionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EmotionCategory {
    type Err = EmotionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "anger" => Ok(EmotionCategory::Anger),
            "happiness" => Ok(EmotionCategory::Happiness),
            "sadness" => Ok(EmotionCategory::Sadness),
            "surprise" => Ok(EmotionCategory::Surprise),
            "fear" => Ok(EmotionCategory::Fear),
            "disgust" => Ok(EmotionCategory::Disgust),
            "neutral" => Ok(EmotionCategory::Neutral),
            _ => Err(EmotionParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
#[error("Unknown emotion category: {0}")]
pub struct EmotionParseError(pub String);

/// Sparse per-face emotion intensity vector.
///
/// Maps each reported category to a non-negative intensity. Categories the
/// detector did not report are simply absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmotionScores {
    scores: BTreeMap<EmotionCategory, f64>,
}

impl EmotionScores {
    /// Create an empty score vector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an intensity for a category. Non-finite or negative values are
    /// treated as unusable and dropped.
    pub fn insert(&mut self, category: EmotionCategory, value: f64) {
        if value.is_finite() && value >= 0.0 {
            self.scores.insert(category, value);
        }
    }

    /// Intensity for a category, if reported.
    pub fn get(&self, category: EmotionCategory) -> Option<f64> {
        self.scores.get(&category).copied()
    }

    /// Categories present in this vector, in canonical order.
    pub fn categories(&self) -> impl Iterator<Item = EmotionCategory> + '_ {
        self.scores.keys().copied()
    }

    /// Iterate (category, intensity) pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (EmotionCategory, f64)> + '_ {
        self.scores.iter().map(|(c, v)| (*c, *v))
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    /// Arg-max over the categories present. Ties resolve to the earliest
    /// category in canonical order. `None` when no category was reported.
    pub fn dominant(&self) -> Option<EmotionCategory> {
        let mut best: Option<(EmotionCategory, f64)> = None;
        for (category, value) in self.iter() {
            match best {
                Some((_, b)) if value <= b => {}
                _ => best = Some((category, value)),
            }
        }
        best.map(|(c, _)| c)
    }
}

impl FromIterator<(EmotionCategory, f64)> for EmotionScores {
    fn from_iter<I: IntoIterator<Item = (EmotionCategory, f64)>>(iter: I) -> Self {
        let mut scores = Self::new();
        for (category, value) in iter {
            scores.insert(category, value);
        }
        scores
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_round_trip() {
        for category in EmotionCategory::ALL {
            let parsed: EmotionCategory = category.as_str().parse().unwrap();
            assert_eq!(parsed, *category);
        }
        assert!("boredom".parse::<EmotionCategory>().is_err());
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(
            "Happiness".parse::<EmotionCategory>().unwrap(),
            EmotionCategory::Happiness
        );
        assert_eq!(
            "  NEUTRAL ".parse::<EmotionCategory>().unwrap(),
            EmotionCategory::Neutral
        );
    }

    #[test]
    fn test_dominant_is_argmax_over_present() {
        let scores: EmotionScores = [
            (EmotionCategory::Sadness, 0.2),
            (EmotionCategory::Happiness, 0.7),
            (EmotionCategory::Neutral, 0.1),
        ]
        .into_iter()
        .collect();
        assert_eq!(scores.dominant(), Some(EmotionCategory::Happiness));
    }

    #[test]
    fn test_dominant_of_empty_is_none() {
        assert_eq!(EmotionScores::new().dominant(), None);
    }

    #[test]
    fn test_insert_rejects_unusable_values() {
        let mut scores = EmotionScores::new();
        scores.insert(EmotionCategory::Fear, -0.5);
        scores.insert(EmotionCategory::Anger, f64::NAN);
        scores.insert(EmotionCategory::Neutral, 0.0);
        assert_eq!(scores.len(), 1);
        assert_eq!(scores.get(EmotionCategory::Neutral), Some(0.0));
    }
}
