//! Chart-data builders.
//!
//! Each builder consumes a slice of rows (the resolved window, already
//! fanned out per face) plus explicit numeric parameters and returns a
//! serializable data artifact. Rendering — rasterized charts, interactive
//! HTML, PDF pages — is a leaf consumer of these artifacts and lives
//! outside this crate.

use serde::Serialize;

use emoscope_models::{EmotionCategory, FaceObservation};

use crate::projection::{Method, ParamSubstitution, ProjectionResult};

/// Positional cap applied to trend series for very long videos.
pub const MAX_TREND_POINTS: usize = 2000;

/// Line/dynamic chart data: per-category intensity over time.
#[derive(Debug, Clone, Serialize)]
pub struct TrendSeries {
    pub title: String,
    pub face_id: Option<u32>,
    /// Sampled frame indices, one per point.
    pub frames: Vec<u64>,
    /// Seconds per point, derived from the caller's fps.
    pub seconds: Vec<f64>,
    pub series: Vec<EmotionSeries>,
}

/// One category's filled intensity curve.
#[derive(Debug, Clone, Serialize)]
pub struct EmotionSeries {
    pub category: EmotionCategory,
    pub color: &'static str,
    pub values: Vec<f64>,
}

/// Pie/bar chart data: dominant-emotion frequencies over a window.
#[derive(Debug, Clone, Serialize)]
pub struct DominantShare {
    pub title: String,
    pub face_id: Option<u32>,
    /// (category, color, count), descending by count.
    pub counts: Vec<DominantCount>,
    pub total_rows: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct DominantCount {
    pub category: EmotionCategory,
    pub color: &'static str,
    pub count: usize,
}

/// Heatmap data: category x frame intensity matrix.
#[derive(Debug, Clone, Serialize)]
pub struct HeatmapData {
    pub title: String,
    pub face_id: Option<u32>,
    pub frames: Vec<u64>,
    pub seconds: Vec<f64>,
    pub categories: Vec<EmotionCategory>,
    /// One row per category, aligned with `frames`.
    pub matrix: Vec<Vec<f64>>,
}

/// Radar chart data: mean intensity per category over a window.
#[derive(Debug, Clone, Serialize)]
pub struct RadarData {
    pub title: String,
    pub face_id: Option<u32>,
    pub means: Vec<RadarAxis>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RadarAxis {
    pub category: EmotionCategory,
    pub color: &'static str,
    pub mean: f64,
}

/// Cluster scatter data from a finished projection.
#[derive(Debug, Clone, Serialize)]
pub struct ClusterData {
    pub title: String,
    pub face_id: Option<u32>,
    pub method: Method,
    pub points: Vec<ClusterPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub substitution: Option<ParamSubstitution>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClusterPoint {
    pub x: f64,
    pub y: f64,
    pub label: EmotionCategory,
    pub color: &'static str,
    pub frame: u64,
}

/// Categories with data somewhere in the given rows, canonical order.
fn available(rows: &[&FaceObservation]) -> Vec<EmotionCategory> {
    EmotionCategory::ALL
        .iter()
        .copied()
        .filter(|c| rows.iter().any(|r| r.emotion_scores.get(*c).is_some()))
        .collect()
}

/// Forward-fill then back-fill one category's values along the row sequence.
fn filled_values(rows: &[&FaceObservation], category: EmotionCategory) -> Vec<f64> {
    let raw: Vec<Option<f64>> = rows.iter().map(|r| r.emotion_scores.get(category)).collect();

    let mut values = vec![0.0; raw.len()];
    let mut last = None;
    for (i, v) in raw.iter().enumerate() {
        if v.is_some() {
            last = *v;
        }
        if let Some(value) = last {
            values[i] = value;
        }
    }
    // Back-fill the leading gap, if any.
    if let Some(first_idx) = raw.iter().position(|v| v.is_some()) {
        let first = raw[first_idx].unwrap_or(0.0);
        for value in values.iter_mut().take(first_idx) {
            *value = first;
        }
    }
    values
}

/// Build trend-line data, capping point count positionally for long videos.
pub fn trend(rows: &[&FaceObservation], fps: f64, face_id: Option<u32>) -> Option<TrendSeries> {
    let categories = available(rows);
    if categories.is_empty() {
        return None;
    }

    let stride = if rows.len() > MAX_TREND_POINTS {
        rows.len() / MAX_TREND_POINTS
    } else {
        1
    };
    let kept: Vec<&FaceObservation> = rows.iter().copied().step_by(stride.max(1)).collect();

    let frames: Vec<u64> = kept.iter().map(|r| r.frame_index).collect();
    let seconds: Vec<f64> = kept.iter().map(|r| r.second(fps)).collect();
    let series = categories
        .iter()
        .map(|&category| EmotionSeries {
            category,
            color: category.chart_color(),
            values: filled_values(&kept, category),
        })
        .collect();

    Some(TrendSeries {
        title: titled("Emotion intensity over time", face_id),
        face_id,
        frames,
        seconds,
        series,
    })
}

/// Build dominant-emotion frequency counts (consumed by pie and bar views).
pub fn dominant_share(rows: &[&FaceObservation], face_id: Option<u32>) -> Option<DominantShare> {
    if available(rows).is_empty() {
        return None;
    }

    let mut counts: Vec<DominantCount> = Vec::new();
    let mut total = 0usize;
    for row in rows {
        let Some(dominant) = row.dominant_emotion() else {
            continue;
        };
        total += 1;
        match counts.iter_mut().find(|c| c.category == dominant) {
            Some(entry) => entry.count += 1,
            None => counts.push(DominantCount {
                category: dominant,
                color: dominant.chart_color(),
                count: 1,
            }),
        }
    }
    if total == 0 {
        return None;
    }
    counts.sort_by(|a, b| b.count.cmp(&a.count));

    Some(DominantShare {
        title: titled("Dominant emotion share", face_id),
        face_id,
        counts,
        total_rows: total,
    })
}

/// Build the category x frame intensity matrix.
pub fn heatmap(rows: &[&FaceObservation], fps: f64, face_id: Option<u32>) -> Option<HeatmapData> {
    let categories = available(rows);
    if categories.is_empty() {
        return None;
    }

    let frames: Vec<u64> = rows.iter().map(|r| r.frame_index).collect();
    let seconds: Vec<f64> = rows.iter().map(|r| r.second(fps)).collect();
    let matrix = categories
        .iter()
        .map(|&category| filled_values(rows, category))
        .collect();

    Some(HeatmapData {
        title: titled("Emotion intensity heatmap", face_id),
        face_id,
        frames,
        seconds,
        categories,
        matrix,
    })
}

/// Build mean-intensity-per-category radar data.
pub fn radar(rows: &[&FaceObservation], face_id: Option<u32>) -> Option<RadarData> {
    let categories = available(rows);
    if categories.is_empty() {
        return None;
    }

    let means = categories
        .iter()
        .map(|&category| {
            let (sum, count) = rows
                .iter()
                .filter_map(|r| r.emotion_scores.get(category))
                .fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
            RadarAxis {
                category,
                color: category.chart_color(),
                mean: if count > 0 { sum / count as f64 } else { 0.0 },
            }
        })
        .collect();

    Some(RadarData {
        title: titled("Mean emotion intensity", face_id),
        face_id,
        means,
    })
}

/// Assemble cluster scatter data from a finished projection.
///
/// `rows` must be the exact subset the projection ran on: one point per row,
/// same order.
pub fn cluster(
    rows: &[&FaceObservation],
    result: &ProjectionResult,
    face_id: Option<u32>,
) -> ClusterData {
    debug_assert_eq!(rows.len(), result.points.len());
    let points = rows
        .iter()
        .zip(result.points.iter().zip(result.labels.iter()))
        .map(|(row, (point, &label))| ClusterPoint {
            x: point[0],
            y: point[1],
            label,
            color: label.chart_color(),
            frame: row.frame_index,
        })
        .collect();

    ClusterData {
        title: titled("Emotion cluster distribution", face_id),
        face_id,
        method: result.method,
        points,
        substitution: result.substitution,
    }
}

fn titled(base: &str, face_id: Option<u32>) -> String {
    match face_id {
        Some(id) => format!("{} - Face {}", base, id),
        None => base.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use emoscope_models::EmotionScores;

    fn obs(frame: u64, pairs: &[(EmotionCategory, f64)]) -> FaceObservation {
        let scores: EmotionScores = pairs.iter().copied().collect();
        FaceObservation::new(frame, 1, scores)
    }

    fn refs(rows: &[FaceObservation]) -> Vec<&FaceObservation> {
        rows.iter().collect()
    }

    #[test]
    fn test_trend_fills_gaps_forward_then_backward() {
        let rows = vec![
            obs(10, &[(EmotionCategory::Fear, 0.3)]),
            obs(20, &[(EmotionCategory::Happiness, 0.9)]),
            obs(30, &[(EmotionCategory::Fear, 0.5)]),
        ];
        let trend = trend(&refs(&rows), 30.0, None).unwrap();
        let fear = trend
            .series
            .iter()
            .find(|s| s.category == EmotionCategory::Fear)
            .unwrap();
        // Middle gap forward-filled from frame 10.
        assert_eq!(fear.values, vec![0.3, 0.3, 0.5]);
        let happiness = trend
            .series
            .iter()
            .find(|s| s.category == EmotionCategory::Happiness)
            .unwrap();
        // Leading gap back-filled from frame 20.
        assert_eq!(happiness.values, vec![0.9, 0.9, 0.9]);
    }

    #[test]
    fn test_trend_seconds_axis() {
        let rows = vec![obs(30, &[(EmotionCategory::Neutral, 0.5)])];
        let trend = trend(&refs(&rows), 30.0, None).unwrap();
        assert_eq!(trend.seconds, vec![1.0]);
    }

    #[test]
    fn test_trend_caps_point_count() {
        let rows: Vec<FaceObservation> = (0..4100)
            .map(|i| obs(i, &[(EmotionCategory::Neutral, 0.5)]))
            .collect();
        let trend = trend(&refs(&rows), 30.0, None).unwrap();
        assert!(trend.frames.len() <= MAX_TREND_POINTS + 100);
        assert!(trend.frames.len() < 4100);
    }

    #[test]
    fn test_dominant_share_counts_sorted_descending() {
        let rows = vec![
            obs(10, &[(EmotionCategory::Happiness, 0.9)]),
            obs(20, &[(EmotionCategory::Happiness, 0.8)]),
            obs(30, &[(EmotionCategory::Sadness, 0.7)]),
        ];
        let share = dominant_share(&refs(&rows), Some(2)).unwrap();
        assert_eq!(share.counts[0].category, EmotionCategory::Happiness);
        assert_eq!(share.counts[0].count, 2);
        assert_eq!(share.counts[1].count, 1);
        assert_eq!(share.total_rows, 3);
        assert!(share.title.contains("Face 2"));
    }

    #[test]
    fn test_heatmap_matrix_shape() {
        let rows = vec![
            obs(10, &[(EmotionCategory::Anger, 0.2), (EmotionCategory::Neutral, 0.6)]),
            obs(20, &[(EmotionCategory::Anger, 0.4)]),
        ];
        let heatmap = heatmap(&refs(&rows), 30.0, None).unwrap();
        assert_eq!(heatmap.categories.len(), 2);
        assert_eq!(heatmap.matrix.len(), 2);
        assert!(heatmap.matrix.iter().all(|row| row.len() == 2));
    }

    #[test]
    fn test_radar_means_ignore_absent_values() {
        let rows = vec![
            obs(10, &[(EmotionCategory::Fear, 0.4)]),
            obs(20, &[]),
            obs(30, &[(EmotionCategory::Fear, 0.8)]),
        ];
        let radar = radar(&refs(&rows), None).unwrap();
        let fear = radar
            .means
            .iter()
            .find(|a| a.category == EmotionCategory::Fear)
            .unwrap();
        // Mean over reported values only, absent is not zero.
        assert!((fear.mean - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_builders_return_none_without_emotion_data() {
        let rows = vec![FaceObservation::new(10, 1, EmotionScores::new())];
        let row_refs = refs(&rows);
        assert!(trend(&row_refs, 30.0, None).is_none());
        assert!(dominant_share(&row_refs, None).is_none());
        assert!(heatmap(&row_refs, 30.0, None).is_none());
        assert!(radar(&row_refs, None).is_none());
    }
}
