//! 2-D projection of the emotion-score space for cluster views.
//!
//! The projector validates and derives algorithm parameters from the sample
//! size, then hands the matrix to a reducer. The embedding is display-only:
//! the result carries one coordinate per input row in input order plus each
//! row's dominant-emotion label for color coding, and nothing else.

use ndarray::Array2;
use serde::Serialize;
use tracing::{info, warn};

use emoscope_models::{EmotionCategory, FaceObservation};

use crate::reduce::{Reducer, TsneReducer, UmapReducer};

/// At or below this sample count neither algorithm produces a meaningful
/// embedding; the projection is skipped, not failed.
pub const DEGENERATE_MAX_SAMPLES: usize = 5;

/// Fixed random seed: repeated runs over identical input embed identically.
pub const FIXED_SEED: u64 = 42;

/// Resolved dimensionality-reduction method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    Tsne,
    Umap,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Tsne => "tsne",
            Method::Umap => "umap",
        }
    }

    /// Case-insensitive resolution. Absent or unrecognized requests default
    /// to UMAP when available, otherwise t-SNE; a UMAP request without an
    /// available implementation falls back to t-SNE.
    pub fn resolve(requested: Option<&str>, umap_available: bool) -> Method {
        let fallback = if umap_available { Method::Umap } else { Method::Tsne };
        match requested.map(|s| s.trim().to_lowercase()) {
            Some(s) if s == "tsne" || s == "t-sne" => Method::Tsne,
            Some(s) if s == "umap" => {
                if umap_available {
                    Method::Umap
                } else {
                    warn!("UMAP requested but not available, falling back to t-SNE");
                    Method::Tsne
                }
            }
            Some(other) => {
                warn!(requested = %other, "unrecognized projection method, using default");
                fallback
            }
            None => fallback,
        }
    }
}

/// Caller-supplied projection options; every field may be absent.
#[derive(Debug, Clone)]
pub struct ProjectorOptions {
    /// Requested method name, matched case-insensitively.
    pub method: Option<String>,
    /// t-SNE perplexity.
    pub perplexity: Option<f64>,
    /// UMAP neighbor count.
    pub n_neighbors: Option<usize>,
    /// Whether a UMAP implementation is available.
    pub umap_available: bool,
}

impl Default for ProjectorOptions {
    fn default() -> Self {
        Self {
            method: None,
            perplexity: None,
            n_neighbors: None,
            umap_available: true,
        }
    }
}

/// A reported parameter substitution.
///
/// Both algorithms require their size parameter to be strictly less than the
/// sample count; an out-of-range supplied value is silently replaced with
/// the derived one and the substitution is reported, never raised.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ParamSubstitution {
    pub parameter: &'static str,
    pub supplied: f64,
    pub effective: f64,
}

/// Projection outcome.
#[derive(Debug, Clone)]
pub enum Projection {
    Embedded(ProjectionResult),
    /// Too few samples; the reducer was never invoked.
    Degenerate { n_samples: usize },
    /// The subset holds no emotion data at all.
    NoEmotionData,
}

/// A finished embedding.
#[derive(Debug, Clone)]
pub struct ProjectionResult {
    pub method: Method,
    /// One 2-D point per input row, input order preserved.
    pub points: Vec<[f64; 2]>,
    /// Dominant-emotion label per row, for downstream color coding.
    pub labels: Vec<EmotionCategory>,
    pub substitution: Option<ParamSubstitution>,
}

/// Derived perplexity: `clamp(n / 3, 5, 30)`.
pub fn derive_perplexity(n_samples: usize) -> f64 {
    (n_samples / 3).clamp(5, 30) as f64
}

/// Derived neighbor count: `clamp(n - 1, 2, 15)`.
pub fn derive_n_neighbors(n_samples: usize) -> usize {
    n_samples.saturating_sub(1).clamp(2, 15)
}

/// Project a subset's emotion-score matrix to 2-D.
///
/// Categories with no data anywhere in the subset are excluded from the
/// matrix entirely, not zero-filled; a per-row missing value inside an
/// included category becomes 0.0 as a matrix encoding only.
pub fn project(rows: &[&FaceObservation], opts: &ProjectorOptions) -> Projection {
    let categories: Vec<EmotionCategory> = EmotionCategory::ALL
        .iter()
        .copied()
        .filter(|c| rows.iter().any(|r| r.emotion_scores.get(*c).is_some()))
        .collect();

    if categories.is_empty() {
        warn!("subset contains no emotion data, skipping projection");
        return Projection::NoEmotionData;
    }

    let n_samples = rows.len();
    if n_samples <= DEGENERATE_MAX_SAMPLES {
        warn!(n_samples, "sample count too small, skipping projection");
        return Projection::Degenerate { n_samples };
    }

    let mut matrix = Array2::<f64>::zeros((n_samples, categories.len()));
    for (i, row) in rows.iter().enumerate() {
        for (j, category) in categories.iter().enumerate() {
            if let Some(value) = row.emotion_scores.get(*category) {
                matrix[[i, j]] = value;
            }
        }
    }

    let labels: Vec<EmotionCategory> = rows
        .iter()
        .map(|r| r.dominant_emotion().unwrap_or(categories[0]))
        .collect();

    let method = Method::resolve(opts.method.as_deref(), opts.umap_available);
    let mut substitution = None;

    let points = match method {
        Method::Tsne => {
            let perplexity = match opts.perplexity {
                None => {
                    let derived = derive_perplexity(n_samples);
                    info!(perplexity = derived, "derived t-SNE perplexity");
                    derived
                }
                Some(p) if p >= n_samples as f64 => {
                    let effective = derive_perplexity(n_samples);
                    warn!(
                        supplied = p,
                        effective, n_samples, "perplexity >= sample count, substituting"
                    );
                    substitution = Some(ParamSubstitution {
                        parameter: "perplexity",
                        supplied: p,
                        effective,
                    });
                    effective
                }
                Some(p) => p,
            };
            TsneReducer::new(perplexity, FIXED_SEED).embed(&matrix)
        }
        Method::Umap => {
            let n_neighbors = match opts.n_neighbors {
                None => {
                    let derived = derive_n_neighbors(n_samples);
                    info!(n_neighbors = derived, "derived UMAP n_neighbors");
                    derived
                }
                Some(k) if k >= n_samples => {
                    let effective = derive_n_neighbors(n_samples);
                    warn!(
                        supplied = k,
                        effective, n_samples, "n_neighbors >= sample count, substituting"
                    );
                    substitution = Some(ParamSubstitution {
                        parameter: "n_neighbors",
                        supplied: k as f64,
                        effective: effective as f64,
                    });
                    effective
                }
                Some(k) => k,
            };
            UmapReducer::new(n_neighbors, FIXED_SEED).embed(&matrix)
        }
    };

    Projection::Embedded(ProjectionResult {
        method,
        points,
        labels,
        substitution,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use emoscope_models::EmotionScores;

    fn obs(frame: u64, pairs: &[(EmotionCategory, f64)]) -> FaceObservation {
        let scores: EmotionScores = pairs.iter().copied().collect();
        FaceObservation::new(frame, 1, scores)
    }

    /// Two loose clusters in emotion space.
    fn cluster_rows(n: usize) -> Vec<FaceObservation> {
        (0..n)
            .map(|i| {
                let wobble = (i % 5) as f64 * 0.01;
                if i % 2 == 0 {
                    obs(
                        i as u64,
                        &[
                            (EmotionCategory::Happiness, 0.8 + wobble),
                            (EmotionCategory::Neutral, 0.1),
                        ],
                    )
                } else {
                    obs(
                        i as u64,
                        &[
                            (EmotionCategory::Sadness, 0.7 + wobble),
                            (EmotionCategory::Fear, 0.2),
                        ],
                    )
                }
            })
            .collect()
    }

    fn refs(rows: &[FaceObservation]) -> Vec<&FaceObservation> {
        rows.iter().collect()
    }

    #[test]
    fn test_method_resolution() {
        assert_eq!(Method::resolve(Some("TSNE"), true), Method::Tsne);
        assert_eq!(Method::resolve(Some("t-sne"), true), Method::Tsne);
        assert_eq!(Method::resolve(Some("umap"), true), Method::Umap);
        assert_eq!(Method::resolve(Some("umap"), false), Method::Tsne);
        assert_eq!(Method::resolve(Some("pca"), true), Method::Umap);
        assert_eq!(Method::resolve(None, true), Method::Umap);
        assert_eq!(Method::resolve(None, false), Method::Tsne);
    }

    #[test]
    fn test_parameter_derivation_clamps() {
        assert_eq!(derive_perplexity(6), 5.0);
        assert_eq!(derive_perplexity(60), 20.0);
        assert_eq!(derive_perplexity(600), 30.0);
        assert_eq!(derive_n_neighbors(3), 2);
        assert_eq!(derive_n_neighbors(10), 9);
        assert_eq!(derive_n_neighbors(100), 15);
    }

    #[test]
    fn test_four_samples_are_degenerate_without_invoking_reducer() {
        let rows = cluster_rows(4);
        let opts = ProjectorOptions {
            method: Some("tsne".into()),
            ..Default::default()
        };
        match project(&refs(&rows), &opts) {
            Projection::Degenerate { n_samples } => assert_eq!(n_samples, 4),
            other => panic!("expected degenerate, got {:?}", other),
        }
    }

    #[test]
    fn test_output_row_count_equals_input() {
        let rows = cluster_rows(24);
        let opts = ProjectorOptions::default();
        match project(&refs(&rows), &opts) {
            Projection::Embedded(result) => {
                assert_eq!(result.points.len(), 24);
                assert_eq!(result.labels.len(), 24);
            }
            other => panic!("expected embedding, got {:?}", other),
        }
    }

    #[test]
    fn test_out_of_range_perplexity_is_substituted() {
        let rows = cluster_rows(10);
        let opts = ProjectorOptions {
            method: Some("tsne".into()),
            perplexity: Some(50.0),
            ..Default::default()
        };
        match project(&refs(&rows), &opts) {
            Projection::Embedded(result) => {
                let sub = result.substitution.expect("substitution reported");
                assert_eq!(sub.parameter, "perplexity");
                assert_eq!(sub.supplied, 50.0);
                assert!(sub.effective < 10.0);
            }
            other => panic!("expected embedding, got {:?}", other),
        }
    }

    #[test]
    fn test_out_of_range_neighbors_is_substituted() {
        let rows = cluster_rows(10);
        let opts = ProjectorOptions {
            method: Some("umap".into()),
            n_neighbors: Some(10),
            ..Default::default()
        };
        match project(&refs(&rows), &opts) {
            Projection::Embedded(result) => {
                let sub = result.substitution.expect("substitution reported");
                assert_eq!(sub.parameter, "n_neighbors");
                assert!(sub.effective < 10.0);
            }
            other => panic!("expected embedding, got {:?}", other),
        }
    }

    #[test]
    fn test_fixed_seed_reproducibility() {
        let rows = cluster_rows(20);
        let opts = ProjectorOptions {
            method: Some("tsne".into()),
            ..Default::default()
        };
        let (a, b) = match (project(&refs(&rows), &opts), project(&refs(&rows), &opts)) {
            (Projection::Embedded(a), Projection::Embedded(b)) => (a, b),
            _ => panic!("expected embeddings"),
        };
        assert_eq!(a.points, b.points);
    }

    #[test]
    fn test_labels_are_per_row_dominants() {
        let rows = cluster_rows(12);
        let opts = ProjectorOptions::default();
        match project(&refs(&rows), &opts) {
            Projection::Embedded(result) => {
                assert_eq!(result.labels[0], EmotionCategory::Happiness);
                assert_eq!(result.labels[1], EmotionCategory::Sadness);
            }
            other => panic!("expected embedding, got {:?}", other),
        }
    }

    #[test]
    fn test_subset_without_emotion_data_is_skipped() {
        let rows = vec![FaceObservation::new(1, 1, EmotionScores::new()); 10];
        let row_refs: Vec<&FaceObservation> = rows.iter().collect();
        assert!(matches!(
            project(&row_refs, &ProjectorOptions::default()),
            Projection::NoEmotionData
        ));
    }
}
