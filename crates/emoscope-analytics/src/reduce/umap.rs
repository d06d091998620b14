//! Neighbor-graph embedding in the UMAP family.
//!
//! Builds a fuzzy k-NN graph with smooth per-point bandwidths, then lays it
//! out by stochastic gradient descent with negative sampling. Curve
//! constants correspond to the reference implementation's defaults for
//! `min_dist = 0.1`.

use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{pairwise_sq_dists, Reducer};

const N_EPOCHS: usize = 200;
const NEGATIVE_SAMPLES: usize = 5;
const INITIAL_LEARNING_RATE: f64 = 1.0;
const CURVE_A: f64 = 1.577;
const CURVE_B: f64 = 0.895;
const REPULSION_EPS: f64 = 0.001;
const CLIP: f64 = 4.0;

/// Fuzzy neighbor-graph layout.
pub(crate) struct UmapReducer {
    n_neighbors: usize,
    seed: u64,
}

impl UmapReducer {
    pub(crate) fn new(n_neighbors: usize, seed: u64) -> Self {
        Self { n_neighbors, seed }
    }

    /// k nearest neighbors of each row by squared distance, self excluded.
    fn knn(dists: &Array2<f64>, k: usize) -> Vec<Vec<(usize, f64)>> {
        let n = dists.nrows();
        (0..n)
            .map(|i| {
                let mut order: Vec<(usize, f64)> = (0..n)
                    .filter(|&j| j != i)
                    .map(|j| (j, dists[[i, j]].sqrt()))
                    .collect();
                order.sort_by(|a, b| a.1.total_cmp(&b.1));
                order.truncate(k);
                order
            })
            .collect()
    }

    /// Smooth-kNN bandwidth: find sigma so the neighbor weights sum to
    /// log2(k).
    fn bandwidth(neighbors: &[(usize, f64)], rho: f64) -> f64 {
        let target = (neighbors.len().max(2) as f64).log2();
        let mut lo = 1e-6;
        let mut hi = 1e3;
        let mut sigma = 1.0;
        for _ in 0..40 {
            sigma = (lo + hi) / 2.0;
            let sum: f64 = neighbors
                .iter()
                .map(|&(_, d)| (-((d - rho).max(0.0)) / sigma).exp())
                .sum();
            if (sum - target).abs() < 1e-5 {
                break;
            }
            if sum > target {
                hi = sigma;
            } else {
                lo = sigma;
            }
        }
        sigma
    }

    /// Symmetric fuzzy graph edges (i < j, weight > 0).
    fn fuzzy_edges(&self, data: &Array2<f64>) -> Vec<(usize, usize, f64)> {
        let n = data.nrows();
        let dists = pairwise_sq_dists(data);
        let knn = Self::knn(&dists, self.n_neighbors.min(n - 1));

        let mut directed = Array2::<f64>::zeros((n, n));
        for (i, neighbors) in knn.iter().enumerate() {
            let rho = neighbors.first().map(|&(_, d)| d).unwrap_or(0.0);
            let sigma = Self::bandwidth(neighbors, rho);
            for &(j, d) in neighbors {
                directed[[i, j]] = (-((d - rho).max(0.0)) / sigma).exp();
            }
        }

        // Probabilistic t-conorm symmetrization.
        let mut edges = Vec::new();
        for i in 0..n {
            for j in (i + 1)..n {
                let a = directed[[i, j]];
                let b = directed[[j, i]];
                let weight = a + b - a * b;
                if weight > 0.0 {
                    edges.push((i, j, weight));
                }
            }
        }
        edges
    }
}

impl Reducer for UmapReducer {
    fn embed(&self, data: &Array2<f64>) -> Vec<[f64; 2]> {
        let n = data.nrows();
        let edges = self.fuzzy_edges(data);

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut y = vec![[0.0f64; 2]; n];
        for point in y.iter_mut() {
            point[0] = rng.random_range(-10.0..10.0);
            point[1] = rng.random_range(-10.0..10.0);
        }

        let clip = |v: f64| v.clamp(-CLIP, CLIP);

        for epoch in 0..N_EPOCHS {
            let alpha = INITIAL_LEARNING_RATE * (1.0 - epoch as f64 / N_EPOCHS as f64);

            for &(i, j, weight) in &edges {
                let dx = y[i][0] - y[j][0];
                let dy = y[i][1] - y[j][1];
                let d2 = dx * dx + dy * dy;

                // Attraction along the edge, scaled by membership strength.
                let attr = if d2 > 0.0 {
                    (-2.0 * CURVE_A * CURVE_B * d2.powf(CURVE_B - 1.0))
                        / (1.0 + CURVE_A * d2.powf(CURVE_B))
                } else {
                    0.0
                };
                let gx = clip(attr * dx) * weight;
                let gy = clip(attr * dy) * weight;
                y[i][0] += alpha * gx;
                y[i][1] += alpha * gy;
                y[j][0] -= alpha * gx;
                y[j][1] -= alpha * gy;

                // Repulsion from sampled non-neighbors.
                for _ in 0..NEGATIVE_SAMPLES {
                    let k = rng.random_range(0..n);
                    if k == i || k == j {
                        continue;
                    }
                    let dx = y[i][0] - y[k][0];
                    let dy = y[i][1] - y[k][1];
                    let d2 = dx * dx + dy * dy;
                    let rep = (2.0 * CURVE_B)
                        / ((REPULSION_EPS + d2) * (1.0 + CURVE_A * d2.powf(CURVE_B)));
                    y[i][0] += alpha * clip(rep * dx);
                    y[i][1] += alpha * clip(rep * dy);
                }
            }
        }

        y
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn two_blobs(n: usize) -> Array2<f64> {
        let mut data = Array2::<f64>::zeros((n, 3));
        for i in 0..n {
            let offset = if i % 2 == 0 { 0.0 } else { 10.0 };
            data[[i, 0]] = offset + (i % 3) as f64 * 0.05;
            data[[i, 1]] = offset + (i % 4) as f64 * 0.05;
            data[[i, 2]] = (i % 2) as f64;
        }
        data
    }

    #[test]
    fn test_embed_preserves_row_count_and_is_finite() {
        let data = two_blobs(16);
        let points = UmapReducer::new(5, 42).embed(&data);
        assert_eq!(points.len(), 16);
        assert!(points.iter().all(|p| p[0].is_finite() && p[1].is_finite()));
    }

    #[test]
    fn test_embed_is_deterministic_for_a_seed() {
        let data = two_blobs(12);
        let a = UmapReducer::new(4, 42).embed(&data);
        let b = UmapReducer::new(4, 42).embed(&data);
        assert_eq!(a, b);
    }

    #[test]
    fn test_neighbor_count_is_capped_by_sample_count() {
        // 6 points, k clamped internally to n - 1; must not panic.
        let data = two_blobs(6);
        let points = UmapReducer::new(15, 42).embed(&data);
        assert_eq!(points.len(), 6);
    }
}
