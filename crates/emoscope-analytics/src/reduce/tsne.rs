//! Exact t-SNE on small matrices.

use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{pairwise_sq_dists, Reducer};

const N_ITER: usize = 500;
const EARLY_EXAGGERATION: f64 = 12.0;
const EXAGGERATION_ITERS: usize = 100;
const LEARNING_RATE: f64 = 200.0;
const MIN_PROB: f64 = 1e-12;

/// Exact (non-Barnes-Hut) t-SNE.
pub(crate) struct TsneReducer {
    perplexity: f64,
    seed: u64,
}

impl TsneReducer {
    pub(crate) fn new(perplexity: f64, seed: u64) -> Self {
        Self { perplexity, seed }
    }

    /// Conditional distribution row for point `i`, with the precision found
    /// by binary search so the row entropy matches log(perplexity).
    fn conditional_row(dists: &Array2<f64>, i: usize, perplexity: f64) -> Vec<f64> {
        let n = dists.nrows();
        let target_entropy = perplexity.ln();
        let mut beta = 1.0;
        let mut beta_min = f64::NEG_INFINITY;
        let mut beta_max = f64::INFINITY;
        let mut row = vec![0.0; n];

        for _ in 0..50 {
            let mut sum = 0.0;
            for j in 0..n {
                row[j] = if j == i {
                    0.0
                } else {
                    (-beta * dists[[i, j]]).exp()
                };
                sum += row[j];
            }
            if sum <= 0.0 {
                sum = f64::MIN_POSITIVE;
            }

            // H = ln(sum) + beta * <d>
            let mut weighted = 0.0;
            for j in 0..n {
                weighted += row[j] * dists[[i, j]];
            }
            let entropy = sum.ln() + beta * weighted / sum;

            let diff = entropy - target_entropy;
            if diff.abs() < 1e-5 {
                for value in row.iter_mut() {
                    *value /= sum;
                }
                return row;
            }
            if diff > 0.0 {
                beta_min = beta;
                beta = if beta_max.is_finite() {
                    (beta + beta_max) / 2.0
                } else {
                    beta * 2.0
                };
            } else {
                beta_max = beta;
                beta = if beta_min.is_finite() {
                    (beta + beta_min) / 2.0
                } else {
                    beta / 2.0
                };
            }
        }

        let sum: f64 = row.iter().sum::<f64>().max(f64::MIN_POSITIVE);
        for value in row.iter_mut() {
            *value /= sum;
        }
        row
    }

    /// Symmetrized joint probabilities.
    fn joint_probabilities(&self, data: &Array2<f64>) -> Array2<f64> {
        let n = data.nrows();
        let dists = pairwise_sq_dists(data);
        let mut p = Array2::<f64>::zeros((n, n));
        for i in 0..n {
            let row = Self::conditional_row(&dists, i, self.perplexity);
            for j in 0..n {
                p[[i, j]] = row[j];
            }
        }
        for i in 0..n {
            for j in (i + 1)..n {
                let joint = ((p[[i, j]] + p[[j, i]]) / (2.0 * n as f64)).max(MIN_PROB);
                p[[i, j]] = joint;
                p[[j, i]] = joint;
            }
            p[[i, i]] = 0.0;
        }
        p
    }
}

impl Reducer for TsneReducer {
    fn embed(&self, data: &Array2<f64>) -> Vec<[f64; 2]> {
        let n = data.nrows();
        let p = self.joint_probabilities(data);

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut y = vec![[0.0f64; 2]; n];
        for point in y.iter_mut() {
            point[0] = rng.random_range(-1e-4..1e-4);
            point[1] = rng.random_range(-1e-4..1e-4);
        }
        let mut velocity = vec![[0.0f64; 2]; n];

        for iter in 0..N_ITER {
            let exaggeration = if iter < EXAGGERATION_ITERS {
                EARLY_EXAGGERATION
            } else {
                1.0
            };
            let momentum = if iter < 250 { 0.5 } else { 0.8 };

            // Student-t kernel numerators and normalizer.
            let mut num = Array2::<f64>::zeros((n, n));
            let mut z = 0.0;
            for i in 0..n {
                for j in (i + 1)..n {
                    let dx = y[i][0] - y[j][0];
                    let dy = y[i][1] - y[j][1];
                    let value = 1.0 / (1.0 + dx * dx + dy * dy);
                    num[[i, j]] = value;
                    num[[j, i]] = value;
                    z += 2.0 * value;
                }
            }
            let z = z.max(MIN_PROB);

            for i in 0..n {
                let mut grad = [0.0f64; 2];
                for j in 0..n {
                    if i == j {
                        continue;
                    }
                    let q = (num[[i, j]] / z).max(MIN_PROB);
                    let coeff = 4.0 * (exaggeration * p[[i, j]] - q) * num[[i, j]];
                    grad[0] += coeff * (y[i][0] - y[j][0]);
                    grad[1] += coeff * (y[i][1] - y[j][1]);
                }
                velocity[i][0] = momentum * velocity[i][0] - LEARNING_RATE * grad[0];
                velocity[i][1] = momentum * velocity[i][1] - LEARNING_RATE * grad[1];
            }
            for i in 0..n {
                y[i][0] += velocity[i][0];
                y[i][1] += velocity[i][1];
            }
        }

        y
    }
}
