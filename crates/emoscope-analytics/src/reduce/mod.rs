//! Dimensionality-reduction backends.
//!
//! Both reducers run on a dense `ndarray` matrix and a seeded RNG so that
//! identical input always embeds identically. They are display-quality
//! embeddings for small sample counts (the adaptive down-sampler caps
//! clustering input around [`T_HIGH`] rows), not general-purpose
//! implementations.
//!
//! [`T_HIGH`]: crate::downsample::T_HIGH

mod tsne;
mod umap;

use ndarray::Array2;

pub(crate) use tsne::TsneReducer;
pub(crate) use umap::UmapReducer;

/// A 2-D embedding backend.
pub(crate) trait Reducer {
    /// Embed an (n x d) matrix; returns one point per row, row order kept.
    fn embed(&self, data: &Array2<f64>) -> Vec<[f64; 2]>;
}

/// Pairwise squared euclidean distances of matrix rows.
pub(crate) fn pairwise_sq_dists(data: &Array2<f64>) -> Array2<f64> {
    let n = data.nrows();
    let mut dists = Array2::<f64>::zeros((n, n));
    for i in 0..n {
        for j in (i + 1)..n {
            let mut d = 0.0;
            for k in 0..data.ncols() {
                let diff = data[[i, k]] - data[[j, k]];
                d += diff * diff;
            }
            dists[[i, j]] = d;
            dists[[j, i]] = d;
        }
    }
    dists
}
