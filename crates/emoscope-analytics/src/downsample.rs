//! Row-count reduction for dense plots and clustering input.
//!
//! Two deliberately distinct sampling bases, kept as separate code paths:
//!
//! - an explicit stride keeps rows by `frame_index % stride == 0` — a
//!   frame-index-anchored sieve, reproducible across reruns even if row
//!   order changes;
//! - the adaptive rule keeps every interval-th row BY POSITION — under
//!   non-uniform detection gaps this yields a different visual density than
//!   the sieve, and downstream clustering depends on that difference.

use emoscope_models::FaceObservation;
use tracing::debug;

/// Below this row count the adaptive rule keeps everything.
pub const T_LOW: usize = 450;

/// Target row count the adaptive rule reduces toward.
pub const T_HIGH: usize = 540;

/// Reduce a candidate subset.
///
/// With an explicit stride, applies the frame-index sieve; otherwise the
/// adaptive positional rule. Output is never empty unless the input was.
pub fn downsample<'a>(
    rows: &[&'a FaceObservation],
    stride: Option<u64>,
) -> Vec<&'a FaceObservation> {
    match stride {
        Some(stride) => stride_sieve(rows, stride),
        None => adaptive(rows),
    }
}

/// Keep rows whose frame index is divisible by the stride.
pub fn stride_sieve<'a>(rows: &[&'a FaceObservation], stride: u64) -> Vec<&'a FaceObservation> {
    let stride = stride.max(1);
    rows.iter()
        .copied()
        .filter(|r| r.frame_index % stride == 0)
        .collect()
}

/// Position-anchored adaptive reduction.
pub fn adaptive<'a>(rows: &[&'a FaceObservation]) -> Vec<&'a FaceObservation> {
    let n = rows.len();
    if n <= T_LOW {
        return rows.to_vec();
    }
    let interval = (n / T_HIGH).max(1);
    debug!(rows = n, interval, "adaptive down-sampling");
    rows.iter().copied().step_by(interval).collect()
}
