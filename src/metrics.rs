//! Clustering-quality metrics.
//!
//! Two scalars summarize an iteration of the engine:
//!
//! | Metric | Range | Converged when |
//! |--------|-------|----------------|
//! | [`displacement`] | `[0, ∞)` | total reaches 0 (no centroid moved) |
//! | [`rss`] | `[0, ∞)` | unchanged from the previous iteration |
//!
//! Both accumulate in `f64` even though point data is `f32`, so long sums do
//! not lose the low-order bits that the exact-equality convergence policies
//! compare on.

use crate::engine::ClusteringState;
use ndarray::{Array2, ArrayView1};

/// Squared Euclidean distance between two vectors.
pub(crate) fn squared_distance(a: &ArrayView1<'_, f32>, b: &ArrayView1<'_, f32>) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y).powi(2)).sum()
}

/// Total distance the centroids moved between two snapshots.
///
/// Sum over clusters of the Euclidean distance from each previous centroid to
/// its successor. Zero exactly when no centroid moved at all, which is the
/// displacement policy's stopping condition.
pub fn displacement(previous: &Array2<f32>, current: &Array2<f32>) -> f64 {
    previous
        .rows()
        .into_iter()
        .zip(current.rows())
        .map(|(a, b)| f64::from(squared_distance(&a, &b)).sqrt())
        .sum()
}

/// Residual sum of squares for a single cluster, unnormalized.
///
/// Sum of squared Euclidean distances from each member point to the cluster's
/// centroid. An empty cluster contributes zero.
pub fn cluster_rss(points: &Array2<f32>, state: &ClusteringState, cluster: usize) -> f64 {
    let centroid = state.centroids().row(cluster);
    state
        .labels()
        .iter()
        .enumerate()
        .filter(|(_, &l)| l == cluster)
        .map(|(i, _)| f64::from(squared_distance(&points.row(i), &centroid)))
        .sum()
}

/// Total residual sum of squares, normalized by the point count.
///
/// Sum of [`cluster_rss`] over all clusters divided by the total number of
/// points. Non-increasing across Lloyd iterations; equality across an
/// iteration boundary is the RSS policy's stopping condition.
pub fn rss(points: &Array2<f32>, state: &ClusteringState) -> f64 {
    let total: f64 = state
        .labels()
        .iter()
        .enumerate()
        .map(|(i, &l)| f64::from(squared_distance(&points.row(i), &state.centroids().row(l))))
        .sum();
    total / points.nrows() as f64
}
