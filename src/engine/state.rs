//! Clustering state: centroids plus the current assignment.

use ndarray::Array2;

/// One snapshot of the clustering: the ordered centroid list (index-stable
/// across iterations) and the label of the nearest centroid for every input
/// point.
///
/// Storing one label per point makes the partition invariant structural:
/// every point belongs to exactly one cluster, and the union of all clusters
/// is the input set. A fresh state is built each iteration; nothing is
/// updated incrementally.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusteringState {
    centroids: Array2<f32>,
    labels: Vec<usize>,
}

impl ClusteringState {
    pub(crate) fn new(centroids: Array2<f32>, labels: Vec<usize>) -> Self {
        debug_assert!(labels.iter().all(|&l| l < centroids.nrows()));
        Self { centroids, labels }
    }

    /// Number of clusters.
    pub fn k(&self) -> usize {
        self.centroids.nrows()
    }

    /// Point dimension.
    pub fn dimension(&self) -> usize {
        self.centroids.ncols()
    }

    /// Centroid matrix, one row per cluster.
    pub fn centroids(&self) -> &Array2<f32> {
        &self.centroids
    }

    /// Cluster label per input point, in input order.
    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    /// Consume the state, keeping only the labels.
    pub fn into_labels(self) -> Vec<usize> {
        self.labels
    }

    /// Member point indices for one cluster.
    pub fn cluster(&self, index: usize) -> Vec<usize> {
        self.labels
            .iter()
            .enumerate()
            .filter(|(_, &l)| l == index)
            .map(|(i, _)| i)
            .collect()
    }

    /// Member point indices grouped by cluster, `k` groups in centroid order.
    ///
    /// Presenter convenience: a scatter-plot collaborator wants each
    /// cluster's points together rather than a flat label vector.
    pub fn clusters(&self) -> Vec<Vec<usize>> {
        let mut groups = vec![Vec::new(); self.k()];
        for (i, &l) in self.labels.iter().enumerate() {
            groups[l].push(i);
        }
        groups
    }

    /// Number of points assigned to one cluster.
    pub fn cluster_len(&self, index: usize) -> usize {
        self.labels.iter().filter(|&&l| l == index).count()
    }
}
