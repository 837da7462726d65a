//! The Lloyd engine: initialization, assignment, update, orchestration.

use super::policy::{ConvergencePolicy, EmptyClusterPolicy};
use super::state::ClusteringState;
use super::traits::Clustering;
use crate::error::{Error, Result};
use crate::metrics;
use crate::observe::{Discard, IterationObserver, IterationSnapshot};
use ndarray::Array2;
use rand::prelude::*;
use rand_distr::StandardNormal;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// K-means clustering engine (Lloyd's algorithm).
///
/// Owns no state between runs; all configuration is builder-style and every
/// run starts from freshly sampled centroids.
#[derive(Debug, Clone)]
pub struct Lloyd {
    /// Number of clusters.
    k: usize,
    /// Point dimension.
    dimension: usize,
    /// Maximum iterations before giving up unconverged.
    max_iter: usize,
    /// Convergence tolerance. `0.0` is the legacy exact-equality test.
    tol: f64,
    /// Random seed.
    seed: Option<u64>,
    /// Stopping rule.
    convergence: ConvergencePolicy,
    /// Repair applied when a cluster receives no points.
    empty_cluster: EmptyClusterPolicy,
}

/// Outcome of a clustering run.
///
/// Carried back to the caller whether or not the run converged: hitting the
/// iteration cap is a non-fatal condition and the best state found is still
/// usable.
#[derive(Debug, Clone)]
pub struct Fit {
    state: ClusteringState,
    iterations: usize,
    converged: bool,
    history: Vec<f64>,
}

impl Fit {
    /// Final clustering state.
    pub fn state(&self) -> &ClusteringState {
        &self.state
    }

    /// Consume the fit, keeping the final state.
    pub fn into_state(self) -> ClusteringState {
        self.state
    }

    /// Number of iterations performed.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Whether the convergence test was satisfied before the iteration cap.
    pub fn converged(&self) -> bool {
        self.converged
    }

    /// Convergence metric value per iteration, in order.
    pub fn history(&self) -> &[f64] {
        &self.history
    }
}

impl Lloyd {
    /// Create a new engine for `k` clusters over 2-dimensional points.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            dimension: 2,
            max_iter: 100,
            tol: 0.0,
            seed: None,
            convergence: ConvergencePolicy::default(),
            empty_cluster: EmptyClusterPolicy::default(),
        }
    }

    /// Set the point dimension.
    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = dimension;
        self
    }

    /// Set maximum iterations.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set convergence tolerance. The default `0.0` reproduces the legacy
    /// exact-equality stopping semantics; a nonzero value trades fidelity for
    /// guaranteed progress under floating-point noise.
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    /// Set random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the convergence policy.
    pub fn with_convergence(mut self, policy: ConvergencePolicy) -> Self {
        self.convergence = policy;
        self
    }

    /// Set the empty-cluster repair policy.
    pub fn with_empty_cluster(mut self, policy: EmptyClusterPolicy) -> Self {
        self.empty_cluster = policy;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.k == 0 {
            return Err(Error::InvalidParameter {
                name: "k",
                message: "must be > 0",
            });
        }
        if self.dimension == 0 {
            return Err(Error::InvalidParameter {
                name: "dimension",
                message: "must be > 0",
            });
        }
        Ok(())
    }

    /// Validate a point set and pack it into a matrix, one row per point.
    pub fn to_matrix(&self, data: &[Vec<f32>]) -> Result<Array2<f32>> {
        if data.is_empty() {
            return Err(Error::EmptyInput);
        }

        let n = data.len();
        let mut flat: Vec<f32> = Vec::with_capacity(n * self.dimension);
        for point in data {
            if point.len() != self.dimension {
                return Err(Error::DimensionMismatch {
                    expected: self.dimension,
                    found: point.len(),
                });
            }
            flat.extend(point);
        }

        Array2::from_shape_vec((n, self.dimension), flat).map_err(|e| Error::Other(e.to_string()))
    }

    fn make_rng(&self) -> Box<dyn RngCore> {
        match self.seed {
            Some(s) => Box::new(StdRng::seed_from_u64(s)),
            None => Box::new(rand::rng()),
        }
    }

    /// Sample `k` centroids from the standard normal distribution and perform
    /// the initial assignment.
    ///
    /// Colliding centroids are accepted as sampled, not re-drawn.
    pub fn initialize(
        &self,
        points: &Array2<f32>,
        rng: &mut dyn RngCore,
    ) -> Result<ClusteringState> {
        self.validate()?;
        if points.nrows() == 0 {
            return Err(Error::EmptyInput);
        }
        if points.ncols() != self.dimension {
            return Err(Error::DimensionMismatch {
                expected: self.dimension,
                found: points.ncols(),
            });
        }

        let centroids =
            Array2::from_shape_fn((self.k, self.dimension), |_| rng.sample::<f32, _>(StandardNormal));
        let labels = self.assign(points, &centroids);

        Ok(ClusteringState::new(centroids, labels))
    }

    /// Assign every point to its nearest centroid.
    ///
    /// Linear scan over centroids, replacing the best only on strict `<` of
    /// squared distance, so an exact tie keeps the lowest centroid index.
    fn assign(&self, points: &Array2<f32>, centroids: &Array2<f32>) -> Vec<usize> {
        let k = centroids.nrows();
        let mut labels = vec![0usize; points.nrows()];

        // Assignment step - parallel when feature enabled
        #[cfg(feature = "parallel")]
        labels.par_iter_mut().enumerate().for_each(|(i, label)| {
            let point = points.row(i);
            let mut best_cluster = 0;
            let mut best_dist = f32::MAX;

            for c in 0..k {
                let dist = metrics::squared_distance(&point, &centroids.row(c));
                if dist < best_dist {
                    best_dist = dist;
                    best_cluster = c;
                }
            }
            *label = best_cluster;
        });

        #[cfg(not(feature = "parallel"))]
        for (i, label) in labels.iter_mut().enumerate() {
            let point = points.row(i);
            let mut best_cluster = 0;
            let mut best_dist = f32::MAX;

            for c in 0..k {
                let dist = metrics::squared_distance(&point, &centroids.row(c));
                if dist < best_dist {
                    best_dist = dist;
                    best_cluster = c;
                }
            }
            *label = best_cluster;
        }

        labels
    }

    /// Recompute each centroid as the coordinate-wise mean of its members,
    /// applying the empty-cluster policy where a cluster has none.
    fn update_centroids(
        &self,
        points: &Array2<f32>,
        state: &ClusteringState,
        rng: &mut dyn RngCore,
    ) -> Array2<f32> {
        let k = state.k();
        let d = state.dimension();
        let mut new_centroids = Array2::zeros((k, d));
        let mut counts = vec![0usize; k];

        for (i, &label) in state.labels().iter().enumerate() {
            for j in 0..d {
                new_centroids[[label, j]] += points[[i, j]];
            }
            counts[label] += 1;
        }

        for c in 0..k {
            if counts[c] > 0 {
                for j in 0..d {
                    new_centroids[[c, j]] /= counts[c] as f32;
                }
            } else {
                match self.empty_cluster {
                    EmptyClusterPolicy::KeepPrevious => {
                        new_centroids.row_mut(c).assign(&state.centroids().row(c));
                    }
                    EmptyClusterPolicy::Reseed => {
                        for j in 0..d {
                            new_centroids[[c, j]] = rng.sample::<f32, _>(StandardNormal);
                        }
                    }
                }
            }
        }

        new_centroids
    }

    /// Perform one update+reassignment cycle.
    ///
    /// Returns the next state and the convergence metric value for this step:
    /// total centroid displacement, or the new state's normalized RSS,
    /// depending on the configured policy.
    pub fn step(
        &self,
        state: &ClusteringState,
        points: &Array2<f32>,
        rng: &mut dyn RngCore,
    ) -> Result<(ClusteringState, f64)> {
        if points.ncols() != state.dimension() {
            return Err(Error::DimensionMismatch {
                expected: state.dimension(),
                found: points.ncols(),
            });
        }
        if points.nrows() != state.labels().len() {
            return Err(Error::DimensionMismatch {
                expected: state.labels().len(),
                found: points.nrows(),
            });
        }

        let new_centroids = self.update_centroids(points, state, rng);
        let moved = metrics::displacement(state.centroids(), &new_centroids);

        let labels = self.assign(points, &new_centroids);
        let next = ClusteringState::new(new_centroids, labels);

        let metric = match self.convergence {
            ConvergencePolicy::Displacement => moved,
            ConvergencePolicy::Rss => metrics::rss(points, &next),
        };

        Ok((next, metric))
    }

    fn is_converged(&self, metric: f64, previous: Option<f64>) -> bool {
        match self.convergence {
            ConvergencePolicy::Displacement => metric <= self.tol,
            ConvergencePolicy::Rss => previous.is_some_and(|p| (p - metric).abs() <= self.tol),
        }
    }

    /// Run to convergence or the iteration cap, notifying `observer` after
    /// every completed iteration.
    pub fn fit_observed(
        &self,
        data: &[Vec<f32>],
        observer: &mut dyn IterationObserver,
    ) -> Result<Fit> {
        self.validate()?;
        let points = self.to_matrix(data)?;
        let mut rng = self.make_rng();

        let mut state = self.initialize(&points, rng.as_mut())?;
        let mut history = Vec::new();
        let mut previous = None;
        let mut converged = false;
        let mut iterations = 0;

        for iteration in 1..=self.max_iter {
            let (next, metric) = self.step(&state, &points, rng.as_mut())?;
            converged = self.is_converged(metric, previous);
            history.push(metric);
            state = next;
            iterations = iteration;

            observer.on_iteration(&IterationSnapshot {
                iteration,
                state: &state,
                metric,
                converged,
            });

            if converged {
                break;
            }
            previous = Some(metric);
        }

        Ok(Fit {
            state,
            iterations,
            converged,
            history,
        })
    }

    /// Run to convergence or the iteration cap.
    pub fn fit(&self, data: &[Vec<f32>]) -> Result<Fit> {
        self.fit_observed(data, &mut Discard)
    }
}

impl Clustering for Lloyd {
    fn fit_predict(&self, data: &[Vec<f32>]) -> Result<Vec<usize>> {
        Ok(self.fit(data)?.into_state().into_labels())
    }

    fn n_clusters(&self) -> usize {
        self.k
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr2;

    fn square_points() -> Vec<Vec<f32>> {
        vec![
            vec![0.0, 0.0],
            vec![2.0, 0.0],
            vec![0.0, 2.0],
            vec![2.0, 2.0],
        ]
    }

    #[test]
    fn test_all_points_assigned_exactly_once() {
        // Property: labels partition the input — one label per point, all in range.
        let data: Vec<Vec<f32>> = (0..60)
            .map(|i| vec![i as f32 * 0.1, (i % 7) as f32])
            .collect();

        let fit = Lloyd::new(4).with_seed(11).fit(&data).unwrap();
        let labels = fit.state().labels();

        assert_eq!(labels.len(), data.len());
        assert!(labels.iter().all(|&l| l < 4));

        let mut members: Vec<usize> = fit
            .state()
            .clusters()
            .into_iter()
            .flatten()
            .collect();
        members.sort_unstable();
        assert_eq!(members, (0..data.len()).collect::<Vec<_>>());
    }

    #[test]
    fn test_single_cluster_converges_at_the_mean() {
        // k=1: the first update moves the centroid to the point-set mean; the
        // next update recomputes the same mean from the same members, so
        // displacement is exactly zero and the run stops.
        let fit = Lloyd::new(1).with_seed(42).fit(&square_points()).unwrap();

        assert!(fit.converged());
        assert!(fit.iterations() <= 2);
        assert_eq!(fit.state().centroids()[[0, 0]], 1.0);
        assert_eq!(fit.state().centroids()[[0, 1]], 1.0);
    }

    #[test]
    fn test_tie_breaks_to_lowest_index() {
        let engine = Lloyd::new(2);
        let centroids = arr2(&[[0.0, 0.0], [10.0, 0.0]]);
        let points = arr2(&[[5.0, 0.0]]);

        assert_eq!(engine.assign(&points, &centroids), vec![0]);
    }

    #[test]
    fn test_assignment_is_idempotent() {
        let engine = Lloyd::new(3);
        let points = arr2(&[[0.0, 0.0], [1.0, 5.0], [9.0, 9.0], [4.0, 4.0]]);
        let centroids = arr2(&[[0.0, 0.0], [5.0, 5.0], [9.0, 9.0]]);

        let first = engine.assign(&points, &centroids);
        let second = engine.assign(&points, &centroids);
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_cluster_keeps_previous_centroid() {
        // All points labeled into cluster 0; cluster 1 is empty.
        let engine = Lloyd::new(2).with_seed(1);
        let points = arr2(&[[0.1, 0.0], [0.0, 0.1], [0.2, 0.1]]);
        let state = ClusteringState::new(arr2(&[[0.0, 0.0], [100.0, 100.0]]), vec![0, 0, 0]);

        let mut rng = engine.make_rng();
        let (next, metric) = engine.step(&state, &points, rng.as_mut()).unwrap();

        assert_eq!(next.centroids()[[1, 0]], 100.0);
        assert_eq!(next.centroids()[[1, 1]], 100.0);
        assert!(next.centroids().iter().all(|v| v.is_finite()));
        assert!(metric.is_finite());
    }

    #[test]
    fn test_empty_cluster_reseeds_centroid() {
        let engine = Lloyd::new(2)
            .with_seed(1)
            .with_empty_cluster(EmptyClusterPolicy::Reseed);
        let points = arr2(&[[0.1, 0.0], [0.0, 0.1], [0.2, 0.1]]);
        let state = ClusteringState::new(arr2(&[[0.0, 0.0], [100.0, 100.0]]), vec![0, 0, 0]);

        let mut rng = engine.make_rng();
        let (next, _) = engine.step(&state, &points, rng.as_mut()).unwrap();

        // Re-sampled from N(0,1): well-defined and nowhere near (100,100).
        assert!(next.centroids().iter().all(|v| v.is_finite()));
        assert!(next.centroids()[[1, 0]] < 50.0);
        assert!(next.centroids()[[1, 1]] < 50.0);
    }

    #[test]
    fn test_rss_history_is_non_increasing() {
        let data: Vec<Vec<f32>> = (0..80)
            .map(|i| vec![(i % 9) as f32, (i % 13) as f32 * 0.5])
            .collect();

        let fit = Lloyd::new(3)
            .with_seed(5)
            .with_convergence(ConvergencePolicy::Rss)
            .fit(&data)
            .unwrap();

        for pair in fit.history().windows(2) {
            assert!(
                pair[1] <= pair[0] + 1e-6,
                "RSS increased: {} -> {}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_iteration_cap_yields_unconverged_fit() {
        let data: Vec<Vec<f32>> = (0..40)
            .map(|i| vec![(i % 8) as f32, (i / 8) as f32])
            .collect();

        let fit = Lloyd::new(3).with_seed(9).with_max_iter(1).fit(&data).unwrap();

        // Non-fatal: the best state found comes back with the flag unset.
        assert!(!fit.converged());
        assert_eq!(fit.iterations(), 1);
        assert_eq!(fit.history().len(), 1);
        assert_eq!(fit.state().labels().len(), data.len());
    }

    #[test]
    fn test_deterministic_with_seed() {
        let data: Vec<Vec<f32>> = (0..50)
            .map(|i| vec![(i % 10) as f32, (i % 3) as f32])
            .collect();

        let a = Lloyd::new(3).with_seed(42).fit(&data).unwrap();
        let b = Lloyd::new(3).with_seed(42).fit(&data).unwrap();

        assert_eq!(a.state().labels(), b.state().labels());
        assert_eq!(a.history(), b.history());
        assert_eq!(a.iterations(), b.iterations());
    }

    #[test]
    fn test_k_larger_than_point_count_is_allowed() {
        // Centroids are sampled from N(0,1), not drawn from the data, so
        // k > n just leaves some clusters empty.
        let fit = Lloyd::new(5)
            .with_seed(3)
            .fit(&[vec![0.0, 0.0], vec![1.0, 1.0], vec![2.0, 2.0]])
            .unwrap();

        assert_eq!(fit.state().labels().len(), 3);
        assert!(fit.state().centroids().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_zero_k_rejected() {
        let result = Lloyd::new(0).fit(&square_points());
        assert_eq!(
            result.unwrap_err(),
            Error::InvalidParameter {
                name: "k",
                message: "must be > 0",
            }
        );
    }

    #[test]
    fn test_zero_dimension_rejected() {
        let result = Lloyd::new(2).with_dimension(0).fit(&square_points());
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidParameter { name: "dimension", .. }
        ));
    }

    #[test]
    fn test_empty_input_rejected() {
        let result = Lloyd::new(2).fit(&[]);
        assert_eq!(result.unwrap_err(), Error::EmptyInput);
    }

    #[test]
    fn test_ragged_input_rejected() {
        let result = Lloyd::new(2).fit(&[vec![0.0, 0.0], vec![1.0, 1.0, 1.0]]);
        assert_eq!(
            result.unwrap_err(),
            Error::DimensionMismatch {
                expected: 2,
                found: 3,
            }
        );
    }

    #[test]
    fn test_observer_sees_every_iteration() {
        use crate::observe::MetricHistory;

        let data: Vec<Vec<f32>> = (0..30)
            .map(|i| vec![(i % 6) as f32, (i % 5) as f32])
            .collect();

        let engine = Lloyd::new(2).with_seed(8);
        let mut recorder = MetricHistory::new();
        let fit = engine.fit_observed(&data, &mut recorder).unwrap();

        assert_eq!(recorder.values(), fit.history());
        assert_eq!(recorder.values().len(), fit.iterations());
    }

    #[test]
    fn test_fit_predict_matches_fit_labels() {
        let data: Vec<Vec<f32>> = (0..20).map(|i| vec![i as f32, 0.0]).collect();

        let engine = Lloyd::new(2).with_seed(17);
        let labels = engine.fit_predict(&data).unwrap();
        let fit = engine.fit(&data).unwrap();

        assert_eq!(labels, fit.state().labels());
        assert_eq!(engine.n_clusters(), 2);
    }

    #[test]
    fn test_step_rejects_mismatched_points() {
        let engine = Lloyd::new(2);
        let state = ClusteringState::new(arr2(&[[0.0, 0.0], [1.0, 1.0]]), vec![0, 1]);
        let mut rng = engine.make_rng();

        let wrong_dim = arr2(&[[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]]);
        assert!(engine.step(&state, &wrong_dim, rng.as_mut()).is_err());

        let wrong_count = arr2(&[[0.0, 0.0]]);
        assert!(engine.step(&state, &wrong_count, rng.as_mut()).is_err());
    }
}
