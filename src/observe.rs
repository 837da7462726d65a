//! Per-iteration observation.
//!
//! The engine's only side effect is telling an observer what each iteration
//! produced. Presenters (plotting, console reporting) implement
//! [`IterationObserver`] and stay entirely outside the core: the engine never
//! knows how — or whether — a snapshot is rendered.

use crate::engine::ClusteringState;

/// One completed engine iteration, borrowed for the duration of the callback.
#[derive(Debug)]
pub struct IterationSnapshot<'a> {
    /// Iteration number, starting at 1.
    pub iteration: usize,
    /// State after this iteration's centroid update and reassignment.
    pub state: &'a ClusteringState,
    /// Convergence metric value for this iteration (displacement or RSS,
    /// depending on the configured policy).
    pub metric: f64,
    /// Whether this iteration satisfied the convergence test.
    pub converged: bool,
}

/// Callback interface invoked once per iteration, including the converging
/// one, so a presenter sees every frame.
pub trait IterationObserver {
    /// Receive the snapshot for one completed iteration.
    fn on_iteration(&mut self, snapshot: &IterationSnapshot<'_>);
}

/// Observer that records the metric value of every iteration.
///
/// The recorded series is what a presenter graphs as convergence progress
/// (per-iteration RSS or displacement over time).
#[derive(Debug, Clone, Default)]
pub struct MetricHistory {
    values: Vec<f64>,
}

impl MetricHistory {
    /// Create an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded metric values, one per iteration in order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

impl IterationObserver for MetricHistory {
    fn on_iteration(&mut self, snapshot: &IterationSnapshot<'_>) {
        self.values.push(snapshot.metric);
    }
}

/// Observer that ignores every snapshot. Used by the unobserved fit path.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Discard;

impl IterationObserver for Discard {
    fn on_iteration(&mut self, _snapshot: &IterationSnapshot<'_>) {}
}
