//! Convergence and degenerate-cluster policies.
//!
//! The legacy scripts this engine replaces stopped on *exact* floating-point
//! equality of a scalar against the previous iteration's value — either total
//! centroid displacement hitting zero, or total RSS repeating. Both stopping
//! rules survive here as tagged policies behind one engine, with a
//! caller-configurable tolerance (`0.0` keeps the exact-equality semantics)
//! and a hard iteration cap so neither can loop forever.

/// How the engine decides that the clustering has stabilized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConvergencePolicy {
    /// Converge when the summed Euclidean distance the centroids moved this
    /// iteration drops to the tolerance (exactly zero by default). Zero total
    /// movement means cluster membership was identical across an iteration
    /// boundary, so the loop has reached a fixed point.
    #[default]
    Displacement,

    /// Converge when total RSS (sum over clusters of squared member-point
    /// distances to their centroid, divided by the point count) matches the
    /// previous iteration's value to within the tolerance.
    Rss,
}

/// What to do when a centroid ends an assignment round with no members.
///
/// The mean of zero points is undefined; a centroid must always remain a
/// well-defined point, so the engine never lets a NaN through. Which repair
/// to apply is the caller's choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyClusterPolicy {
    /// Leave the centroid at its previous position. Deterministic and
    /// consumes no RNG state, so seeded runs stay reproducible whether or not
    /// a cluster ever goes empty.
    #[default]
    KeepPrevious,

    /// Re-sample the centroid from the standard normal distribution, the same
    /// distribution initialization draws from.
    Reseed,
}
