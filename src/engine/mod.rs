//! The clustering engine: Lloyd's alternating assign/update loop.
//!
//! # The Objective
//!
//! K-means minimizes within-cluster sum of squares:
//!
//! ```text
//! RSS = Σₖ Σᵢ∈Cₖ ||xᵢ - μₖ||²
//! ```
//!
//! # The Loop
//!
//! 1. **Initialize**: sample k centroids from N(0,1), assign every point to
//!    its nearest centroid
//! 2. **Update**: move each centroid to the mean of its assigned points
//! 3. **Assign**: rebuild the partition against the new centroids
//! 4. Repeat until the convergence metric stabilizes, or the iteration cap
//!    is reached
//!
//! **Why it converges**: both phases are non-increasing in RSS, and RSS is
//! bounded below by 0. With exact-equality stopping tests, floating-point
//! jitter could in principle keep the scalar from ever repeating, which is
//! why the cap exists — reaching it is reported on the [`Fit`], not raised
//! as an error.
//!
//! # State machine
//!
//! `Initialized → Assigning → Updating → Converged`. Membership is rebuilt
//! from scratch each iteration; no point carries cluster identity across
//! iterations. The observer is notified once per completed iteration with a
//! borrowed snapshot and has no influence on the loop.
//!
//! # Scale
//!
//! Assignment is a flat O(n·k·d) scan with no spatial index — the intended
//! scale is hundreds of points, where the scan is cheaper than building any
//! acceleration structure. The `parallel` feature distributes the scan over
//! points; phase order is unchanged, since the update only starts after the
//! assignment pass completes.

mod policy;
mod solver;
mod state;
mod traits;

pub use policy::{ConvergencePolicy, EmptyClusterPolicy};
pub use solver::{Fit, Lloyd};
pub use state::ClusteringState;
pub use traits::Clustering;
