//! # lloyd
//!
//! Iterative-relocation (k-means) clustering of fixed-dimension points, built
//! around one [`engine`] and the collaborators at its boundary: a random
//! [`source`] that feeds it points and an [`observe`] seam through which
//! presenters watch it converge.
//!
//! ```rust
//! use lloyd::{Lloyd, NormalSource};
//!
//! let points = NormalSource::new(100).with_seed(7).sample()?;
//! let fit = Lloyd::new(3).with_seed(7).fit(&points)?;
//!
//! assert_eq!(fit.state().labels().len(), 100);
//! # Ok::<(), lloyd::Error>(())
//! ```

pub mod engine;
/// Error types used across `lloyd`.
pub mod error;
pub mod metrics;
pub mod observe;
pub mod source;

pub use engine::{Clustering, ClusteringState, ConvergencePolicy, EmptyClusterPolicy, Fit, Lloyd};
pub use error::{Error, Result};
pub use metrics::{cluster_rss, displacement, rss};
pub use observe::{IterationObserver, IterationSnapshot, MetricHistory};
pub use source::NormalSource;
