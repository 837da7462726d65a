//! Random point generation.
//!
//! The driver collaborator that feeds the engine: n points of dimension d
//! with every coordinate drawn independently from the standard normal
//! distribution. Kept outside the engine so any other point source can stand
//! in for it.

use crate::error::{Error, Result};
use rand::prelude::*;
use rand_distr::StandardNormal;

/// Standard-normal random point source.
#[derive(Debug, Clone)]
pub struct NormalSource {
    /// Number of points to generate.
    count: usize,
    /// Point dimension.
    dimension: usize,
    /// Random seed.
    seed: Option<u64>,
}

impl NormalSource {
    /// Create a source producing `count` points of dimension 2.
    pub fn new(count: usize) -> Self {
        Self {
            count,
            dimension: 2,
            seed: None,
        }
    }

    /// Set the point dimension.
    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = dimension;
        self
    }

    /// Set random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Generate the point set.
    pub fn sample(&self) -> Result<Vec<Vec<f32>>> {
        if self.count == 0 {
            return Err(Error::InvalidParameter {
                name: "count",
                message: "must be > 0",
            });
        }
        if self.dimension == 0 {
            return Err(Error::InvalidParameter {
                name: "dimension",
                message: "must be > 0",
            });
        }

        let mut rng: Box<dyn RngCore> = match self.seed {
            Some(s) => Box::new(StdRng::seed_from_u64(s)),
            None => Box::new(rand::rng()),
        };

        Ok((0..self.count)
            .map(|_| {
                (0..self.dimension)
                    .map(|_| rng.sample(StandardNormal))
                    .collect()
            })
            .collect())
    }
}
