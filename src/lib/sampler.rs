//! Monte Carlo draws from the arm posteriors.
//!
//! Every draw goes through a [`PosteriorSampler`], so callers decide where the
//! randomness comes from. [`SeededSampler`] is the production strategy: a
//! `StdRng` seeded from a fixed `u64`, which makes identical inputs give
//! bit-identical samples.

use crate::error::{AbTestError, Result};
use crate::model::BetaPosterior;
use log::debug;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Beta, Distribution};

/// Draws from one arm's posterior, in draw order.
pub type SampleSet = Vec<f64>;

pub trait PosteriorSampler {
    /// Draw `n` i.i.d. samples from `posterior`.
    fn draw(&mut self, posterior: &BetaPosterior, n: usize) -> Result<SampleSet>;
}

#[derive(Debug, Clone)]
pub struct SeededSampler {
    seed: u64,
    rng: StdRng,
}

impl SeededSampler {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl PosteriorSampler for SeededSampler {
    fn draw(&mut self, posterior: &BetaPosterior, n: usize) -> Result<SampleSet> {
        let dist = Beta::new(posterior.alpha, posterior.beta).map_err(|e| {
            AbTestError::DegenerateDistribution(format!(
                "Beta({}, {}) cannot be sampled: {}",
                posterior.alpha, posterior.beta, e
            ))
        })?;
        debug!(
            "Drawing {} samples from Beta({}, {}) (seed {})",
            n, posterior.alpha, posterior.beta, self.seed
        );
        Ok(dist.sample_iter(&mut self.rng).take(n).collect())
    }
}
