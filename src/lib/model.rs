use crate::observation::{ArmObservation, PriorSpec};
use serde::Serialize;
use statrs::function::gamma::ln_gamma;

/// Beta posterior of a Binomial conversion rate.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct BetaPosterior {
    pub alpha: f64,
    pub beta: f64,
}

impl BetaPosterior {
    /// Uniform Beta(1, 1) before any observation
    pub fn new() -> Self {
        Self::from_prior(&PriorSpec::default())
    }

    pub fn from_prior(prior: &PriorSpec) -> Self {
        Self {
            alpha: prior.alpha,
            beta: prior.beta,
        }
    }

    /// Conjugate update of `prior` with the arm's successes and failures.
    pub fn from_observation(prior: &PriorSpec, observation: &ArmObservation) -> Self {
        let mut posterior = Self::from_prior(prior);
        posterior.update(observation.successes(), observation.failures());
        posterior
    }

    /// Update parameters with `successes` and `failures`
    pub fn update(&mut self, successes: u64, failures: u64) {
        self.alpha += successes as f64;
        self.beta += failures as f64;
    }

    pub fn mean(&self) -> f64 {
        self.alpha / (self.alpha + self.beta)
    }

    pub fn variance(&self) -> f64 {
        let numerator = self.alpha * self.beta;
        let denominator = (self.alpha + self.beta).powi(2) * (self.alpha + self.beta + 1.0);
        numerator / denominator
    }

    pub fn standard_deviation(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn log_beta(&self) -> f64 {
        ln_gamma(self.alpha) + ln_gamma(self.beta) - ln_gamma(self.alpha + self.beta)
    }

    pub fn log_pdf(&self, x: f64) -> f64 {
        if !(0.0..=1.0).contains(&x) {
            return f64::NEG_INFINITY;
        }
        let left = if self.alpha == 1.0 { 0.0 } else { (self.alpha - 1.0) * x.ln() };
        let right = if self.beta == 1.0 { 0.0 } else { (self.beta - 1.0) * (1.0 - x).ln() };
        left + right - self.log_beta()
    }

    pub fn pdf(&self, x: f64) -> f64 {
        self.log_pdf(x).exp()
    }
}

impl Default for BetaPosterior {
    fn default() -> Self {
        Self::new()
    }
}
