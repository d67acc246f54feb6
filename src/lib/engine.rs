use crate::config::EngineConfig;
use crate::density::{arm_density, difference_density, histogram};
use crate::error::Result;
use crate::frequentist::two_proportion_z_test;
use crate::metrics::decision_metrics;
use crate::model::BetaPosterior;
use crate::observation::{AbTestInput, Arm};
use crate::sampler::{PosteriorSampler, SeededSampler};
use log::{debug, info};
use serde::Serialize;
use std::time::Instant;

/// Everything one A/B comparison produces. Field names are the wire names.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InferenceResult {
    pub freq_p_value: f64,
    pub freq_significant: bool,
    pub bayes_prob_b_better: f64,
    pub a_distribution: Vec<f64>,
    pub b_distribution: Vec<f64>,
    pub x_values: Vec<f64>,
    pub a_mean: f64,
    pub b_mean: f64,
    pub a_prob_best: f64,
    pub b_prob_best: f64,
    pub a_expected_loss: f64,
    pub b_expected_loss: f64,
    pub diff_x: Vec<f64>,
    pub diff_distribution: Vec<f64>,
    pub a_hist: Vec<f64>,
    pub b_hist: Vec<f64>,
    pub x_hist: Vec<f64>,
}

/// Stateless A/B test engine. Holds nothing but its configuration, so one
/// instance can be shared between threads or rebuilt per request.
#[derive(Debug, Clone, Default)]
pub struct AbTestEngine {
    config: EngineConfig,
}

impl AbTestEngine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run the comparison with a sampler seeded from the configuration.
    pub fn calculate(&self, input: &AbTestInput) -> Result<InferenceResult> {
        let mut sampler = SeededSampler::new(self.config.seed);
        self.calculate_with_sampler(input, &mut sampler)
    }

    /// Run the comparison drawing from `sampler`. Arm A is drawn before arm B.
    pub fn calculate_with_sampler<S: PosteriorSampler>(
        &self,
        input: &AbTestInput,
        sampler: &mut S,
    ) -> Result<InferenceResult> {
        let timer = Instant::now();
        let (a, b) = input.validate()?;
        let a_prior = input.prior(Arm::A, self.config.prior)?;
        let b_prior = input.prior(Arm::B, self.config.prior)?;
        debug!(
            "Validated input: A = {}/{}, B = {}/{}",
            a.successes(),
            a.trials(),
            b.successes(),
            b.trials()
        );

        let z_test = two_proportion_z_test(&a, &b, self.config.significance_level)?;

        let a_posterior = BetaPosterior::from_observation(&a_prior, &a);
        let b_posterior = BetaPosterior::from_observation(&b_prior, &b);
        debug!(
            "Posteriors: A ~ Beta({}, {}), B ~ Beta({}, {})",
            a_posterior.alpha, a_posterior.beta, b_posterior.alpha, b_posterior.beta
        );

        let a_samples = sampler.draw(&a_posterior, self.config.metric_samples)?;
        let b_samples = sampler.draw(&b_posterior, self.config.metric_samples)?;
        let metrics = decision_metrics(&a_samples, &b_samples)?;

        let plot_n = self.config.plot_samples.min(a_samples.len());
        let (a_plot, b_plot) = (&a_samples[..plot_n], &b_samples[..plot_n]);
        let a_curve = arm_density(a_plot, self.config.grid_points)?;
        let b_curve = arm_density(b_plot, self.config.grid_points)?;
        let diff_curve = difference_density(
            a_plot,
            b_plot,
            self.config.grid_points,
            self.config.diff_padding,
        )?;
        let a_hist = histogram(a_plot, self.config.hist_bins)?;
        let b_hist = histogram(b_plot, self.config.hist_bins)?;

        info!(
            "A/B test done in {:?}: p = {}, P(B > A) = {}, loss A = {}, loss B = {}",
            timer.elapsed(),
            z_test.p_value,
            metrics.prob_b_better,
            metrics.a_expected_loss,
            metrics.b_expected_loss
        );

        Ok(InferenceResult {
            freq_p_value: z_test.p_value,
            freq_significant: z_test.significant,
            bayes_prob_b_better: metrics.prob_b_better,
            a_distribution: a_curve.y,
            b_distribution: b_curve.y,
            x_values: a_curve.x,
            a_mean: metrics.a_mean,
            b_mean: metrics.b_mean,
            a_prob_best: metrics.prob_a_better,
            b_prob_best: metrics.prob_b_better,
            a_expected_loss: metrics.a_expected_loss,
            b_expected_loss: metrics.b_expected_loss,
            diff_x: diff_curve.x,
            diff_distribution: diff_curve.y,
            a_hist: a_hist.y,
            b_hist: b_hist.y,
            x_hist: a_hist.x,
        })
    }
}

/// Convenience wrapper around [`AbTestEngine::calculate`] with default settings.
pub fn calculate(
    a_successes: i64,
    a_trials: i64,
    b_successes: i64,
    b_trials: i64,
) -> Result<InferenceResult> {
    AbTestEngine::default().calculate(&AbTestInput::new(a_successes, a_trials, b_successes, b_trials))
}
