use crate::error::{AbTestError, Result};
use crate::stats::{round_share, round_to};
use serde::Serialize;

/// Decision metrics derived from paired posterior draws.
///
/// Expected loss is absolute regret: the loss of shipping A is
/// `mean(max(b_i - a_i, 0))`, and symmetrically for B. Both arms use the same
/// convention, so the two losses are directly comparable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DecisionMetrics {
    pub prob_b_better: f64,
    pub prob_a_better: f64,
    pub a_mean: f64,
    pub b_mean: f64,
    pub a_expected_loss: f64,
    pub b_expected_loss: f64,
}

/// Compute all metrics in one pass over the pairs. Probabilities are rounded
/// to 4 decimals from the integer win counts, so `prob_a_better +
/// prob_b_better <= 1` holds after rounding. Means and losses are rounded to 6.
pub fn decision_metrics(a_samples: &[f64], b_samples: &[f64]) -> Result<DecisionMetrics> {
    if a_samples.is_empty() || b_samples.is_empty() {
        return Err(AbTestError::InsufficientSamples(format!(
            "decision metrics need samples for both arms (got {} and {})",
            a_samples.len(),
            b_samples.len()
        )));
    }
    if a_samples.len() != b_samples.len() {
        return Err(AbTestError::InsufficientSamples(format!(
            "sample sets must be paired, got {} and {} draws",
            a_samples.len(),
            b_samples.len()
        )));
    }

    let mut b_wins = 0usize;
    let mut a_wins = 0usize;
    let mut a_sum = 0.0;
    let mut b_sum = 0.0;
    let mut a_regret = 0.0;
    let mut b_regret = 0.0;
    for (&a, &b) in a_samples.iter().zip(b_samples.iter()) {
        if b > a {
            b_wins += 1;
            a_regret += b - a;
        } else if a > b {
            a_wins += 1;
            b_regret += a - b;
        }
        a_sum += a;
        b_sum += b;
    }

    let n = a_samples.len() as f64;
    Ok(DecisionMetrics {
        prob_b_better: round_share(b_wins, a_samples.len(), 4),
        prob_a_better: round_share(a_wins, a_samples.len(), 4),
        a_mean: round_to(a_sum / n, 6),
        b_mean: round_to(b_sum / n, 6),
        a_expected_loss: round_to(a_regret / n, 6),
        b_expected_loss: round_to(b_regret / n, 6),
    })
}
