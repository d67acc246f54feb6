use crate::error::{AbTestError, Result};
use crate::observation::ArmObservation;
use crate::stats::round_to;
use log::debug;
use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal};

/// Outcome of the pooled two-proportion z-test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ZTestResult {
    pub p1: f64,
    pub p2: f64,
    pub z: f64,
    /// Two-sided p-value, rounded to 6 decimals
    pub p_value: f64,
    pub significant: bool,
}

/// Two-sided pooled z-test of `b` against `a`.
///
/// A zero pooled standard error (both arms at 0% or both at 100%) gives
/// `z = 0`, i.e. no detectable effect.
pub fn two_proportion_z_test(
    a: &ArmObservation,
    b: &ArmObservation,
    significance_level: f64,
) -> Result<ZTestResult> {
    let p1 = a.rate();
    let p2 = b.rate();
    let n1 = a.trials() as f64;
    let n2 = b.trials() as f64;
    let p_pool = (a.successes() + b.successes()) as f64 / (n1 + n2);
    let se = (p_pool * (1.0 - p_pool) * (1.0 / n1 + 1.0 / n2)).max(0.0).sqrt();
    let z = if se == 0.0 { 0.0 } else { (p2 - p1) / se };

    let standard_normal = Normal::new(0.0, 1.0)
        .map_err(|e| AbTestError::DegenerateDistribution(format!("standard normal: {}", e)))?;
    let raw_p = (2.0 * standard_normal.sf(z.abs())).clamp(0.0, 1.0);
    let p_value = round_to(raw_p, 6);
    debug!(
        "z-test: p1 = {:.6}, p2 = {:.6}, pooled = {:.6}, se = {:.6}, z = {:.4}, p = {:.6}",
        p1, p2, p_pool, se, z, p_value
    );

    Ok(ZTestResult {
        p1,
        p2,
        z,
        p_value,
        significant: p_value < significance_level,
    })
}
