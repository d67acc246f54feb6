//! Plot-ready curves from posterior draws.
//!
//! Two kinds of curve are produced from the same samples:
//! - [`DensityCurve`]: Gaussian kernel density estimate on a fixed grid, scaled
//!   so the peak is exactly 1.0 (the shape is what matters for plotting).
//! - [`HistogramCurve`]: equal-width bins over [0, 1], scaled as a true
//!   density so that `sum(y) * bin_width == 1`.

use crate::error::{AbTestError, Result};
use crate::stats::{linspace, normalize_by_max};
use itertools::{Itertools, MinMaxResult};
use log::{debug, warn};
use serde::Serialize;
use statrs::statistics::Statistics;
use std::f64::consts::PI;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DensityCurve {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramCurve {
    /// Bin centers
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl HistogramCurve {
    pub fn bin_width(&self) -> f64 {
        if self.x.is_empty() {
            0.0
        } else {
            1.0 / self.x.len() as f64
        }
    }

    /// Area under the histogram; 1.0 for any histogram with in-range samples.
    pub fn area(&self) -> f64 {
        self.y.iter().sum::<f64>() * self.bin_width()
    }
}

/// Scott's rule bandwidth, `sigma * n^(-1/5)` with the sample standard deviation.
pub fn scott_bandwidth(samples: &[f64]) -> f64 {
    let n = samples.len() as f64;
    samples.std_dev() * n.powf(-0.2)
}

/// Gaussian KDE of `samples` evaluated on `grid_points` evenly spaced points
/// spanning `[lower, upper]`, normalized so the peak is 1.0.
///
/// Fewer than two samples is an error. A sample with zero spread has no usable
/// bandwidth; it becomes a single spike at the grid point closest to the value.
pub fn kde_curve(samples: &[f64], lower: f64, upper: f64, grid_points: usize) -> Result<DensityCurve> {
    if samples.len() < 2 {
        return Err(AbTestError::InsufficientSamples(format!(
            "kernel density estimation needs at least 2 samples, got {}",
            samples.len()
        )));
    }
    if !(lower.is_finite() && upper.is_finite() && lower < upper) {
        return Err(AbTestError::DegenerateDistribution(format!(
            "invalid density support [{}, {}]",
            lower, upper
        )));
    }
    let x = linspace(lower, upper, grid_points);

    let bandwidth = scott_bandwidth(samples);
    if !bandwidth.is_finite() || bandwidth == 0.0 {
        warn!("Samples have no spread, falling back to a single spike density");
        let y = spike(&x, samples[0]);
        return Ok(DensityCurve { x, y });
    }
    debug!(
        "KDE over [{:.4}, {:.4}] with {} samples, bandwidth {:.6}",
        lower,
        upper,
        samples.len(),
        bandwidth
    );

    let inv_bandwidth = 1.0 / bandwidth;
    let norm = inv_bandwidth / (samples.len() as f64 * (2.0 * PI).sqrt());
    let mut y: Vec<f64> = x
        .iter()
        .map(|&point| {
            samples
                .iter()
                .map(|&s| {
                    let z = (point - s) * inv_bandwidth;
                    (-0.5 * z * z).exp()
                })
                .sum::<f64>()
                * norm
        })
        .collect();
    normalize_by_max(&mut y);
    Ok(DensityCurve { x, y })
}

fn spike(x: &[f64], value: f64) -> Vec<f64> {
    let mut y = vec![0.0; x.len()];
    let nearest = x
        .iter()
        .enumerate()
        .min_by(|(_, l), (_, r)| (*l - value).abs().total_cmp(&(*r - value).abs()))
        .map(|(i, _)| i);
    if let Some(i) = nearest {
        y[i] = 1.0;
    }
    y
}

/// KDE of one arm's conversion-rate draws on [0, 1].
pub fn arm_density(samples: &[f64], grid_points: usize) -> Result<DensityCurve> {
    kde_curve(samples, 0.0, 1.0, grid_points)
}

/// Pairwise differences `b_i - a_i`.
pub fn difference_samples(a_samples: &[f64], b_samples: &[f64]) -> Result<Vec<f64>> {
    if a_samples.len() != b_samples.len() {
        return Err(AbTestError::InsufficientSamples(format!(
            "difference needs paired samples, got {} and {}",
            a_samples.len(),
            b_samples.len()
        )));
    }
    Ok(b_samples.iter().zip(a_samples.iter()).map(|(b, a)| b - a).collect())
}

/// KDE of `B - A` over the observed range of the differences. A zero-width
/// range is widened by `padding` on both sides.
pub fn difference_density(
    a_samples: &[f64],
    b_samples: &[f64],
    grid_points: usize,
    padding: f64,
) -> Result<DensityCurve> {
    let diff = difference_samples(a_samples, b_samples)?;
    let (lower, upper) = match diff.iter().cloned().minmax_by(|l, r| l.total_cmp(r)) {
        MinMaxResult::NoElements => {
            return Err(AbTestError::InsufficientSamples(
                "difference distribution has no samples".to_string(),
            ));
        }
        MinMaxResult::OneElement(v) => (v, v),
        MinMaxResult::MinMax(min, max) => (min, max),
    };
    let (lower, upper) = if lower == upper {
        debug!("Difference has zero width at {}, widening by {}", lower, padding);
        (lower - padding, upper + padding)
    } else {
        (lower, upper)
    };
    kde_curve(&diff, lower, upper, grid_points)
}

/// Density-normalized histogram of `samples` over [0, 1].
///
/// The last bin includes its right edge. Samples outside [0, 1] are dropped
/// before normalizing.
pub fn histogram(samples: &[f64], bins: usize) -> Result<HistogramCurve> {
    if bins == 0 {
        return Err(AbTestError::InvalidConfig("histogram needs at least one bin".to_string()));
    }
    let width = 1.0 / bins as f64;
    let x: Vec<f64> = (0..bins).map(|i| (i as f64 + 0.5) * width).collect();

    let mut counts = vec![0usize; bins];
    for &s in samples.iter().filter(|s| (0.0..=1.0).contains(*s)) {
        let idx = ((s * bins as f64) as usize).min(bins - 1);
        counts[idx] += 1;
    }
    let total: usize = counts.iter().sum();
    if total == 0 {
        return Err(AbTestError::InsufficientSamples(
            "histogram has no samples inside [0, 1]".to_string(),
        ));
    }
    let scale = 1.0 / (total as f64 * width);
    let y = counts.iter().map(|&c| c as f64 * scale).collect();
    Ok(HistogramCurve { x, y })
}
