use crate::error::{AbTestError, Result};
use crate::observation::PriorSpec;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_METRIC_SAMPLES: usize = 100_000;
pub const DEFAULT_PLOT_SAMPLES: usize = 10_000;
pub const DEFAULT_GRID_POINTS: usize = 200;
pub const DEFAULT_HIST_BINS: usize = 300;
pub const DEFAULT_SIGNIFICANCE_LEVEL: f64 = 0.05;
pub const DEFAULT_DIFF_PADDING: f64 = 0.01;

pub const MIN_GRID_POINTS: usize = 100;
pub const MAX_GRID_POINTS: usize = 300;

/// Tunables for one engine. Every field has a default, so a JSON config file
/// only needs the keys it wants to change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Seed for the posterior sampler
    pub seed: u64,
    /// Draws per arm used for probability-best, means and expected loss
    pub metric_samples: usize,
    /// Draws per arm used for KDE and histogram curves
    pub plot_samples: usize,
    /// Evaluation points of each KDE curve
    pub grid_points: usize,
    /// Histogram bins over [0, 1]
    pub hist_bins: usize,
    pub significance_level: f64,
    /// Half-width added around a zero-width difference support
    pub diff_padding: f64,
    /// Prior used when a request does not supply one
    pub prior: PriorSpec,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            metric_samples: DEFAULT_METRIC_SAMPLES,
            plot_samples: DEFAULT_PLOT_SAMPLES,
            grid_points: DEFAULT_GRID_POINTS,
            hist_bins: DEFAULT_HIST_BINS,
            significance_level: DEFAULT_SIGNIFICANCE_LEVEL,
            diff_padding: DEFAULT_DIFF_PADDING,
            prior: PriorSpec::default(),
        }
    }
}

/// Settings given explicitly by a caller (usually command-line flags). Each
/// `Some` replaces the value loaded from defaults or a config file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub seed: Option<u64>,
    pub metric_samples: Option<usize>,
    pub plot_samples: Option<usize>,
    pub grid_points: Option<usize>,
    pub hist_bins: Option<usize>,
    pub prior_alpha: Option<f64>,
    pub prior_beta: Option<f64>,
}

impl EngineConfig {
    /// Defaults, then the optional JSON file, then `overrides`. The merged
    /// configuration is validated.
    pub fn load(path: Option<&Path>, overrides: &ConfigOverrides) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_json_file(path)?,
            None => Self::default(),
        };
        config.with_overrides(overrides)
    }

    pub fn with_overrides(mut self, overrides: &ConfigOverrides) -> Result<Self> {
        if let Some(seed) = overrides.seed {
            self.seed = seed;
        }
        if let Some(samples) = overrides.metric_samples {
            self.metric_samples = samples;
        }
        if let Some(samples) = overrides.plot_samples {
            self.plot_samples = samples;
        }
        if let Some(grid_points) = overrides.grid_points {
            self.grid_points = grid_points;
        }
        if let Some(bins) = overrides.hist_bins {
            self.hist_bins = bins;
        }
        if overrides.prior_alpha.is_some() || overrides.prior_beta.is_some() {
            self.prior = PriorSpec {
                alpha: overrides.prior_alpha.unwrap_or(self.prior.alpha),
                beta: overrides.prior_beta.unwrap_or(self.prior.beta),
            };
        }
        self.validate()?;
        Ok(self)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            AbTestError::InvalidConfig(format!("could not read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(text)
            .map_err(|e| AbTestError::InvalidConfig(format!("could not parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.plot_samples < 2 {
            return Err(AbTestError::InvalidConfig(format!(
                "plot_samples must be at least 2, got {}",
                self.plot_samples
            )));
        }
        if self.metric_samples < self.plot_samples {
            return Err(AbTestError::InvalidConfig(format!(
                "metric_samples ({}) must not be smaller than plot_samples ({})",
                self.metric_samples, self.plot_samples
            )));
        }
        if !(MIN_GRID_POINTS..=MAX_GRID_POINTS).contains(&self.grid_points) {
            return Err(AbTestError::InvalidConfig(format!(
                "grid_points must be within {}..={}, got {}",
                MIN_GRID_POINTS, MAX_GRID_POINTS, self.grid_points
            )));
        }
        if self.hist_bins == 0 {
            return Err(AbTestError::InvalidConfig("hist_bins must be positive".to_string()));
        }
        if !(self.significance_level > 0.0 && self.significance_level < 1.0) {
            return Err(AbTestError::InvalidConfig(format!(
                "significance_level must be in (0, 1), got {}",
                self.significance_level
            )));
        }
        if !(self.diff_padding.is_finite() && self.diff_padding > 0.0) {
            return Err(AbTestError::InvalidConfig(format!(
                "diff_padding must be positive, got {}",
                self.diff_padding
            )));
        }
        self.prior
            .validate()
            .map_err(|e| AbTestError::InvalidConfig(format!("default prior: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.metric_samples, 100_000);
        assert_eq!(config.plot_samples, 10_000);
        assert_eq!(config.prior, PriorSpec::new(1.0, 1.0).unwrap());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = EngineConfig::from_json_str(r#"{"seed": 7, "hist_bins": 50}"#).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.hist_bins, 50);
        assert_eq!(config.grid_points, DEFAULT_GRID_POINTS);
    }

    #[test]
    fn test_invalid_configs() {
        let bad = vec![
            EngineConfig { plot_samples: 1, ..Default::default() },
            EngineConfig { metric_samples: 10, plot_samples: 100, ..Default::default() },
            EngineConfig { grid_points: 50, ..Default::default() },
            EngineConfig { grid_points: 301, ..Default::default() },
            EngineConfig { hist_bins: 0, ..Default::default() },
            EngineConfig { significance_level: 1.0, ..Default::default() },
            EngineConfig { diff_padding: 0.0, ..Default::default() },
            EngineConfig { prior: PriorSpec { alpha: 0.0, beta: 1.0 }, ..Default::default() },
        ];
        for config in bad {
            match config.validate() {
                Err(AbTestError::InvalidConfig(_)) => {}
                other => panic!("expected InvalidConfig for {:?}, got {:?}", config, other),
            }
        }
    }

    #[test]
    fn test_overrides_replace_only_given_fields() {
        let base = EngineConfig::from_json_str(r#"{"seed": 7, "hist_bins": 40, "prior": {"alpha": 2.0, "beta": 2.0}}"#)
            .unwrap();
        let config = base
            .with_overrides(&ConfigOverrides {
                seed: Some(11),
                prior_beta: Some(3.0),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(config.seed, 11);
        assert_eq!(config.hist_bins, 40);
        assert_eq!(config.metric_samples, DEFAULT_METRIC_SAMPLES);
        assert_eq!(config.prior, PriorSpec::new(2.0, 3.0).unwrap());
    }

    #[test]
    fn test_overrides_are_validated() {
        let err = EngineConfig::load(
            None,
            &ConfigOverrides {
                grid_points: Some(20),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, AbTestError::InvalidConfig(_)));

        let err = EngineConfig::load(
            None,
            &ConfigOverrides {
                prior_alpha: Some(-1.0),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, AbTestError::InvalidConfig(_)));
    }

    #[test]
    fn test_load_from_file() {
        use std::io::Write;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"plot_samples": 500, "metric_samples": 1000}}"#).unwrap();
        let config = EngineConfig::load(Some(file.path()), &ConfigOverrides::default()).unwrap();
        assert_eq!(config.plot_samples, 500);
        assert_eq!(config.metric_samples, 1000);
        assert!(EngineConfig::load(Some(Path::new("/nonexistent/abtest.json")), &ConfigOverrides::default()).is_err());
    }

    #[test]
    fn test_unparseable_json() {
        assert!(matches!(
            EngineConfig::from_json_str("{seed: }"),
            Err(AbTestError::InvalidConfig(_))
        ));
    }
}
