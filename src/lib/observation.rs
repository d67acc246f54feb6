use crate::error::{AbTestError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use strum_macros::EnumIter;

/// One side of the comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, EnumIter)]
pub enum Arm {
    A,
    B,
}

impl Arm {
    pub fn label(&self) -> &'static str {
        match self {
            Arm::A => "a",
            Arm::B => "b",
        }
    }
}

impl fmt::Display for Arm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Arm::A => write!(f, "A (control)"),
            Arm::B => write!(f, "B (variant)"),
        }
    }
}

/// Validated successes/trials for one arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ArmObservation {
    successes: u64,
    trials: u64,
}

impl ArmObservation {
    /// Validate one arm's counts. Messages use the request field names
    /// (`a_success`, `a_total`, ...).
    pub fn new(arm: Arm, successes: i64, trials: i64) -> Result<Self> {
        let label = arm.label();
        if trials <= 0 {
            return Err(AbTestError::InvalidInput(format!(
                "{}_total must be positive, got {}",
                label, trials
            )));
        }
        if successes < 0 {
            return Err(AbTestError::InvalidInput(format!(
                "{}_success must be non-negative, got {}",
                label, successes
            )));
        }
        if successes > trials {
            return Err(AbTestError::InvalidInput(format!(
                "{}_success ({}) exceeds {}_total ({})",
                label, successes, label, trials
            )));
        }
        Ok(Self {
            successes: successes as u64,
            trials: trials as u64,
        })
    }

    pub fn successes(&self) -> u64 {
        self.successes
    }

    pub fn trials(&self) -> u64 {
        self.trials
    }

    pub fn failures(&self) -> u64 {
        self.trials - self.successes
    }

    /// Observed conversion rate.
    pub fn rate(&self) -> f64 {
        self.successes as f64 / self.trials as f64
    }
}

/// Beta prior pseudo-counts for one arm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriorSpec {
    pub alpha: f64,
    pub beta: f64,
}

impl Default for PriorSpec {
    /// Uniform Beta(1, 1)
    fn default() -> Self {
        Self {
            alpha: 1.0,
            beta: 1.0,
        }
    }
}

impl PriorSpec {
    pub fn new(alpha: f64, beta: f64) -> Result<Self> {
        let prior = Self { alpha, beta };
        prior.validate()?;
        Ok(prior)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.alpha.is_finite() && self.alpha > 0.0) {
            return Err(AbTestError::InvalidInput(format!(
                "prior alpha must be finite and positive, got {}",
                self.alpha
            )));
        }
        if !(self.beta.is_finite() && self.beta > 0.0) {
            return Err(AbTestError::InvalidInput(format!(
                "prior beta must be finite and positive, got {}",
                self.beta
            )));
        }
        Ok(())
    }
}

/// Raw request counts as they arrive from a caller. Signed so that negative
/// values can be rejected with a proper message instead of a parse failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbTestInput {
    pub a_success: i64,
    pub a_total: i64,
    pub b_success: i64,
    pub b_total: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub a_prior_alpha: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub a_prior_beta: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub b_prior_alpha: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub b_prior_beta: Option<f64>,
}

impl AbTestInput {
    pub fn new(a_success: i64, a_total: i64, b_success: i64, b_total: i64) -> Self {
        Self {
            a_success,
            a_total,
            b_success,
            b_total,
            a_prior_alpha: None,
            a_prior_beta: None,
            b_prior_alpha: None,
            b_prior_beta: None,
        }
    }

    pub fn with_priors(mut self, a_prior: PriorSpec, b_prior: PriorSpec) -> Self {
        self.a_prior_alpha = Some(a_prior.alpha);
        self.a_prior_beta = Some(a_prior.beta);
        self.b_prior_alpha = Some(b_prior.alpha);
        self.b_prior_beta = Some(b_prior.beta);
        self
    }

    /// Prior for `arm`, falling back to `default` for any missing parameter.
    pub fn prior(&self, arm: Arm, default: PriorSpec) -> Result<PriorSpec> {
        let (alpha, beta) = match arm {
            Arm::A => (self.a_prior_alpha, self.a_prior_beta),
            Arm::B => (self.b_prior_alpha, self.b_prior_beta),
        };
        PriorSpec::new(alpha.unwrap_or(default.alpha), beta.unwrap_or(default.beta))
    }

    pub fn validate(&self) -> Result<(ArmObservation, ArmObservation)> {
        validate(self.a_success, self.a_total, self.b_success, self.b_total)
    }
}

/// Check the four counts and build the observation pair.
pub fn validate(
    a_successes: i64,
    a_trials: i64,
    b_successes: i64,
    b_trials: i64,
) -> Result<(ArmObservation, ArmObservation)> {
    let a = ArmObservation::new(Arm::A, a_successes, a_trials)?;
    let b = ArmObservation::new(Arm::B, b_successes, b_trials)?;
    Ok((a, b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_validate_ok() {
        let (a, b) = validate(100, 1000, 120, 1000).unwrap();
        assert_eq!(a.successes(), 100);
        assert_eq!(a.trials(), 1000);
        assert_eq!(a.failures(), 900);
        assert_eq!(b.successes(), 120);
        assert!((b.rate() - 0.12).abs() < 1e-12);
    }

    #[test]
    fn test_validate_boundaries() {
        assert!(validate(0, 1, 1, 1).is_ok());
        assert!(validate(0, 5, 0, 5).is_ok());
        assert!(validate(5, 5, 5, 5).is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_counts() {
        for (a_s, a_n, b_s, b_n) in vec![
            (0, 0, 1, 10),
            (1, 10, 0, 0),
            (0, -3, 1, 10),
            (-1, 10, 1, 10),
            (1, 10, -1, 10),
            (11, 10, 1, 10),
            (1, 10, 11, 10),
        ] {
            let err = validate(a_s, a_n, b_s, b_n).unwrap_err();
            assert!(err.is_input_error(), "expected input error for {:?}", (a_s, a_n, b_s, b_n));
        }
    }

    #[test]
    fn test_error_names_the_field() {
        let err = validate(11, 10, 1, 10).unwrap_err();
        assert_eq!(
            err,
            AbTestError::InvalidInput("a_success (11) exceeds a_total (10)".to_string())
        );
        let err = validate(1, 10, 1, 0).unwrap_err();
        assert_eq!(format!("{}", err), "Invalid input: b_total must be positive, got 0");
    }

    #[test]
    fn test_prior_defaults_and_overrides() {
        let input = AbTestInput::new(1, 10, 2, 10);
        assert_eq!(input.prior(Arm::A, PriorSpec::default()).unwrap(), PriorSpec::default());

        let input = input.with_priors(PriorSpec::new(2.0, 3.0).unwrap(), PriorSpec::default());
        let a_prior = input.prior(Arm::A, PriorSpec::default()).unwrap();
        assert_eq!(a_prior.alpha, 2.0);
        assert_eq!(a_prior.beta, 3.0);
    }

    #[test]
    fn test_prior_rejects_non_positive() {
        assert!(PriorSpec::new(0.0, 1.0).unwrap_err().is_input_error());
        assert!(PriorSpec::new(1.0, -2.0).is_err());
        assert!(PriorSpec::new(f64::NAN, 1.0).is_err());
        assert!(PriorSpec::new(1.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_input_deserializes_without_priors() {
        let input: AbTestInput =
            serde_json::from_str(r#"{"a_success": 100, "a_total": 1000, "b_success": 120, "b_total": 1000}"#)
                .unwrap();
        assert_eq!(input, AbTestInput::new(100, 1000, 120, 1000));
    }

    #[test]
    fn test_arm_labels_prefix_field_names() {
        let labels: Vec<&str> = Arm::iter().map(|arm| arm.label()).collect();
        assert_eq!(labels, vec!["a", "b"]);
    }
}
