use thiserror::Error;

/// Errors produced by the A/B test engine.
///
/// `InvalidInput` is the caller's fault and can be fixed by sending corrected
/// counts. The remaining variants come from numerical edge cases inside the
/// computation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AbTestError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Insufficient samples: {0}")]
    InsufficientSamples(String),

    #[error("Degenerate distribution: {0}")]
    DegenerateDistribution(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl AbTestError {
    /// True when the error was caused by the request data rather than the computation.
    pub fn is_input_error(&self) -> bool {
        matches!(self, AbTestError::InvalidInput(_))
    }
}

pub type Result<T> = std::result::Result<T, AbTestError>;
