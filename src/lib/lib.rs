//! Two-arm A/B test engine.
//!
//! Takes successes/trials for a control (A) and a variant (B) and reports a
//! pooled two-proportion z-test next to a Beta-Binomial posterior analysis:
//! probability each arm is best, posterior means, expected loss, and density
//! curves for plotting.
//!
//! ```no_run
//! use abtest_utils::engine::AbTestEngine;
//! use abtest_utils::observation::AbTestInput;
//!
//! let engine = AbTestEngine::default();
//! let result = engine.calculate(&AbTestInput::new(100, 1000, 120, 1000)).unwrap();
//! println!("P(B > A) = {}", result.bayes_prob_b_better);
//! ```

pub mod config;
pub mod density;
pub mod engine;
pub mod error;
pub mod frequentist;
pub mod metrics;
pub mod model;
pub mod observation;
pub mod sampler;
pub mod stats;

pub use engine::{AbTestEngine, InferenceResult};
pub use error::{AbTestError, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
