// src/cli.rs
use clap::{Parser, ValueEnum};
/// Compare a control and a variant from their success/trial counts.
#[derive(Parser, Debug)]
#[command(name = "abtest", version, about = "Frequentist and Bayesian A/B test")]
pub struct Cli {
    #[arg(value_name = "A_SUCCESS", allow_negative_numbers = true, help = "Successes in the control arm")]
    pub a_success: i64,

    #[arg(value_name = "A_TOTAL", allow_negative_numbers = true, help = "Trials in the control arm")]
    pub a_total: i64,

    #[arg(value_name = "B_SUCCESS", allow_negative_numbers = true, help = "Successes in the variant arm")]
    pub b_success: i64,

    #[arg(value_name = "B_TOTAL", allow_negative_numbers = true, help = "Trials in the variant arm")]
    pub b_total: i64,

    #[arg(
        long,
        short,
        value_name = "OUT",
        help = "Output directory for result.json and curve tables (must not exist)"
    )]
    pub out: Option<String>,

    #[arg(long, value_name = "CONFIG", help = "JSON file with engine settings")]
    pub config: Option<String>,

    #[arg(long, help = "Seed for the posterior sampler")]
    pub seed: Option<u64>,

    #[arg(long, help = "Posterior draws per arm used for the decision metrics")]
    pub samples: Option<usize>,

    #[arg(long, help = "Posterior draws per arm used for the curves")]
    pub plot_samples: Option<usize>,

    #[arg(long, help = "Number of points in each density curve (100-300)")]
    pub grid_points: Option<usize>,

    #[arg(long, help = "Number of histogram bins over [0, 1]")]
    pub bins: Option<usize>,

    #[arg(long, help = "Prior alpha for both arms [default: 1.0]")]
    pub prior_alpha: Option<f64>,

    #[arg(long, help = "Prior beta for both arms [default: 1.0]")]
    pub prior_beta: Option<f64>,

    #[arg(
        value_enum,
        long,
        default_value = "normal",
        value_name = "VERBOSITY",
        help = "Verbosity level"
    )]
    pub verbosity: LogLevel,
}

#[derive(Debug, ValueEnum, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Verbose,
    Normal,
    Silent,
}
