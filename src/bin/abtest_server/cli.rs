use clap::{Parser, ValueEnum};
/// HTTP front for the A/B test engine.
#[derive(Parser, Debug)]
#[command(name = "abtest_server", version, about = "A/B test calculation server")]
pub struct Cli {
    #[arg(long, short, default_value = "8000", help = "Port to listen on")]
    pub port: u16,

    #[arg(long, default_value = "127.0.0.1", help = "Bind address")]
    pub host: String,

    #[arg(
        long = "allow-origin",
        default_value = "http://localhost:5173",
        value_name = "ORIGIN",
        help = "Origin allowed to call the API from a browser (repeatable)"
    )]
    pub allow_origins: Vec<String>,

    #[arg(long, value_name = "CONFIG", help = "JSON file with engine settings")]
    pub config: Option<String>,

    #[arg(long, help = "Seed for the posterior sampler")]
    pub seed: Option<u64>,

    #[arg(long, help = "Posterior draws per arm used for the decision metrics")]
    pub samples: Option<usize>,

    #[arg(long, help = "Posterior draws per arm used for the curves")]
    pub plot_samples: Option<usize>,

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
