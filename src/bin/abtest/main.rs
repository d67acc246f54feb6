use abtest_utils::config::{ConfigOverrides, EngineConfig};
use abtest_utils::engine::AbTestEngine;
use abtest_utils::observation::AbTestInput;
use anyhow::{Context, Result, bail};
use clap::Parser;
use env_logger::Env;
use log::{debug, info};
use std::path::Path;

mod cli;
mod report;

fn main() -> Result<()> {
    let args = cli::Cli::parse();
    // Set up logging level
    match args.verbosity {
        cli::LogLevel::Silent => {
            env_logger::Builder::from_env(Env::default().default_filter_or("off")).init();
        }
        cli::LogLevel::Normal => {
            env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
        }
        cli::LogLevel::Verbose => {
            env_logger::Builder::from_env(Env::default().default_filter_or("debug")).init();
        }
    }

    let out_path = args.out.as_deref().map(Path::new);
    if let Some(out_path) = out_path {
        if out_path.exists() {
            bail!("Output directory already exists: {}", out_path.display());
        }
    }

    let config = engine_config(&args)?;
    debug!("Engine configuration: {:?}", config);
    let engine = AbTestEngine::new(config)?;

    info!(
        "Comparing A = {}/{} against B = {}/{}",
        args.a_success, args.a_total, args.b_success, args.b_total
    );
    let input = AbTestInput::new(args.a_success, args.a_total, args.b_success, args.b_total);
    let result = engine.calculate(&input)?;
    report::log_summary(&result);

    match out_path {
        Some(out_path) => {
            std::fs::create_dir(out_path)
                .with_context(|| format!("Could not create output directory {}", out_path.display()))?;
            info!("Created output directory");
            report::write_result(out_path, &result)?;
        }
        None => println!("{}", serde_json::to_string_pretty(&result)?),
    }
    Ok(())
}

/// Config file first, then explicit flags on top.
fn engine_config(args: &cli::Cli) -> Result<EngineConfig> {
    let overrides = ConfigOverrides {
        seed: args.seed,
        metric_samples: args.samples,
        plot_samples: args.plot_samples,
        grid_points: args.grid_points,
        hist_bins: args.bins,
        prior_alpha: args.prior_alpha,
        prior_beta: args.prior_beta,
    };
    Ok(EngineConfig::load(args.config.as_deref().map(Path::new), &overrides)?)
}
