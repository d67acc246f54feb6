use abtest_utils::engine::InferenceResult;
use abtest_utils::observation::Arm;
use anyhow::{Context, Result, bail};
use csv::{Writer, WriterBuilder};
use log::{debug, info};
use std::fs::File;
use std::path::Path;
use strum::IntoEnumIterator;

pub const RESULT_FILE: &str = "result.json";
pub const DENSITY_FILE: &str = "density.tsv";
pub const DIFFERENCE_FILE: &str = "difference.tsv";
pub const HISTOGRAM_FILE: &str = "histogram.tsv";

fn tsv_writer(path: &Path) -> Result<Writer<File>> {
    let file = File::create(path)
        .with_context(|| format!("Could not create {}", path.display()))?;
    Ok(WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .from_writer(file))
}

/// Write one tab-separated column per series. All columns must have the same
/// length.
fn write_columns(path: &Path, header: &[&str], columns: &[&[f64]]) -> Result<()> {
    let rows = columns.first().map(|c| c.len()).unwrap_or(0);
    if columns.iter().any(|c| c.len() != rows) {
        bail!("Columns for {} have different lengths", path.display());
    }
    let mut writer = tsv_writer(path)?;
    writer.write_record(header)?;
    for i in 0..rows {
        writer.write_record(columns.iter().map(|c| c[i].to_string()))?;
    }
    writer.flush()?;
    debug!("Wrote {} rows to {}", rows, path.display());
    Ok(())
}

pub fn write_result(out_dir: &Path, result: &InferenceResult) -> Result<()> {
    let json_path = out_dir.join(RESULT_FILE);
    let file = File::create(&json_path)
        .with_context(|| format!("Could not create {}", json_path.display()))?;
    serde_json::to_writer_pretty(file, result)?;

    write_columns(
        &out_dir.join(DENSITY_FILE),
        &["x", "a_density", "b_density"],
        &[
            result.x_values.as_slice(),
            result.a_distribution.as_slice(),
            result.b_distribution.as_slice(),
        ],
    )?;
    write_columns(
        &out_dir.join(DIFFERENCE_FILE),
        &["diff", "density"],
        &[result.diff_x.as_slice(), result.diff_distribution.as_slice()],
    )?;
    write_columns(
        &out_dir.join(HISTOGRAM_FILE),
        &["bin_center", "a_density", "b_density"],
        &[
            result.x_hist.as_slice(),
            result.a_hist.as_slice(),
            result.b_hist.as_slice(),
        ],
    )?;
    info!("Wrote results to {}", out_dir.display());
    Ok(())
}

/// Log a human readable summary of the comparison.
pub fn log_summary(result: &InferenceResult) {
    info!(
        "Frequentist: p-value = {:.6} ({})",
        result.freq_p_value,
        if result.freq_significant { "significant" } else { "not significant" }
    );
    for arm in Arm::iter() {
        let (mean, prob_best, loss) = match arm {
            Arm::A => (result.a_mean, result.a_prob_best, result.a_expected_loss),
            Arm::B => (result.b_mean, result.b_prob_best, result.b_expected_loss),
        };
        info!(
            "{}: posterior mean = {:.6}, P(best) = {:.4}, expected loss = {:.6}",
            arm, mean, prob_best, loss
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use abtest_utils::config::EngineConfig;
    use abtest_utils::engine::AbTestEngine;
    use abtest_utils::observation::AbTestInput;
    use std::fs;

    fn small_result() -> InferenceResult {
        AbTestEngine::new(EngineConfig {
            metric_samples: 2_000,
            plot_samples: 500,
            grid_points: 100,
            hist_bins: 20,
            ..Default::default()
        })
        .unwrap()
        .calculate(&AbTestInput::new(10, 100, 15, 100))
        .unwrap()
    }

    #[test]
    fn test_write_result() {
        let dir = tempfile::tempdir().unwrap();
        let result = small_result();
        write_result(dir.path(), &result).unwrap();

        let json = fs::read_to_string(dir.path().join(RESULT_FILE)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["freq_p_value"].as_f64().unwrap(), result.freq_p_value);
        assert_eq!(value["x_hist"].as_array().unwrap().len(), 20);

        let density = fs::read_to_string(dir.path().join(DENSITY_FILE)).unwrap();
        let mut lines = density.lines();
        assert_eq!(lines.next().unwrap(), "x\ta_density\tb_density");
        assert_eq!(lines.count(), 100);

        let histogram = fs::read_to_string(dir.path().join(HISTOGRAM_FILE)).unwrap();
        assert_eq!(histogram.lines().count(), 21);
        let difference = fs::read_to_string(dir.path().join(DIFFERENCE_FILE)).unwrap();
        assert!(difference.starts_with("diff\tdensity"));
    }

    #[test]
    fn test_mismatched_columns() {
        let dir = tempfile::tempdir().unwrap();
        let err = write_columns(&dir.path().join("bad.tsv"), &["x", "y"], &[&[0.1, 0.2][..], &[0.3][..]]);
        assert!(err.is_err());
    }
}
