use crate::output::{print_json, print_table};
use anyhow::Context;
use resonance_core::analysis::{analyze, triad_bars, write_energy_csv};
use resonance_core::config::Config;
use resonance_core::paths;
use resonance_core::plot::triad_chart;
use std::path::{Path, PathBuf};

pub fn run(
    root: &Path,
    plot: Option<PathBuf>,
    no_plot: bool,
    csv: Option<PathBuf>,
    json: bool,
) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let data_dir = config.data_dir(root);
    let rows = analyze(&data_dir).context("failed to analyze sweep")?;

    if let Some(csv) = csv {
        let csv = paths::resolve(root, &csv);
        write_energy_csv(&csv, &rows)
            .with_context(|| format!("failed to write {}", csv.display()))?;
    }

    let window = config.analysis.window;
    let bars = triad_bars(&rows, &window);
    let chart = if no_plot {
        None
    } else {
        let path = paths::resolve(root, plot.as_deref().unwrap_or(config.analysis.plot.as_path()));
        let singular: Vec<u64> = config
            .sweep
            .targets
            .singularities
            .iter()
            .copied()
            .filter(|&s| window.contains(s))
            .collect();
        triad_chart(&path, &bars, &singular).context("failed to draw triad chart")?;
        Some(path)
    };

    if json {
        let value = serde_json::json!({
            "runs": rows,
            "window": window,
            "chart": chart,
        });
        return print_json(&value);
    }

    print_table(
        &["AMPLITUDE", "TYPE", "STATUS", "ENERGY"],
        rows.iter()
            .map(|r| {
                vec![
                    r.run.amplitude.to_string(),
                    r.run.class.to_string(),
                    r.run.status.to_string(),
                    format!("{:.6e}", r.energy),
                ]
            })
            .collect(),
    );
    println!();
    println!(
        "Triad window {}..={}: {} runs",
        window.start,
        window.end,
        bars.len()
    );
    if let Some(path) = chart {
        println!("Chart saved to {}", path.display());
    }
    Ok(())
}
