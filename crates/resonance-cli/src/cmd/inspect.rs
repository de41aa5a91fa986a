use crate::output::print_json;
use anyhow::Context;
use resonance_core::config::Config;
use resonance_core::inspect::{inspect_file, inspect_run};
use resonance_core::paths;
use resonance_core::plot::field_profile;
use std::path::{Path, PathBuf};

pub struct InspectArgs {
    pub amplitude: Option<u64>,
    pub file: Option<PathBuf>,
    pub plot: Option<PathBuf>,
    pub no_plot: bool,
}

pub fn run(root: &Path, args: InspectArgs, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let amplitude = args.amplitude.unwrap_or(config.inspect.amplitude);

    let report = match &args.file {
        Some(file) => inspect_file(&paths::resolve(root, file)),
        None => {
            let run_dir = paths::run_dir(&config.data_dir(root), amplitude);
            inspect_run(&run_dir, &config.inspect.preferred_file)
        }
    }
    .with_context(|| format!("cannot inspect run A={amplitude}"))?;

    let chart = if args.no_plot {
        None
    } else {
        let path = match args.plot {
            Some(p) => paths::resolve(root, &p),
            None => root.join(paths::diagnostics_plot_name(amplitude)),
        };
        field_profile(&path, &report.samples, amplitude)
            .context("failed to draw field profile")?;
        Some(path)
    };

    if json {
        let value = serde_json::json!({
            "amplitude": amplitude,
            "file": report.file,
            "stats": report.stats,
            "chart": chart,
        });
        return print_json(&value);
    }

    let stats = &report.stats;
    println!("Loaded {} data points from {}", stats.points, report.file.display());
    println!("Mean Energy Density: {:.6e}", stats.mean_energy);
    println!("Max phi: {:.6e}", stats.max);
    println!("Min phi: {:.6e}", stats.min);
    if let Some(path) = chart {
        println!("Chart saved to {}", path.display());
    }
    Ok(())
}
