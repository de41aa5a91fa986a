use crate::output::{print_json, print_table};
use anyhow::Context;
use resonance_core::config::Config;
use resonance_core::paths;
use resonance_core::plot::zeta_map;
use resonance_core::zeta::{run_scan, sample_curve};
use std::path::{Path, PathBuf};

pub struct ZetaArgs {
    pub start: Option<f64>,
    pub end: Option<f64>,
    pub step: Option<f64>,
    pub targets: Vec<u64>,
    pub plot: Option<PathBuf>,
    pub no_plot: bool,
}

pub fn run(root: &Path, args: ZetaArgs, json: bool) -> anyhow::Result<()> {
    let mut cfg = Config::load(root).context("failed to load config")?.zeta;
    if let Some(start) = args.start {
        cfg.start = start;
    }
    if let Some(end) = args.end {
        cfg.end = end;
    }
    if let Some(step) = args.step {
        cfg.step = step;
    }
    if !args.targets.is_empty() {
        cfg.targets = args.targets;
    }

    let report = run_scan(&cfg).context("zero scan failed")?;

    let chart = if args.no_plot {
        None
    } else {
        let path = paths::resolve(root, args.plot.as_deref().unwrap_or(cfg.plot.as_path()));
        let curve = sample_curve(cfg.start, cfg.end, cfg.plot_samples);
        zeta_map(&path, &curve, &cfg.targets, &cfg.highlight)
            .context("failed to draw zeta map")?;
        Some(path)
    };

    if json {
        let value = serde_json::json!({
            "report": report,
            "chart": chart,
        });
        return print_json(&value);
    }

    println!(
        "Scanned critical line t = [{}, {}] in steps of {}",
        report.start, report.end, report.step
    );
    for z in &report.zeros {
        println!("  zero at t = {z:.10}");
    }
    println!("Total zeros found: {}", report.zeros.len());

    println!();
    if report.proximity.is_empty() {
        println!("No zeros in range; proximity report skipped.");
    } else {
        print_table(
            &["TARGET", "NEAREST ZERO", "DISTANCE", "VERDICT"],
            report
                .proximity
                .iter()
                .map(|p| {
                    vec![
                        p.target.to_string(),
                        format!("{:.4}", p.nearest),
                        format!("{:.4}", p.distance),
                        p.verdict.to_string(),
                    ]
                })
                .collect(),
        );
    }

    println!();
    println!(
        "At height t={}, we are approximately at zero #{}",
        report.index_height, report.approximate_index as u64
    );
    if let Some(path) = chart {
        println!("Map saved to {}", path.display());
    }
    Ok(())
}
