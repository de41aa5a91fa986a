use crate::output::print_json;
use anyhow::Context;
use resonance_core::config::Config;
use resonance_core::solver::{ContainerRunner, DryRunner, SolverRunner};
use resonance_core::sweep::run_sweep;
use std::path::{Path, PathBuf};

pub struct SweepArgs {
    pub dry_run: bool,
    pub template: Option<PathBuf>,
    pub image: Option<String>,
}

pub fn run(root: &Path, args: SweepArgs, json: bool) -> anyhow::Result<()> {
    let mut config = Config::load(root).context("failed to load config")?;
    if let Some(template) = args.template {
        config.sweep.template = template;
    }
    if let Some(image) = args.image {
        config.sweep.image = image;
    }

    let container;
    let runner: &dyn SolverRunner = if args.dry_run {
        &DryRunner
    } else {
        container = ContainerRunner::locate(&config.sweep.runtime)
            .context("cannot run the solver")?;
        tracing::info!(runtime = %container.binary().display(), image = %config.sweep.image, "solver runtime");
        &container
    };

    let summary = run_sweep(root, &config.sweep, runner).context("sweep aborted")?;

    if json {
        return print_json(&summary);
    }

    println!("Sweep complete: {} runs", summary.total);
    println!("  succeeded: {}", summary.succeeded);
    println!("  failed:    {}", summary.failed);
    if summary.skipped > 0 {
        println!("  skipped:   {} (dry run)", summary.skipped);
    }
    println!("Data stored in: {}", summary.data_dir.display());
    Ok(())
}
