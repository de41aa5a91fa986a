mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::config::ConfigSubcommand;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "resonance",
    about = "Drive amplitude sweeps of a containerized field solver and analyze the results",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: nearest directory holding resonance.yaml, else cwd)
    #[arg(long, global = true, env = "RESONANCE_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default resonance.yaml and create the data directory
    Init,

    /// List sweep amplitudes with their classification
    Targets,

    /// Run the solver once per amplitude and record a manifest
    Sweep {
        /// Write parameter files and the manifest without running the solver
        #[arg(long)]
        dry_run: bool,

        /// Override the parameter template
        #[arg(long)]
        template: Option<PathBuf>,

        /// Override the container image
        #[arg(long)]
        image: Option<String>,
    },

    /// Compute per-run field energy and chart the singularity triad
    Analyze {
        /// Chart output path
        #[arg(long)]
        plot: Option<PathBuf>,

        /// Skip the chart
        #[arg(long)]
        no_plot: bool,

        /// Also write the manifest with an Energy column
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Field statistics and profile chart for a single run
    Inspect {
        /// Run amplitude
        #[arg(long)]
        amplitude: Option<u64>,

        /// Read this xgraph file instead of searching the run directory
        #[arg(long)]
        file: Option<PathBuf>,

        /// Chart output path
        #[arg(long)]
        plot: Option<PathBuf>,

        /// Skip the chart
        #[arg(long)]
        no_plot: bool,
    },

    /// Scan the zeta critical line for zeros near the target integers
    Zeta {
        #[arg(long)]
        start: Option<f64>,

        #[arg(long)]
        end: Option<f64>,

        /// Scan grid spacing
        #[arg(long)]
        step: Option<f64>,

        /// Target integer (repeatable)
        #[arg(long = "target")]
        targets: Vec<u64>,

        /// Chart output path
        #[arg(long)]
        plot: Option<PathBuf>,

        /// Skip the chart
        #[arg(long)]
        no_plot: bool,
    },

    /// Show or validate the project configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Sweep { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Init => cmd::init::run(&root, cli.json),
        Commands::Targets => cmd::targets::run(&root, cli.json),
        Commands::Sweep {
            dry_run,
            template,
            image,
        } => cmd::sweep::run(
            &root,
            cmd::sweep::SweepArgs {
                dry_run,
                template,
                image,
            },
            cli.json,
        ),
        Commands::Analyze { plot, no_plot, csv } => {
            cmd::analyze::run(&root, plot, no_plot, csv, cli.json)
        }
        Commands::Inspect {
            amplitude,
            file,
            plot,
            no_plot,
        } => cmd::inspect::run(
            &root,
            cmd::inspect::InspectArgs {
                amplitude,
                file,
                plot,
                no_plot,
            },
            cli.json,
        ),
        Commands::Zeta {
            start,
            end,
            step,
            targets,
            plot,
            no_plot,
        } => cmd::zeta::run(
            &root,
            cmd::zeta::ZetaArgs {
                start,
                end,
                step,
                targets,
                plot,
                no_plot,
            },
            cli.json,
        ),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
