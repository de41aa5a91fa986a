use crate::output::print_json;
use anyhow::Context;
use clap::Subcommand;
use resonance_core::config::{Config, WarnLevel};
use std::path::Path;

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Print the effective configuration (file merged over defaults)
    Show,

    /// Validate the config for common mistakes
    Validate,
}

pub fn run(root: &Path, subcmd: ConfigSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ConfigSubcommand::Show => show(root, json),
        ConfigSubcommand::Validate => validate(root, json),
    }
}

fn show(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    if json {
        return print_json(&config);
    }
    println!("sweep:");
    println!("  image:         {}", config.sweep.image);
    println!("  runtime:       {}", config.sweep.runtime);
    println!("  template:      {}", config.sweep.template.display());
    println!("  data_dir:      {}", config.sweep.data_dir.display());
    println!("  amplitude_key: {}", config.sweep.amplitude_key);
    println!("  cooldown_ms:   {}", config.sweep.cooldown_ms);
    println!(
        "  targets:       {} amplitudes, singularities {:?}",
        config.sweep.targets.amplitudes().len(),
        config.sweep.targets.singularities
    );
    println!("analysis:");
    println!(
        "  window:        {}..={}",
        config.analysis.window.start, config.analysis.window.end
    );
    println!("  plot:          {}", config.analysis.plot.display());
    println!("inspect:");
    println!("  amplitude:     {}", config.inspect.amplitude);
    println!("  file:          {}", config.inspect.preferred_file);
    println!("zeta:");
    println!(
        "  range:         [{}, {}] step {}",
        config.zeta.start, config.zeta.end, config.zeta.step
    );
    println!("  targets:       {:?}", config.zeta.targets);
    println!(
        "  thresholds:    direct hit < {}, near miss < {}",
        config.zeta.direct_hit, config.zeta.near_miss
    );
    Ok(())
}

fn validate(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let warnings = config.validate(root);

    if json {
        let value = serde_json::json!({
            "warnings": warnings,
        });
        print_json(&value)?;
    } else if warnings.is_empty() {
        println!("Config is valid. No warnings.");
    } else {
        for w in &warnings {
            let prefix = match w.level {
                WarnLevel::Warning => "warning",
                WarnLevel::Error => "error",
            };
            println!("[{prefix}] {}", w.message);
        }
    }

    if warnings.iter().any(|w| w.level == WarnLevel::Error) {
        anyhow::bail!("config validation found errors");
    }
    Ok(())
}
