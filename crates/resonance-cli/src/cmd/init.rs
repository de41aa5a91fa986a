use crate::output::print_json;
use anyhow::Context;
use resonance_core::config::Config;
use resonance_core::io::ensure_dir;
use resonance_core::paths;
use std::path::Path;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let config_path = paths::config_path(root);
    let created = Config::init(root)
        .with_context(|| format!("failed to write {}", config_path.display()))?;

    let config = Config::load(root).context("failed to load config")?;
    let data_dir = config.data_dir(root);
    ensure_dir(&data_dir).context("failed to create data directory")?;

    if json {
        let value = serde_json::json!({
            "config": config_path,
            "created": created,
            "data_dir": data_dir,
        });
        return print_json(&value);
    }

    if created {
        println!("Wrote {}", config_path.display());
    } else {
        println!("{} already exists; left unchanged.", config_path.display());
    }
    println!("Data directory: {}", data_dir.display());
    let template = config.template_path(root);
    if !template.exists() {
        println!(
            "Note: parameter template {} not found; sweeps need it.",
            template.display()
        );
    }
    Ok(())
}
