use crate::output::{print_json, print_table};
use anyhow::Context;
use resonance_core::config::Config;
use resonance_core::targets::AmplitudeClass;
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct TargetRow {
    amplitude: u64,
    class: AmplitudeClass,
}

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let spec = &config.sweep.targets;
    let rows: Vec<TargetRow> = spec
        .amplitudes()
        .into_iter()
        .map(|amplitude| TargetRow {
            amplitude,
            class: spec.classify(amplitude),
        })
        .collect();

    if json {
        return print_json(&rows);
    }

    let primes = rows
        .iter()
        .filter(|r| r.class == AmplitudeClass::Prime)
        .count();
    print_table(
        &["AMPLITUDE", "TYPE"],
        rows.iter()
            .map(|r| vec![r.amplitude.to_string(), r.class.to_string()])
            .collect(),
    );
    println!();
    println!("{} targets ({primes} prime)", rows.len());
    Ok(())
}
