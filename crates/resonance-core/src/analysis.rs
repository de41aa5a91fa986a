use crate::energy::run_energy;
use crate::error::Result;
use crate::io::atomic_write;
use crate::manifest::{read_manifest, ManifestRow, RunStatus};
use crate::paths;
use crate::plot::Bar;
use crate::targets::AmplitudeRange;
use serde::Serialize;
use std::fmt::Write as _;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnergyRow {
    #[serde(flatten)]
    pub run: ManifestRow,
    pub energy: f64,
}

/// Mean field energy for every manifest row.
///
/// Runs are looked up by amplitude under the host data directory; the
/// manifest's container-side path is not used. Anything but `SUCCESS`
/// scores zero.
pub fn compute_energies(data_dir: &Path, rows: Vec<ManifestRow>) -> Vec<EnergyRow> {
    rows.into_iter()
        .map(|run| {
            let energy = match run.status {
                RunStatus::Success => run_energy(&paths::run_dir(data_dir, run.amplitude)),
                RunStatus::Failed | RunStatus::Skipped => 0.0,
            };
            tracing::debug!(amplitude = run.amplitude, energy, "run analyzed");
            EnergyRow { run, energy }
        })
        .collect()
}

pub fn analyze(data_dir: &Path) -> Result<Vec<EnergyRow>> {
    let rows = read_manifest(&paths::manifest_path(data_dir))?;
    tracing::info!(rows = rows.len(), data_dir = %data_dir.display(), "analyzing sweep");
    Ok(compute_energies(data_dir, rows))
}

pub fn triad_bars(rows: &[EnergyRow], window: &AmplitudeRange) -> Vec<Bar> {
    rows.iter()
        .filter(|r| window.contains(r.run.amplitude))
        .map(|r| Bar {
            amplitude: r.run.amplitude,
            class: r.run.class,
            energy: r.energy,
        })
        .collect()
}

/// The manifest with an extra `Energy` column.
pub fn energy_csv(rows: &[EnergyRow]) -> String {
    let mut out = format!("{},Energy\n", crate::manifest::HEADER);
    for r in rows {
        let _ = writeln!(out, "{},{}", r.run.to_csv_line(), r.energy);
    }
    out
}

pub fn write_energy_csv(path: &Path, rows: &[EnergyRow]) -> Result<()> {
    atomic_write(path, energy_csv(rows).as_bytes())
}
