use crate::series::{parse_ioascii, Sample};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Mean of squares. Zero for an empty series.
pub fn mean_energy(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().map(|v| v * v).sum::<f64>() / values.len() as f64
}

fn sorted_entries(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut paths: Vec<PathBuf> = entries.filter_map(|e| e.ok().map(|e| e.path())).collect();
    paths.sort();
    paths
}

fn file_name(path: &Path) -> &str {
    path.file_name().and_then(|n| n.to_str()).unwrap_or("")
}

/// First file directly inside `dir` whose name contains `phi`.
pub fn find_phi_file(dir: &Path) -> Option<PathBuf> {
    sorted_entries(dir)
        .into_iter()
        .find(|p| p.is_file() && file_name(p).contains("phi"))
}

/// Depth-first search under `dir` for a `phi*.xg` file.
pub fn find_xg_file(dir: &Path) -> Option<PathBuf> {
    let entries = sorted_entries(dir);
    if let Some(hit) = entries.iter().find(|p| {
        let name = file_name(p);
        p.is_file() && name.contains("phi") && name.ends_with(".xg")
    }) {
        return Some(hit.clone());
    }
    entries
        .iter()
        .filter(|p| p.is_dir())
        .find_map(|sub| find_xg_file(sub))
}

/// Mean field energy of one run directory.
///
/// Best effort: a missing directory, missing phi file, or unreadable data all
/// produce `0.0`.
pub fn run_energy(dir: &Path) -> f64 {
    let Some(file) = find_phi_file(dir) else {
        tracing::debug!(dir = %dir.display(), "no phi output");
        return 0.0;
    };
    match std::fs::read_to_string(&file) {
        Ok(text) => mean_energy(&parse_ioascii(&text)),
        Err(e) => {
            tracing::debug!(file = %file.display(), error = %e, "unreadable phi output");
            0.0
        }
    }
}

// ---------------------------------------------------------------------------
// FieldStats
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldStats {
    pub points: usize,
    pub mean_energy: f64,
    pub max: f64,
    pub min: f64,
}

impl FieldStats {
    pub fn from_samples(samples: &[Sample]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }
        let values: Vec<f64> = samples.iter().map(|s| s.value).collect();
        Some(Self {
            points: values.len(),
            mean_energy: mean_energy(&values),
            max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            min: values.iter().copied().fold(f64::INFINITY, f64::min),
        })
    }
}
