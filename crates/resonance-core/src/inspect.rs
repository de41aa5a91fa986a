use crate::energy::{find_xg_file, FieldStats};
use crate::error::{ResonanceError, Result};
use crate::series::{parse_xgraph, Sample};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize)]
pub struct Inspection {
    pub file: PathBuf,
    pub stats: FieldStats,
    #[serde(skip)]
    pub samples: Vec<Sample>,
}

/// `preferred` inside `run_dir` if present, else the first `phi*.xg` below it.
pub fn locate_field_file(run_dir: &Path, preferred: &str) -> Option<PathBuf> {
    let direct = run_dir.join(preferred);
    if direct.is_file() {
        return Some(direct);
    }
    tracing::debug!(dir = %run_dir.display(), preferred, "searching for phi data");
    find_xg_file(run_dir)
}

pub fn inspect_file(path: &Path) -> Result<Inspection> {
    let text = std::fs::read_to_string(path)
        .map_err(|_| ResonanceError::FieldDataEmpty(path.display().to_string()))?;
    let samples = parse_xgraph(&text);
    let stats = FieldStats::from_samples(&samples)
        .ok_or_else(|| ResonanceError::FieldDataEmpty(path.display().to_string()))?;
    Ok(Inspection {
        file: path.to_path_buf(),
        stats,
        samples,
    })
}

pub fn inspect_run(run_dir: &Path, preferred: &str) -> Result<Inspection> {
    let file = locate_field_file(run_dir, preferred)
        .ok_or_else(|| ResonanceError::FieldDataNotFound(run_dir.display().to_string()))?;
    inspect_file(&file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn prefers_diagonal_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("phi_3D_diagonal.xg"), "\"phi\n0 1\n1 -3\n").unwrap();
        std::fs::write(dir.path().join("phi_x_.xg"), "0 100\n").unwrap();
        let report = inspect_run(dir.path(), "phi_3D_diagonal.xg").unwrap();
        assert!(report.file.ends_with("phi_3D_diagonal.xg"));
        assert_eq!(report.stats.points, 2);
        assert_eq!(report.stats.max, 1.0);
        assert_eq!(report.stats.min, -3.0);
        assert!((report.stats.mean_energy - 5.0).abs() < 1e-12);
    }

    #[test]
    fn falls_back_to_search() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("sim/output-0000");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(nested.join("phi_x_.xg"), "0 2\n").unwrap();
        let report = inspect_run(dir.path(), "phi_3D_diagonal.xg").unwrap();
        assert_eq!(report.file, nested.join("phi_x_.xg"));
    }

    #[test]
    fn empty_and_missing_are_errors() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            inspect_run(dir.path(), "phi_3D_diagonal.xg"),
            Err(ResonanceError::FieldDataNotFound(_))
        ));
        std::fs::write(dir.path().join("phi_3D_diagonal.xg"), "# nothing\n").unwrap();
        assert!(matches!(
            inspect_run(dir.path(), "phi_3D_diagonal.xg"),
            Err(ResonanceError::FieldDataEmpty(_))
        ));
    }
}
