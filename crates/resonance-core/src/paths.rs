use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// File and directory names
// ---------------------------------------------------------------------------

pub const CONFIG_FILE: &str = "resonance.yaml";
pub const DEFAULT_DATA_DIR: &str = "singularity_data";
pub const MANIFEST_FILE: &str = "sweep_manifest.csv";
pub const SUMMARY_FILE: &str = "sweep_summary.json";
pub const DEFAULT_TEMPLATE: &str = "prime_resonance_test19.par";

pub const TRIAD_PLOT: &str = "Singularity_Triad_Analysis.png";
pub const ZETA_PLOT: &str = "Zeta_Singularity_Map.png";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn manifest_path(data_dir: &Path) -> PathBuf {
    data_dir.join(MANIFEST_FILE)
}

pub fn summary_path(data_dir: &Path) -> PathBuf {
    data_dir.join(SUMMARY_FILE)
}

/// Name of the per-run output directory, shared by host and container views.
pub fn run_dir_name(amplitude: u64) -> String {
    format!("output_A{amplitude}")
}

pub fn run_dir(data_dir: &Path, amplitude: u64) -> PathBuf {
    data_dir.join(run_dir_name(amplitude))
}

pub fn par_file_name(amplitude: u64) -> String {
    format!("run_A{amplitude}.par")
}

pub fn diagnostics_plot_name(amplitude: u64) -> String {
    format!("Singularity_{amplitude}_Diagnostics.png")
}

/// Resolve `path` against `root` unless it is already absolute.
pub fn resolve(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_names_embed_amplitude() {
        assert_eq!(run_dir_name(30030), "output_A30030");
        assert_eq!(par_file_name(7), "run_A7.par");
        assert_eq!(diagnostics_plot_name(30030), "Singularity_30030_Diagnostics.png");
    }

    #[test]
    fn resolve_keeps_absolute_paths() {
        let root = Path::new("/work");
        assert_eq!(resolve(root, Path::new("data")), PathBuf::from("/work/data"));
        assert_eq!(resolve(root, Path::new("/tmp/x")), PathBuf::from("/tmp/x"));
    }
}
