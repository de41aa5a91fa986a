use crate::error::Result;
use crate::parfile::ParTemplate;
use crate::paths;
use crate::targets::{is_primorial, AmplitudeRange, TargetSpec};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

impl ConfigWarning {
    fn warning(message: impl Into<String>) -> Self {
        Self {
            level: WarnLevel::Warning,
            message: message.into(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            level: WarnLevel::Error,
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// SweepConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Container image that runs the solver.
    #[serde(default = "default_image")]
    pub image: String,
    /// Container runtime binary, resolved on PATH unless absolute.
    #[serde(default = "default_runtime")]
    pub runtime: String,
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_template")]
    pub template: PathBuf,
    /// Parameter whose value is replaced by each amplitude.
    #[serde(default = "default_amplitude_key")]
    pub amplitude_key: String,
    /// Where `data_dir` is mounted inside the container.
    #[serde(default = "default_mount_point")]
    pub mount_point: String,
    #[serde(default = "default_cooldown_ms")]
    pub cooldown_ms: u64,
    #[serde(default)]
    pub targets: TargetSpec,
}

fn default_image() -> String {
    "primeresonance-et:v1".to_string()
}

fn default_runtime() -> String {
    "docker".to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(paths::DEFAULT_DATA_DIR)
}

fn default_template() -> PathBuf {
    PathBuf::from(paths::DEFAULT_TEMPLATE)
}

fn default_amplitude_key() -> String {
    "initial_amplitude".to_string()
}

fn default_mount_point() -> String {
    "/data".to_string()
}

fn default_cooldown_ms() -> u64 {
    1000
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            image: default_image(),
            runtime: default_runtime(),
            data_dir: default_data_dir(),
            template: default_template(),
            amplitude_key: default_amplitude_key(),
            mount_point: default_mount_point(),
            cooldown_ms: default_cooldown_ms(),
            targets: TargetSpec::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// AnalysisConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Amplitudes shown in the triad bar chart.
    #[serde(default = "default_window")]
    pub window: AmplitudeRange,
    #[serde(default = "default_triad_plot")]
    pub plot: PathBuf,
}

fn default_window() -> AmplitudeRange {
    AmplitudeRange::new(30020, 30040)
}

fn default_triad_plot() -> PathBuf {
    PathBuf::from(paths::TRIAD_PLOT)
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            window: default_window(),
            plot: default_triad_plot(),
        }
    }
}

// ---------------------------------------------------------------------------
// InspectConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InspectConfig {
    #[serde(default = "default_inspect_amplitude")]
    pub amplitude: u64,
    /// File tried first inside the run directory before searching.
    #[serde(default = "default_preferred_file")]
    pub preferred_file: String,
}

fn default_inspect_amplitude() -> u64 {
    30030
}

fn default_preferred_file() -> String {
    "phi_3D_diagonal.xg".to_string()
}

impl Default for InspectConfig {
    fn default() -> Self {
        Self {
            amplitude: default_inspect_amplitude(),
            preferred_file: default_preferred_file(),
        }
    }
}

// ---------------------------------------------------------------------------
// ZetaConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZetaConfig {
    #[serde(default = "default_zeta_start")]
    pub start: f64,
    #[serde(default = "default_zeta_end")]
    pub end: f64,
    #[serde(default = "default_zeta_step")]
    pub step: f64,
    #[serde(default = "default_zeta_targets")]
    pub targets: Vec<u64>,
    /// Targets drawn gold on the map instead of red.
    #[serde(default = "default_highlight")]
    pub highlight: Vec<u64>,
    #[serde(default = "default_near_miss")]
    pub near_miss: f64,
    #[serde(default = "default_direct_hit")]
    pub direct_hit: f64,
    #[serde(default = "default_index_height")]
    pub index_height: f64,
    #[serde(default = "default_zeta_plot")]
    pub plot: PathBuf,
    #[serde(default = "default_plot_samples")]
    pub plot_samples: usize,
}

fn default_zeta_start() -> f64 {
    30028.0
}

fn default_zeta_end() -> f64 {
    30033.0
}

fn default_zeta_step() -> f64 {
    0.05
}

fn default_zeta_targets() -> Vec<u64> {
    vec![30029, 30030, 30031]
}

fn default_highlight() -> Vec<u64> {
    vec![30030]
}

fn default_near_miss() -> f64 {
    0.25
}

fn default_direct_hit() -> f64 {
    0.01
}

fn default_index_height() -> f64 {
    30030.0
}

fn default_zeta_plot() -> PathBuf {
    PathBuf::from(paths::ZETA_PLOT)
}

fn default_plot_samples() -> usize {
    1000
}

impl Default for ZetaConfig {
    fn default() -> Self {
        Self {
            start: default_zeta_start(),
            end: default_zeta_end(),
            step: default_zeta_step(),
            targets: default_zeta_targets(),
            highlight: default_highlight(),
            near_miss: default_near_miss(),
            direct_hit: default_direct_hit(),
            index_height: default_index_height(),
            plot: default_zeta_plot(),
            plot_samples: default_plot_samples(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub sweep: SweepConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub inspect: InspectConfig,
    #[serde(default)]
    pub zeta: ZetaConfig,
}

impl Config {
    /// Load `resonance.yaml` from `root`. A missing file yields defaults.
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Ok(Config::default());
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    /// Write the default config unless one exists. Returns true if written.
    pub fn init(root: &Path) -> Result<bool> {
        let data = serde_yaml::to_string(&Config::default())?;
        crate::io::write_if_missing(&paths::config_path(root), data.as_bytes())
    }

    pub fn data_dir(&self, root: &Path) -> PathBuf {
        paths::resolve(root, &self.sweep.data_dir)
    }

    pub fn template_path(&self, root: &Path) -> PathBuf {
        paths::resolve(root, &self.sweep.template)
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self, root: &Path) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();
        let sweep = &self.sweep;

        if sweep.image.trim().is_empty() {
            warnings.push(ConfigWarning::error("sweep.image is empty"));
        }
        if sweep.amplitude_key.trim().is_empty() {
            warnings.push(ConfigWarning::error("sweep.amplitude_key is empty"));
        }
        if !sweep.mount_point.starts_with('/') {
            warnings.push(ConfigWarning::error(format!(
                "sweep.mount_point '{}' must be an absolute container path",
                sweep.mount_point
            )));
        }
        let template = self.template_path(root);
        if !template.exists() {
            warnings.push(ConfigWarning::warning(format!(
                "parameter template '{}' does not exist",
                sweep.template.display()
            )));
        } else if let Ok(text) = std::fs::read_to_string(&template) {
            match ParTemplate::parse(text, &sweep.amplitude_key) {
                Ok(t) if !t.has_key() => warnings.push(ConfigWarning::error(format!(
                    "parameter template '{}' never assigns {}",
                    sweep.template.display(),
                    sweep.amplitude_key
                ))),
                Ok(_) => {}
                Err(e) => warnings.push(ConfigWarning::error(e.to_string())),
            }
        }

        for r in &sweep.targets.ranges {
            if r.start > r.end {
                warnings.push(ConfigWarning::error(format!(
                    "target range {}..={} is inverted",
                    r.start, r.end
                )));
            }
        }
        if sweep.targets.amplitudes().is_empty() {
            warnings.push(ConfigWarning::error("sweep.targets yields no amplitudes"));
        }
        for s in &sweep.targets.singularities {
            if !is_primorial(*s) {
                warnings.push(ConfigWarning::warning(format!(
                    "singularity {s} is not a primorial"
                )));
            }
        }

        let window = &self.analysis.window;
        if window.start > window.end {
            warnings.push(ConfigWarning::error(format!(
                "analysis.window {}..={} is inverted",
                window.start, window.end
            )));
        }

        let zeta = &self.zeta;
        if zeta.step.is_nan() || zeta.step <= 0.0 {
            warnings.push(ConfigWarning::error(format!(
                "zeta.step must be positive, got {}",
                zeta.step
            )));
        }
        if zeta.start >= zeta.end {
            warnings.push(ConfigWarning::error(format!(
                "zeta range [{}, {}] is empty",
                zeta.start, zeta.end
            )));
        } else if zeta.step > 0.0
            && crate::zeta::grid_intervals(zeta.start, zeta.end, zeta.step)
                > crate::zeta::MAX_INTERVALS as f64
        {
            warnings.push(ConfigWarning::error(format!(
                "zeta.step {} needs more than {} grid intervals",
                zeta.step,
                crate::zeta::MAX_INTERVALS
            )));
        }
        if zeta.start < crate::zeta::MIN_HEIGHT {
            warnings.push(ConfigWarning::error(format!(
                "zeta.start {} is below 2π",
                zeta.start
            )));
        }
        if zeta.direct_hit > zeta.near_miss {
            warnings.push(ConfigWarning::warning(format!(
                "zeta.direct_hit ({}) is wider than zeta.near_miss ({})",
                zeta.direct_hit, zeta.near_miss
            )));
        }
        if zeta.plot_samples < 2 {
            warnings.push(ConfigWarning::warning(
                "zeta.plot_samples < 2; the map will be empty",
            ));
        }

        warnings
    }
}
