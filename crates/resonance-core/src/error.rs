use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResonanceError {
    #[error("parameter template not found: {0}")]
    TemplateNotFound(String),

    #[error("parameter template has no '{key}' assignment: {path}")]
    TemplateKeyMissing { key: String, path: String },

    #[error("container runtime '{0}' not found on PATH")]
    RuntimeNotFound(String),

    #[error("failed to spawn solver: {0}")]
    SolverSpawnFailed(String),

    #[error("manifest not found: {0}")]
    ManifestNotFound(String),

    #[error("manifest has no header row: {0}")]
    ManifestHeader(String),

    #[error("no phi data file found under {0}")]
    FieldDataNotFound(String),

    #[error("field data file is empty or unreadable: {0}")]
    FieldDataEmpty(String),

    #[error("invalid scan range: start={start}, end={end}, step={step}")]
    InvalidScanRange { start: f64, end: f64, step: f64 },

    #[error("height {0} is below the Riemann-Siegel domain (t >= 2π)")]
    HeightOutOfDomain(f64),

    #[error("scan step {step} gives {intervals} grid intervals (limit {max})")]
    ScanTooFine { step: f64, intervals: f64, max: usize },

    #[error("plot error: {0}")]
    Plot(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Regex(#[from] regex::Error),
}

pub type Result<T> = std::result::Result<T, ResonanceError>;
