//! Invocation of the containerized solver.
//!
//! Each run mounts the host data directory into the container and passes the
//! generated parameter file plus an `IO::out_dir=` override on the command
//! line. Stdout is discarded; stderr is captured so failures can be logged.

use crate::error::{ResonanceError, Result};
use crate::paths;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Characters of solver stderr kept on failure.
const STDERR_TAIL: usize = 500;

#[derive(Debug, Clone, PartialEq)]
pub struct SolverInvocation {
    pub image: String,
    /// Host directory mounted into the container.
    pub host_dir: PathBuf,
    pub mount_point: String,
    pub par_file: String,
    pub amplitude: u64,
}

impl SolverInvocation {
    /// Container-side output directory for this run.
    pub fn container_out_dir(&self) -> String {
        format!(
            "{}/{}",
            self.mount_point.trim_end_matches('/'),
            paths::run_dir_name(self.amplitude)
        )
    }

    /// Arguments passed to the container runtime.
    pub fn args(&self) -> Vec<String> {
        let mount = self.mount_point.trim_end_matches('/');
        vec![
            "run".to_string(),
            "--rm".to_string(),
            "-v".to_string(),
            format!("{}:{mount}", self.host_dir.display()),
            self.image.clone(),
            format!("{mount}/{}", self.par_file),
            format!("IO::out_dir={}", self.container_out_dir()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    Success,
    /// The runner chose not to execute the solver.
    Skipped,
    Failed {
        code: Option<i32>,
        stderr_tail: String,
    },
}

/// Executes one solver run. The sweep loop only depends on this trait.
pub trait SolverRunner {
    fn run(&self, invocation: &SolverInvocation) -> Result<RunOutcome>;
}

/// Runner for dry runs: parameter files are written, nothing is executed.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunner;

impl SolverRunner for DryRunner {
    fn run(&self, invocation: &SolverInvocation) -> Result<RunOutcome> {
        tracing::debug!(args = ?invocation.args(), "dry run");
        Ok(RunOutcome::Skipped)
    }
}

// ---------------------------------------------------------------------------
// ContainerRunner
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ContainerRunner {
    binary: PathBuf,
}

impl ContainerRunner {
    /// Resolve `runtime` (e.g. `docker`, `podman`, or an absolute path) on PATH.
    pub fn locate(runtime: &str) -> Result<Self> {
        let binary = which::which(runtime)
            .map_err(|_| ResonanceError::RuntimeNotFound(runtime.to_string()))?;
        Ok(Self { binary })
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }
}

impl SolverRunner for ContainerRunner {
    fn run(&self, invocation: &SolverInvocation) -> Result<RunOutcome> {
        let output = Command::new(&self.binary)
            .args(invocation.args())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| ResonanceError::SolverSpawnFailed(e.to_string()))?;

        if output.status.success() {
            return Ok(RunOutcome::Success);
        }
        let stderr = String::from_utf8_lossy(&output.stderr);
        let skip = stderr.chars().count().saturating_sub(STDERR_TAIL);
        Ok(RunOutcome::Failed {
            code: output.status.code(),
            stderr_tail: stderr.chars().skip(skip).collect::<String>().trim().to_string(),
        })
    }
}
