use crate::config::SweepConfig;
use crate::error::Result;
use crate::io::{atomic_write, ensure_dir};
use crate::manifest::{ManifestRow, ManifestWriter, RunStatus};
use crate::parfile::ParTemplate;
use crate::paths;
use crate::solver::{RunOutcome, SolverInvocation, SolverRunner};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepSummary {
    pub started_at: String,
    pub finished_at: String,
    pub image: String,
    pub data_dir: PathBuf,
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl SweepSummary {
    pub fn load(data_dir: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(paths::summary_path(data_dir))?;
        Ok(serde_json::from_str(&data)?)
    }
}

/// Run every configured amplitude through the solver, one at a time.
///
/// A failed run is recorded in the manifest and the sweep moves on. Only
/// setup problems (unreadable template, unwritable data directory) abort.
pub fn run_sweep(
    root: &Path,
    cfg: &SweepConfig,
    runner: &dyn SolverRunner,
) -> Result<SweepSummary> {
    let started_at = chrono::Utc::now().to_rfc3339();
    let template = ParTemplate::load(&paths::resolve(root, &cfg.template), &cfg.amplitude_key)?;

    let data_dir = paths::resolve(root, &cfg.data_dir);
    ensure_dir(&data_dir)?;
    let host_dir = std::fs::canonicalize(&data_dir)?;

    let amplitudes = cfg.targets.amplitudes();
    tracing::info!(
        count = amplitudes.len(),
        singularities = ?cfg.targets.singularities,
        "starting sweep"
    );

    let mut manifest = ManifestWriter::create(&paths::manifest_path(&data_dir))?;
    let mut summary = SweepSummary {
        started_at,
        finished_at: String::new(),
        image: cfg.image.clone(),
        data_dir: data_dir.clone(),
        total: amplitudes.len(),
        succeeded: 0,
        failed: 0,
        skipped: 0,
    };

    for (i, &amplitude) in amplitudes.iter().enumerate() {
        let class = cfg.targets.classify(amplitude);
        tracing::info!(amplitude, %class, "run {}/{}", i + 1, amplitudes.len());

        let par_file = paths::par_file_name(amplitude);
        atomic_write(&data_dir.join(&par_file), template.render(amplitude).as_bytes())?;

        let invocation = SolverInvocation {
            image: cfg.image.clone(),
            host_dir: host_dir.clone(),
            mount_point: cfg.mount_point.clone(),
            par_file,
            amplitude,
        };

        let (status, output) = match runner.run(&invocation) {
            Ok(RunOutcome::Success) => {
                tracing::info!(amplitude, "simulation complete");
                (RunStatus::Success, Some(invocation.container_out_dir()))
            }
            Ok(RunOutcome::Skipped) => (RunStatus::Skipped, None),
            Ok(RunOutcome::Failed { code, stderr_tail }) => {
                tracing::warn!(amplitude, ?code, stderr = %stderr_tail, "simulation failed");
                (RunStatus::Failed, None)
            }
            Err(e) => {
                tracing::warn!(amplitude, error = %e, "simulation failed to start");
                (RunStatus::Failed, None)
            }
        };

        match status {
            RunStatus::Success => summary.succeeded += 1,
            RunStatus::Failed => summary.failed += 1,
            RunStatus::Skipped => summary.skipped += 1,
        }
        manifest.append(&ManifestRow {
            amplitude,
            class,
            status,
            output,
        })?;

        let last = i + 1 == amplitudes.len();
        if status != RunStatus::Skipped && !last && cfg.cooldown_ms > 0 {
            std::thread::sleep(Duration::from_millis(cfg.cooldown_ms));
        }
    }

    summary.finished_at = chrono::Utc::now().to_rfc3339();
    let json = serde_json::to_string_pretty(&summary)?;
    atomic_write(&paths::summary_path(&data_dir), json.as_bytes())?;
    tracing::info!(
        succeeded = summary.succeeded,
        failed = summary.failed,
        skipped = summary.skipped,
        data_dir = %data_dir.display(),
        "sweep complete"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::read_manifest;
    use crate::solver::DryRunner;
    use crate::targets::{AmplitudeClass, AmplitudeRange, TargetSpec};
    use std::cell::RefCell;
    use std::time::Instant;
    use tempfile::TempDir;

    /// Records invocations and fails the amplitudes listed in `fail`.
    struct ScriptedRunner {
        fail: Vec<u64>,
        seen: RefCell<Vec<SolverInvocation>>,
    }

    impl ScriptedRunner {
        fn new(fail: Vec<u64>) -> Self {
            Self {
                fail,
                seen: RefCell::new(Vec::new()),
            }
        }
    }

    impl SolverRunner for ScriptedRunner {
        fn run(&self, invocation: &SolverInvocation) -> Result<RunOutcome> {
            self.seen.borrow_mut().push(invocation.clone());
            if self.fail.contains(&invocation.amplitude) {
                Ok(RunOutcome::Failed {
                    code: Some(1),
                    stderr_tail: "boom".to_string(),
                })
            } else {
                Ok(RunOutcome::Success)
            }
        }
    }

    fn setup() -> (TempDir, SweepConfig) {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("template.par"),
            "Scalar::initial_amplitude = 5.0\nIO::out_every = 8\n",
        )
        .unwrap();
        let cfg = SweepConfig {
            template: PathBuf::from("template.par"),
            data_dir: PathBuf::from("data"),
            cooldown_ms: 0,
            targets: TargetSpec {
                ranges: vec![AmplitudeRange::new(30029, 30031)],
                extra: vec![7],
                singularities: vec![30030],
            },
            ..SweepConfig::default()
        };
        (dir, cfg)
    }

    #[test]
    fn sweep_writes_par_files_and_manifest() {
        let (dir, cfg) = setup();
        let runner = ScriptedRunner::new(vec![30031]);
        let summary = run_sweep(dir.path(), &cfg, &runner).unwrap();

        assert_eq!(summary.total, 4);
        assert_eq!(summary.succeeded, 3);
        assert_eq!(summary.failed, 1);

        let par = std::fs::read_to_string(dir.path().join("data/run_A30030.par")).unwrap();
        assert!(par.contains("Scalar::initial_amplitude = 30030.0"));

        let rows = read_manifest(&dir.path().join("data/sweep_manifest.csv")).unwrap();
        let amps: Vec<u64> = rows.iter().map(|r| r.amplitude).collect();
        assert_eq!(amps, vec![7, 30029, 30030, 30031]);
        assert_eq!(rows[2].class, AmplitudeClass::PrimorialSingularity);
        assert_eq!(rows[2].output.as_deref(), Some("/data/output_A30030"));
        assert_eq!(rows[3].status, RunStatus::Failed);
        assert_eq!(rows[3].output, None);

        let seen = runner.seen.borrow();
        assert_eq!(seen.len(), 4);
        assert!(seen[0].host_dir.is_absolute());

        let saved = SweepSummary::load(&dir.path().join("data")).unwrap();
        assert_eq!(saved.failed, 1);
    }

    #[test]
    fn dry_run_records_skipped_runs() {
        let (dir, cfg) = setup();
        let summary = run_sweep(dir.path(), &cfg, &DryRunner).unwrap();
        assert_eq!(summary.skipped, 4);
        assert_eq!(summary.succeeded + summary.failed, 0);
        assert!(dir.path().join("data/run_A7.par").exists());
        let rows = read_manifest(&dir.path().join("data/sweep_manifest.csv")).unwrap();
        assert!(rows.iter().all(|r| r.status == RunStatus::Skipped));
    }

    #[test]
    fn cooldown_separates_runs_but_not_the_last() {
        let (dir, mut cfg) = setup();
        cfg.cooldown_ms = 40;
        let runner = ScriptedRunner::new(vec![30031]);
        let started = Instant::now();
        let summary = run_sweep(dir.path(), &cfg, &runner).unwrap();
        let elapsed = started.elapsed();
        assert_eq!(summary.total, 4);
        // Failed runs cool down too; three gaps between four runs.
        assert!(elapsed >= Duration::from_millis(120), "{elapsed:?}");

        cfg.cooldown_ms = 400;
        cfg.targets = TargetSpec {
            ranges: vec![],
            extra: vec![30030],
            singularities: vec![30030],
        };
        let started = Instant::now();
        run_sweep(dir.path(), &cfg, &runner).unwrap();
        assert!(started.elapsed() < Duration::from_millis(400));
    }

    #[test]
    fn dry_run_does_not_cool_down() {
        let (dir, mut cfg) = setup();
        cfg.cooldown_ms = 400;
        let started = Instant::now();
        let summary = run_sweep(dir.path(), &cfg, &DryRunner).unwrap();
        assert_eq!(summary.skipped, 4);
        assert!(started.elapsed() < Duration::from_millis(400));
    }

    #[test]
    fn missing_template_aborts_before_manifest() {
        let (dir, mut cfg) = setup();
        cfg.template = PathBuf::from("absent.par");
        let runner = ScriptedRunner::new(vec![]);
        assert!(run_sweep(dir.path(), &cfg, &runner).is_err());
        assert!(!dir.path().join("data/sweep_manifest.csv").exists());
    }
}
