#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn resonance(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("resonance").unwrap();
    cmd.current_dir(dir.path())
        .env("RESONANCE_ROOT", dir.path())
        .env_remove("RUST_LOG");
    cmd
}

fn json_output(cmd: &mut Command) -> Value {
    let out = cmd.arg("--json").assert().success().get_output().stdout.clone();
    serde_json::from_slice(&out).unwrap()
}

const TEMPLATE: &str = "\
ActiveThorns = \"PrimeResonance CarpetIOASCII\"
PrimeResonance::initial_amplitude = 5.0
IO::out_every = 16
";

fn write_project(dir: &TempDir, runtime: &str) {
    std::fs::write(dir.path().join("template.par"), TEMPLATE).unwrap();
    std::fs::write(
        dir.path().join("resonance.yaml"),
        format!(
            "sweep:\n  runtime: {runtime}\n  template: template.par\n  cooldown_ms: 0\n  \
             targets:\n    ranges:\n      - start: 30029\n        end: 30031\n    extra: []\n"
        ),
    )
    .unwrap();
}

/// A stand-in container runtime: writes one IOASCII phi file per run and
/// crashes on A=30031.
#[cfg(unix)]
fn fake_runtime(dir: &Path) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("fake-docker");
    std::fs::write(
        &path,
        r##"#!/bin/sh
host="${4%%:*}"
out="${7#IO::out_dir=/data/}"
case "$6" in
  *A30031*) echo "simulated crash" >&2; exit 1 ;;
esac
mkdir -p "$host/$out"
echo "# it tl rl c ml ix iy iz time x y z phi" > "$host/$out/phi.x.asc"
echo "0 0 0 0 0 0 0 0 0.0 0.0 0.0 0.0 3.0" >> "$host/$out/phi.x.asc"
"##,
    )
    .unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

// ---------------------------------------------------------------------------
// init / config
// ---------------------------------------------------------------------------

#[test]
fn init_writes_config_and_data_dir() {
    let dir = TempDir::new().unwrap();
    resonance(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote"));
    assert!(dir.path().join("resonance.yaml").is_file());
    assert!(dir.path().join("singularity_data").is_dir());

    resonance(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn config_validate_warns_about_missing_template() {
    let dir = TempDir::new().unwrap();
    resonance(&dir)
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[warning]"))
        .stdout(predicate::str::contains("does not exist"));
}

#[test]
fn config_validate_fails_on_errors() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("resonance.yaml"), "zeta:\n  step: 0.0\n").unwrap();
    resonance(&dir)
        .args(["config", "validate"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("zeta.step"))
        .stderr(predicate::str::contains("config validation found errors"));
}

#[test]
fn config_show_json_has_defaults() {
    let dir = TempDir::new().unwrap();
    let v = json_output(resonance(&dir).args(["config", "show"]));
    assert_eq!(v["sweep"]["image"], "primeresonance-et:v1");
    assert_eq!(v["zeta"]["step"], 0.05);
}

// ---------------------------------------------------------------------------
// targets
// ---------------------------------------------------------------------------

#[test]
fn targets_lists_default_sweep() {
    let dir = TempDir::new().unwrap();
    let v = json_output(resonance(&dir).arg("targets"));
    let rows = v.as_array().unwrap();
    assert_eq!(rows.len(), 73);
    let singular = rows.iter().find(|r| r["amplitude"] == 30030).unwrap();
    assert_eq!(singular["class"], "PRIMORIAL_SINGULARITY");
    let prime = rows.iter().find(|r| r["amplitude"] == 30029).unwrap();
    assert_eq!(prime["class"], "PRIME");
}

#[test]
fn targets_table_output() {
    let dir = TempDir::new().unwrap();
    resonance(&dir)
        .arg("targets")
        .assert()
        .success()
        .stdout(predicate::str::contains("AMPLITUDE"))
        .stdout(predicate::str::contains("PRIMORIAL_SINGULARITY"))
        .stdout(predicate::str::contains("73 targets"));
}

// ---------------------------------------------------------------------------
// sweep / analyze
// ---------------------------------------------------------------------------

#[test]
fn sweep_dry_run_needs_no_runtime() {
    let dir = TempDir::new().unwrap();
    write_project(&dir, "no-such-container-runtime");
    let v = json_output(resonance(&dir).args(["sweep", "--dry-run"]));
    assert_eq!(v["total"], 3);
    assert_eq!(v["skipped"], 3);

    let par = std::fs::read_to_string(dir.path().join("singularity_data/run_A30031.par")).unwrap();
    assert!(par.contains("PrimeResonance::initial_amplitude = 30031.0"));
    let manifest =
        std::fs::read_to_string(dir.path().join("singularity_data/sweep_manifest.csv")).unwrap();
    assert!(manifest.starts_with("Amplitude,Type,Status,OutputFile\n"));
    assert!(manifest.contains("30030,PRIMORIAL_SINGULARITY,SKIPPED,N/A"));
}

#[test]
fn sweep_without_runtime_fails() {
    let dir = TempDir::new().unwrap();
    write_project(&dir, "no-such-container-runtime");
    resonance(&dir)
        .arg("sweep")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found on PATH"));
}

#[test]
fn sweep_with_missing_template_fails() {
    let dir = TempDir::new().unwrap();
    resonance(&dir)
        .args(["sweep", "--dry-run", "--template", "missing.par"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("parameter template not found"));
}

#[cfg(unix)]
#[test]
fn sweep_then_analyze() {
    let dir = TempDir::new().unwrap();
    let runtime = fake_runtime(dir.path());
    write_project(&dir, runtime.to_str().unwrap());

    let summary = json_output(resonance(&dir).arg("sweep"));
    assert_eq!(summary["succeeded"], 2);
    assert_eq!(summary["failed"], 1);

    let manifest =
        std::fs::read_to_string(dir.path().join("singularity_data/sweep_manifest.csv")).unwrap();
    assert!(manifest.contains("30029,PRIME,SUCCESS,/data/output_A30029"));
    assert!(manifest.contains("30031,COMPOSITE,FAILED,N/A"));
    assert!(dir.path().join("singularity_data/sweep_summary.json").is_file());

    let report = json_output(resonance(&dir).args(["analyze", "--no-plot", "--csv", "energy.csv"]));
    let runs = report["runs"].as_array().unwrap();
    assert_eq!(runs.len(), 3);
    assert_eq!(runs[0]["energy"], 9.0);
    assert_eq!(runs[1]["class"], "PRIMORIAL_SINGULARITY");
    assert_eq!(runs[2]["energy"], 0.0);
    assert!(report["chart"].is_null());

    let csv = std::fs::read_to_string(dir.path().join("energy.csv")).unwrap();
    assert!(csv.contains("30030,PRIMORIAL_SINGULARITY,SUCCESS,/data/output_A30030,9"));
}

#[test]
fn analyze_draws_triad_chart() {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("singularity_data");
    std::fs::create_dir_all(&data).unwrap();
    std::fs::write(
        data.join("sweep_manifest.csv"),
        "Amplitude,Type,Status,OutputFile\n\
         30029,PRIME,SUCCESS,/data/output_A30029\n\
         30030,PRIMORIAL_SINGULARITY,FAILED,N/A\n\
         not-a-row\n",
    )
    .unwrap();

    resonance(&dir)
        .args(["analyze", "--plot", "charts/triad.png"])
        .assert()
        .success()
        .stdout(predicate::str::contains("PRIMORIAL_SINGULARITY"))
        .stdout(predicate::str::contains("Triad window 30020..=30040: 2 runs"));
    assert!(dir.path().join("charts/triad.png").is_file());
}

#[test]
fn analyze_without_manifest_fails() {
    let dir = TempDir::new().unwrap();
    resonance(&dir)
        .arg("analyze")
        .assert()
        .failure()
        .stderr(predicate::str::contains("manifest not found"));
}

// ---------------------------------------------------------------------------
// inspect
// ---------------------------------------------------------------------------

#[test]
fn inspect_reports_field_stats() {
    let dir = TempDir::new().unwrap();
    let run = dir.path().join("singularity_data/output_A30030");
    std::fs::create_dir_all(&run).unwrap();
    std::fs::write(
        run.join("phi_3D_diagonal.xg"),
        "\"Time = 0\n-1.0 0.5\n0.0 2.0\n1.0 -1.0\n",
    )
    .unwrap();

    resonance(&dir)
        .arg("inspect")
        .assert()
        .success()
        .stdout(predicate::str::contains("Loaded 3 data points"))
        .stdout(predicate::str::contains("Mean Energy Density: 1.750000e0"))
        .stdout(predicate::str::contains("Max phi: 2.000000e0"));
    assert!(dir.path().join("Singularity_30030_Diagnostics.png").is_file());
}

#[test]
fn inspect_missing_run_fails() {
    let dir = TempDir::new().unwrap();
    resonance(&dir)
        .args(["inspect", "--amplitude", "42", "--no-plot"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot inspect run A=42"));
}

// ---------------------------------------------------------------------------
// zeta
// ---------------------------------------------------------------------------

#[test]
fn zeta_reports_triad_proximity() {
    let dir = TempDir::new().unwrap();
    let v = json_output(resonance(&dir).args(["zeta", "--no-plot"]));
    let zeros = v["report"]["zeros"].as_array().unwrap();
    assert_eq!(zeros.len(), 5);
    let verdicts: Vec<&str> = v["report"]["proximity"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["verdict"].as_str().unwrap())
        .collect();
    assert_eq!(verdicts, vec!["MISS", "NEAR MISS", "NEAR MISS"]);
    assert_eq!(v["report"]["approximate_index"].as_f64().unwrap() as u64, 35713);
}

#[test]
fn zeta_table_and_map() {
    let dir = TempDir::new().unwrap();
    resonance(&dir)
        .args(["zeta", "--target", "30030", "--plot", "zeta.png"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total zeros found: 5"))
        .stdout(predicate::str::contains("30030.0534"))
        .stdout(predicate::str::contains("NEAR MISS"))
        .stdout(predicate::str::contains("zero #35713"));
    assert!(dir.path().join("zeta.png").is_file());
}

#[test]
fn zeta_rejects_inverted_range() {
    let dir = TempDir::new().unwrap();
    resonance(&dir)
        .args(["zeta", "--start", "30033", "--end", "30028", "--no-plot"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid scan range"));
}
