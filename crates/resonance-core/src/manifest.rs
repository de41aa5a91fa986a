use crate::error::{ResonanceError, Result};
use crate::targets::AmplitudeClass;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub const HEADER: &str = "Amplitude,Type,Status,OutputFile";
const NO_OUTPUT: &str = "N/A";

// ---------------------------------------------------------------------------
// RunStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunStatus {
    Success,
    Failed,
    /// Parameter file written, solver not invoked (dry run).
    Skipped,
}

impl RunStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RunStatus::Success => "SUCCESS",
            RunStatus::Failed => "FAILED",
            RunStatus::Skipped => "SKIPPED",
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RunStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "SUCCESS" => Ok(RunStatus::Success),
            "FAILED" => Ok(RunStatus::Failed),
            "SKIPPED" => Ok(RunStatus::Skipped),
            other => Err(format!("unknown run status: {other}")),
        }
    }
}

// ---------------------------------------------------------------------------
// ManifestRow
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestRow {
    pub amplitude: u64,
    pub class: AmplitudeClass,
    pub status: RunStatus,
    /// Container-side output directory; `None` for failed runs.
    pub output: Option<String>,
}

impl ManifestRow {
    pub fn to_csv_line(&self) -> String {
        format!(
            "{},{},{},{}",
            self.amplitude,
            self.class,
            self.status,
            self.output.as_deref().unwrap_or(NO_OUTPUT)
        )
    }
}

// ---------------------------------------------------------------------------
// Writer
// ---------------------------------------------------------------------------

/// Streams rows to the manifest, flushing after each so a crashed sweep
/// still leaves every completed run on disk.
pub struct ManifestWriter {
    out: BufWriter<File>,
}

impl ManifestWriter {
    pub fn create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut out = BufWriter::new(File::create(path)?);
        writeln!(out, "{HEADER}")?;
        out.flush()?;
        Ok(Self { out })
    }

    pub fn append(&mut self, row: &ManifestRow) -> Result<()> {
        writeln!(self.out, "{}", row.to_csv_line())?;
        self.out.flush()?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Reader
// ---------------------------------------------------------------------------

struct Columns {
    amplitude: usize,
    class: usize,
    status: usize,
    output: Option<usize>,
}

impl Columns {
    fn from_header(line: &str) -> Option<Self> {
        let names: Vec<&str> = line.split(',').map(str::trim).collect();
        let find = |name: &str| names.iter().position(|n| *n == name);
        Some(Self {
            amplitude: find("Amplitude")?,
            class: find("Type")?,
            status: find("Status")?,
            output: find("OutputFile"),
        })
    }
}

/// Parse manifest text. Malformed data rows are skipped.
pub fn parse_manifest(text: &str, source: &str) -> Result<Vec<ManifestRow>> {
    let mut lines = text.lines().enumerate();
    let columns = lines
        .by_ref()
        .find(|(_, l)| !l.trim().is_empty())
        .and_then(|(_, l)| Columns::from_header(l.trim_start_matches('\u{feff}')))
        .ok_or_else(|| ResonanceError::ManifestHeader(source.to_string()))?;

    let mut rows = Vec::new();
    for (idx, line) in lines {
        if line.trim().is_empty() {
            continue;
        }
        match parse_row(line, &columns) {
            Some(row) => rows.push(row),
            None => tracing::debug!(line = idx + 1, source, "skipping malformed manifest row"),
        }
    }
    Ok(rows)
}

fn parse_row(line: &str, columns: &Columns) -> Option<ManifestRow> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    let amplitude = fields.get(columns.amplitude)?.parse().ok()?;
    let class = fields.get(columns.class)?.parse().ok()?;
    let status = fields.get(columns.status)?.parse().ok()?;
    let output = columns
        .output
        .and_then(|i| fields.get(i))
        .filter(|v| !v.is_empty() && **v != NO_OUTPUT)
        .map(|v| v.to_string());
    Some(ManifestRow {
        amplitude,
        class,
        status,
        output,
    })
}

pub fn read_manifest(path: &Path) -> Result<Vec<ManifestRow>> {
    if !path.is_file() {
        return Err(ResonanceError::ManifestNotFound(path.display().to_string()));
    }
    let text = std::fs::read_to_string(path)?;
    parse_manifest(&text, &path.display().to_string())
}
