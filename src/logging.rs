//! JSON line-delimited training logs.
//!
//! One JSON object per line, appended to files under the configured log
//! directory. Nothing here is required by the core loop; callers that want
//! a persistent record of rounds or emitted artifacts opt in per event.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

fn append_json_line<P: AsRef<Path>, T: Serialize>(path: P, value: &T) -> io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    serde_json::to_writer(&mut file, value)
        .map_err(|err| io::Error::new(io::ErrorKind::Other, err))?;
    file.write_all(b"\n")
}

fn timestamp_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis()
}

#[derive(Debug, Serialize)]
pub struct RoundLogEntry {
    pub round: usize,
    pub ensemble_size: usize,
    pub mean_output: f32,
    pub timestamp_ms: u128,
}

/// Append one boosting-round record to `<dir>/rounds.jsonl`.
pub fn log_round<P: AsRef<Path>>(
    dir: P,
    round: usize,
    ensemble_size: usize,
    outputs: &[f32],
) -> io::Result<()> {
    fs::create_dir_all(&dir)?;
    let mean_output = if outputs.is_empty() {
        0.0
    } else {
        outputs.iter().sum::<f32>() / outputs.len() as f32
    };
    let entry = RoundLogEntry {
        round,
        ensemble_size,
        mean_output,
        timestamp_ms: timestamp_ms(),
    };
    append_json_line(dir.as_ref().join("rounds.jsonl"), &entry)
}

#[derive(Debug, Serialize)]
pub struct ArtifactLogEntry {
    pub path: String,
    pub binary_bytes: usize,
    pub stages: usize,
    pub timestamp_ms: u128,
}

/// Append one serialized-artifact record to `<dir>/artifacts.jsonl`.
pub fn log_artifact<P: AsRef<Path>>(
    dir: P,
    artifact_path: &Path,
    binary_bytes: usize,
    stages: usize,
) -> io::Result<()> {
    fs::create_dir_all(&dir)?;
    let entry = ArtifactLogEntry {
        path: artifact_path.display().to_string(),
        binary_bytes,
        stages,
        timestamp_ms: timestamp_ms(),
    };
    append_json_line(dir.as_ref().join("artifacts.jsonl"), &entry)
}
