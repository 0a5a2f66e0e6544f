//! Snapshot persistence.
//!
//! Writes the day's snapshot twice: a gzip-compressed JSON archive at
//! `{out}/{YYYY}/{MM}/{YYYY-MM-DD}.json.gz` (immutable once written), and
//! an uncompressed, pretty-printed `latest.json` at the output root that
//! every run overwrites. Non-ASCII text is stored as-is, never escaped.

pub mod retention;

use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::types::{DailySnapshot, SnapError};

/// Archive file extension.
pub const ARCHIVE_EXT: &str = "json.gz";

/// The always-overwritten convenience copy at the output root.
pub const LATEST_FILE: &str = "latest.json";

/// Persist a snapshot and return the archive path.
///
/// The archive is written first, `latest.json` second; a failure at either
/// step aborts the run as an explicit error. `latest.json` failing after a
/// successful archive write is reported as such rather than ignored, so the
/// pair is never silently inconsistent.
pub fn save_snapshot(snapshot: &DailySnapshot, out_dir: &Path) -> Result<PathBuf> {
    let dir_ym = out_dir
        .join(snapshot.date.format("%Y").to_string())
        .join(snapshot.date.format("%m").to_string());
    fs::create_dir_all(&dir_ym)
        .with_context(|| format!("Failed to create {}", dir_ym.display()))?;

    let archive_path = dir_ym.join(format!("{}.{ARCHIVE_EXT}", snapshot.date));
    let json = serde_json::to_vec(snapshot).context("Failed to serialise snapshot")?;

    let file = File::create(&archive_path)
        .with_context(|| format!("Failed to create {}", archive_path.display()))?;
    let mut gz = GzEncoder::new(file, Compression::default());
    gz.write_all(&json)
        .with_context(|| format!("Failed to write {}", archive_path.display()))?;
    gz.finish()
        .with_context(|| format!("Failed to finish {}", archive_path.display()))?;
    debug!(path = %archive_path.display(), bytes = json.len(), "Archive written");

    let latest_path = out_dir.join(LATEST_FILE);
    let pretty = serde_json::to_vec_pretty(snapshot).context("Failed to serialise snapshot")?;
    fs::write(&latest_path, &pretty).map_err(|e| {
        SnapError::Persistence(format!(
            "archive written but {} failed: {e}",
            latest_path.display()
        ))
    })?;

    info!(
        archive = %archive_path.display(),
        latest = %latest_path.display(),
        count = snapshot.count,
        "Snapshot saved"
    );
    Ok(archive_path)
}

/// Read an archived snapshot back.
pub fn load_snapshot(path: &Path) -> Result<DailySnapshot> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let mut gz = GzDecoder::new(file);
    let mut buf = String::new();
    gz.read_to_string(&mut buf)
        .with_context(|| format!("Failed to decompress {}", path.display()))?;
    serde_json::from_str(&buf).with_context(|| format!("Failed to parse {}", path.display()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
