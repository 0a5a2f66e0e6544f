//! Archive retention pruning.
//!
//! Walks the output tree and deletes archive files whose modification time
//! has fallen outside the retention window. Only `*.json.gz` files are
//! candidates; `latest.json` is exempt by name wherever it sits. A single
//! file failing to stat or unlink is warned about and skipped — it never
//! aborts the scan.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing::{debug, warn};

use super::{ARCHIVE_EXT, LATEST_FILE};

/// Delete archives older than `retention_days`. Returns the successfully
/// removed paths. A retention of zero or below disables pruning entirely
/// (no scan is performed). Re-running with no new files removes nothing.
pub fn prune_old_archives(out_dir: &Path, retention_days: i64) -> Vec<PathBuf> {
    let mut removed = Vec::new();
    if retention_days <= 0 {
        return removed;
    }

    let cutoff = SystemTime::now() - Duration::from_secs(retention_days as u64 * 86_400);
    prune_dir(out_dir, cutoff, &mut removed);
    debug!(out_dir = %out_dir.display(), removed = removed.len(), "Retention pass complete");
    removed
}

fn prune_dir(dir: &Path, cutoff: SystemTime, removed: &mut Vec<PathBuf>) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "Failed to scan directory, skipping");
            return;
        }
    };

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "Unreadable directory entry, skipping");
                continue;
            }
        };
        let path = entry.path();

        if path.is_dir() {
            prune_dir(&path, cutoff, removed);
            continue;
        }

        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if name == LATEST_FILE {
            continue;
        }
        // Only archives are ours to delete; other artifacts stay.
        if !name.ends_with(&format!(".{ARCHIVE_EXT}")) {
            continue;
        }

        match remove_if_expired(&path, cutoff) {
            Ok(true) => removed.push(path),
            Ok(false) => {}
            Err(e) => warn!(path = %path.display(), error = %e, "Failed to remove archive, skipping"),
        }
    }
}

fn remove_if_expired(path: &Path, cutoff: SystemTime) -> std::io::Result<bool> {
    let modified = fs::metadata(path)?.modified()?;
    if modified < cutoff {
        fs::remove_file(path)?;
        Ok(true)
    } else {
        Ok(false)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
