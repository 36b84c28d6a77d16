use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, Local};
use std::fs;
use walkdir::WalkDir;

/// Snapshot folder name, sortable by time
pub const BACKUP_NAME_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Copy `source` into a timestamped folder under `backup_root` and prune old
/// snapshots.
///
/// Nothing is copied when `source` does not exist yet (first run). Returns
/// the new snapshot path, if one was created.
pub fn create_backup(
    source: &Utf8Path,
    backup_root: &Utf8Path,
    retain: usize,
    now: DateTime<Local>,
) -> Result<Option<Utf8PathBuf>> {
    fs::create_dir_all(backup_root)
        .with_context(|| format!("Failed to create backup directory: {}", backup_root))?;

    if !source.exists() {
        tracing::info!("Nothing to back up, {} does not exist yet", source);
        return Ok(None);
    }

    let target = backup_root.join(now.format(BACKUP_NAME_FORMAT).to_string());
    if target.exists() {
        tracing::warn!("Backup {} already exists, skipping snapshot", target);
        return Ok(None);
    }

    copy_tree(source, &target)?;
    tracing::info!("Backup created at: {}", target);

    let removed = prune_backups(backup_root, retain)?;
    if !removed.is_empty() {
        tracing::info!("Removed {} old backup(s)", removed.len());
    }

    Ok(Some(target))
}

/// Delete all but the `retain` newest snapshots.
///
/// Snapshot names sort chronologically, so the newest are the last ones.
pub fn prune_backups(backup_root: &Utf8Path, retain: usize) -> Result<Vec<Utf8PathBuf>> {
    let mut snapshots = Vec::new();
    for entry in backup_root
        .read_dir_utf8()
        .with_context(|| format!("Failed to list backups: {}", backup_root))?
    {
        let entry = entry.with_context(|| format!("Failed to list backups: {}", backup_root))?;
        if entry.path().is_dir() {
            snapshots.push(entry.path().to_path_buf());
        }
    }
    snapshots.sort();

    let excess = snapshots.len().saturating_sub(retain);
    let removed: Vec<Utf8PathBuf> = snapshots.into_iter().take(excess).collect();
    for old in &removed {
        fs::remove_dir_all(old).with_context(|| format!("Failed to remove backup: {}", old))?;
        tracing::debug!("Removed old backup: {}", old);
    }

    Ok(removed)
}

fn copy_tree(source: &Utf8Path, target: &Utf8Path) -> Result<()> {
    for entry in WalkDir::new(source) {
        let entry = entry.with_context(|| format!("Failed to walk {}", source))?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .with_context(|| format!("Unexpected path outside {}", source))?;
        let destination = target.as_std_path().join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&destination)
                .with_context(|| format!("Failed to create {}", destination.display()))?;
        } else {
            fs::copy(entry.path(), &destination)
                .with_context(|| format!("Failed to copy {}", entry.path().display()))?;
        }
    }
    Ok(())
}
