//! Pre-update snapshot of the installed base directory.

use crate::error::{BmadError, Result};
use crate::io;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

pub const BACKUP_PREFIX: &str = "bmad-backup-";

/// Version-control metadata is never copied into a backup.
const BACKUP_EXCLUDES: [&str; 1] = [r"^\.git$"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backup {
    /// The directory that was copied.
    pub source: PathBuf,
    pub path: PathBuf,
}

/// `<parent of base_dir>/bmad-backup-<YYYYmmdd-HHMMSS>`.
pub fn backup_path(base_dir: &Path, at: DateTime<Utc>) -> PathBuf {
    let name = format!("{BACKUP_PREFIX}{}", at.format("%Y%m%d-%H%M%S"));
    base_dir
        .parent()
        .map(|p| p.join(&name))
        .unwrap_or_else(|| PathBuf::from(name))
}

/// `candidate`, or `candidate-1`, `candidate-2`, ... when it is taken.
fn unused_path(candidate: PathBuf) -> PathBuf {
    if !candidate.exists() {
        return candidate;
    }
    let name = candidate
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut n = 1u32;
    loop {
        let next = candidate.with_file_name(format!("{name}-{n}"));
        if !next.exists() {
            return next;
        }
        n += 1;
    }
}

/// Copy `base_dir` to a fresh sibling backup directory. An existing backup
/// is never written into.
pub fn create_backup(base_dir: &Path) -> Result<Backup> {
    create_backup_at(base_dir, Utc::now())
}

pub fn create_backup_at(base_dir: &Path, at: DateTime<Utc>) -> Result<Backup> {
    if !base_dir.is_dir() {
        return Err(BmadError::NotInstalled);
    }
    let path = unused_path(backup_path(base_dir, at));
    io::copy_directory(base_dir, &path, &BACKUP_EXCLUDES)?;
    tracing::debug!(backup = %path.display(), "created backup");
    Ok(Backup {
        source: base_dir.to_path_buf(),
        path,
    })
}

impl Backup {
    /// Put the snapshot back in place of the source directory.
    ///
    /// Files excluded from the backup (`.git`) are left as they are.
    pub fn restore(&self) -> Result<()> {
        if self.source.is_dir() {
            for entry in std::fs::read_dir(&self.source)? {
                let entry = entry?;
                if entry.file_name() == ".git" {
                    continue;
                }
                let path = entry.path();
                if entry.file_type()?.is_dir() {
                    std::fs::remove_dir_all(&path)?;
                } else {
                    std::fs::remove_file(&path)?;
                }
            }
        }
        io::copy_directory(&self.path, &self.source, &[])
    }
}
