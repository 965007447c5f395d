//! Laying down installed files in a workspace: the core template
//! directories, the docs tree and the cheat sheet.

use crate::config::BmadConfig;
use crate::error::{BmadError, Result};
use crate::io;
use crate::paths::{self, PackageLayout};
use std::path::{Path, PathBuf};

/// Copy `engineering/` and `planning/` from `core_dir` into `base_dir`,
/// overwriting files that already exist.
pub fn copy_core_directories(core_dir: &Path, base_dir: &Path) -> Result<()> {
    for category in paths::CATEGORIES {
        let source = core_dir.join(category);
        if !source.is_dir() {
            return Err(BmadError::MissingTemplate(source));
        }
        io::copy_directory(&source, &base_dir.join(category), &[])?;
    }
    Ok(())
}

/// What [`replace_category`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Replacement {
    Updated,
    Installed,
    Skipped,
}

/// Swap an installed category directory for a fresh copy from `core_dir`.
///
/// An absent destination is installed when `install_if_missing` is set and
/// skipped otherwise.
pub fn replace_category(
    core_dir: &Path,
    base_dir: &Path,
    category: &str,
    install_if_missing: bool,
) -> Result<Replacement> {
    let source = core_dir.join(category);
    let dest = base_dir.join(category);

    let outcome = if dest.exists() {
        Replacement::Updated
    } else if install_if_missing {
        Replacement::Installed
    } else {
        return Ok(Replacement::Skipped);
    };

    if !source.is_dir() {
        return Err(BmadError::MissingTemplate(source));
    }
    io::remove_dir_if_exists(&dest)?;
    io::copy_directory(&source, &dest, &[])?;
    Ok(outcome)
}

/// Create `<cwd>/<docs.dir>` and every `docs.subdirs` directory under it.
pub fn ensure_docs_structure(cwd: &Path, config: &BmadConfig) -> Result<()> {
    let docs = cwd.join(config.docs_dir());
    io::ensure_dir(&docs)?;
    for (_, subdir) in config.docs_subdirs() {
        io::ensure_dir(&docs.join(subdir))?;
    }
    Ok(())
}

/// Copy the packaged cheat sheet to `<cwd>/<docs.dir>/cheat-sheet.md`.
///
/// Returns the destination, or `None` when the package has no cheat sheet.
pub fn copy_cheat_sheet_to_workspace(
    layout: &PackageLayout,
    cwd: &Path,
    config: &BmadConfig,
) -> Result<Option<PathBuf>> {
    let source = layout.cheat_sheet();
    if !source.is_file() {
        tracing::debug!(path = %source.display(), "no packaged cheat sheet");
        return Ok(None);
    }
    let dest = paths::workspace_cheat_sheet(cwd, config.docs_dir());
    let content = std::fs::read(&source)?;
    io::atomic_write(&dest, &content)?;
    Ok(Some(dest))
}
