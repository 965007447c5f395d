use std::path::{Path, PathBuf};

/// Resolve the workspace directory: `--root` / `BMAD_ROOT` when given,
/// otherwise the current directory.
pub fn resolve_root(explicit: Option<&Path>) -> PathBuf {
    match explicit {
        Some(p) => p.to_path_buf(),
        None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}
