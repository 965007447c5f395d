//! In-place minification of the marked JSON block in installed agent files.

use crate::agent::list_agent_files;
use crate::diagnostics::FileWarning;
use crate::error::{BmadError, Result};
use crate::extract::locate_json_block;
use crate::io;
use crate::paths::{self, INSTRUCTIONS_MARKER};
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Default)]
pub struct CompressionOutcome {
    pub changed: bool,
    pub error: Option<BmadError>,
}

#[derive(Debug, Default, Clone, Serialize)]
pub struct CompressionStats {
    pub processed: usize,
    pub modified: usize,
    pub errors: usize,
    pub warnings: Vec<FileWarning>,
}

/// Return the rewritten text, or `None` when there is nothing to rewrite.
fn compress_text(content: &str) -> Result<Option<String>> {
    let Some(block) = locate_json_block(content, Some(INSTRUCTIONS_MARKER)) else {
        return Ok(None);
    };
    let value = block.parse()?;
    let minified = serde_json::to_string(&value)?;
    let rewritten = block.splice(content, &minified);
    if rewritten == content {
        return Ok(None);
    }
    Ok(Some(rewritten))
}

fn try_compress(path: &Path) -> Result<bool> {
    let content = std::fs::read_to_string(path)?;
    match compress_text(&content)? {
        Some(rewritten) => {
            io::atomic_write(path, rewritten.as_bytes())?;
            Ok(true)
        }
        None => Ok(false),
    }
}

/// Minify the JSON block that follows the instructions marker in `path`.
///
/// Files without the marker, or whose block is already minified, are left
/// untouched. Failures are reported in the outcome, never returned.
pub fn compress_file(path: &Path) -> CompressionOutcome {
    match try_compress(path) {
        Ok(changed) => CompressionOutcome {
            changed,
            error: None,
        },
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to compress agent config");
            CompressionOutcome {
                changed: false,
                error: Some(e),
            }
        }
    }
}

/// Compress every `.md` file in `<root>/engineering/agents` and
/// `<root>/planning/agents`. Missing directories are skipped.
pub fn compress_tree(root: &Path) -> CompressionStats {
    let mut stats = CompressionStats::default();

    for agent_dir in paths::agent_dirs(root) {
        let files = match list_agent_files(&agent_dir) {
            Ok(files) => files,
            Err(e) => {
                stats.errors += 1;
                stats.warnings.push(FileWarning::new(
                    &agent_dir,
                    format!("failed to process directory: {e}"),
                ));
                continue;
            }
        };

        for file in files {
            stats.processed += 1;
            let outcome = compress_file(&file);
            tracing::debug!(path = %file.display(), changed = outcome.changed, "compressed");
            if let Some(e) = outcome.error {
                stats.errors += 1;
                stats.warnings.push(FileWarning::new(&file, e.to_string()));
            }
            if outcome.changed {
                stats.modified += 1;
            }
        }
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn agent(body: &str) -> String {
        format!("# Dev agent\n\nIntro text.\n\n{INSTRUCTIONS_MARKER}\n\n```json\n{body}\n```\n\nOutro.\n")
    }

    #[test]
    fn minifies_marked_block_and_keeps_surroundings() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dev.md");
        std::fs::write(&path, agent("{\n  \"b\": 1,\n  \"a\": [1, 2]\n}")).unwrap();

        let outcome = compress_file(&path);
        assert!(outcome.changed);
        assert!(outcome.error.is_none());
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, agent("{\"b\":1,\"a\":[1,2]}"));
    }

    #[test]
    fn compression_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dev.md");
        std::fs::write(&path, agent("{ \"x\": { \"y\": true } }")).unwrap();

        assert!(compress_file(&path).changed);
        let first = std::fs::read(&path).unwrap();
        let second_outcome = compress_file(&path);
        assert!(!second_outcome.changed);
        assert_eq!(std::fs::read(&path).unwrap(), first);
    }

    #[test]
    fn file_without_marker_is_untouched() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pm.md");
        let original = "# PM\n```json\n{ \"a\": 1 }\n```\n";
        std::fs::write(&path, original).unwrap();
        let outcome = compress_file(&path);
        assert!(!outcome.changed);
        assert!(outcome.error.is_none());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn malformed_json_reports_error_and_leaves_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.md");
        let original = agent("{ broken");
        std::fs::write(&path, &original).unwrap();
        let outcome = compress_file(&path);
        assert!(!outcome.changed);
        assert!(outcome.error.is_some());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn tree_counts_processed_modified_and_errors() {
        let dir = TempDir::new().unwrap();
        let eng = dir.path().join("engineering/agents");
        std::fs::create_dir_all(&eng).unwrap();
        std::fs::write(eng.join("dev.md"), agent("{ \"a\": 1 }")).unwrap();
        std::fs::write(eng.join("qa.md"), agent("{ nope")).unwrap();
        std::fs::write(eng.join("plain.md"), "# nothing").unwrap();
        std::fs::write(eng.join("notes.txt"), agent("{ \"a\": 1 }")).unwrap();
        // planning/agents intentionally missing

        let stats = compress_tree(dir.path());
        assert_eq!(stats.processed, 3);
        assert_eq!(stats.modified, 1);
        assert_eq!(stats.errors, 1);
        assert_eq!(stats.warnings.len(), 1);
        assert!(stats.warnings[0].path.ends_with("qa.md"));
        // non-markdown file untouched
        assert_eq!(
            std::fs::read_to_string(eng.join("notes.txt")).unwrap(),
            agent("{ \"a\": 1 }")
        );
    }
}
