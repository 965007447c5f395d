//! Flattening each agent file together with the files its commands depend on.
//!
//! Output lands in `<bundled_root>/<category>/<agent>.txt`, where the
//! category is the name of the agent directory's parent.

use crate::agent::{list_agent_files, AgentDocument};
use crate::diagnostics::FileWarning;
use crate::error::Result;
use crate::io;
use serde::Serialize;
use std::path::{Path, PathBuf};

const SECTION_SEPARATOR: &str = "\n\n";

#[derive(Debug, Default, Clone, Serialize)]
pub struct BundleReport {
    /// Bundle files written, in processing order.
    pub bundles: Vec<PathBuf>,
    pub warnings: Vec<FileWarning>,
}

/// Read a dependency, resolving `rel` against the category root first and
/// the agent directory second.
fn read_dependency(category_root: &Path, agent_dir: &Path, rel: &str) -> std::io::Result<String> {
    match std::fs::read_to_string(category_root.join(rel)) {
        Ok(content) => Ok(content),
        Err(primary) => std::fs::read_to_string(agent_dir.join(rel)).map_err(|_| primary),
    }
}

/// Build the bundle text for one agent document. Missing dependencies are
/// recorded in `warnings` and left out.
pub fn render_bundle(
    doc: &AgentDocument,
    category_root: &Path,
    agent_dir: &Path,
    warnings: &mut Vec<FileWarning>,
) -> String {
    let mut parts = vec![
        format!("# Agent file: {}", doc.file_name()),
        doc.content.trim_end().to_string(),
    ];

    if let Some(config) = &doc.config {
        for rel in config.dependencies().iter() {
            match read_dependency(category_root, agent_dir, rel) {
                Ok(content) => {
                    parts.push(format!("# Dependency: {rel}\n\n{}", content.trim_end()));
                }
                Err(e) => {
                    tracing::warn!(agent = %doc.path.display(), dependency = rel, error = %e, "dependency not bundled");
                    warnings.push(FileWarning::new(
                        &doc.path,
                        format!("failed to include dependency {rel}: {e}"),
                    ));
                }
            }
        }
    }

    parts.join(SECTION_SEPARATOR)
}

/// Write one bundle per agent file found in `agent_dirs`.
///
/// A missing agent directory is skipped; an unreadable agent file or a
/// missing dependency becomes a warning. Only failing to write a bundle is
/// an error.
pub fn bundle_agents(agent_dirs: &[PathBuf], bundled_root: &Path) -> Result<BundleReport> {
    let mut report = BundleReport::default();

    for agent_dir in agent_dirs {
        if !agent_dir.is_dir() {
            continue;
        }
        let category_root = agent_dir.parent().unwrap_or(agent_dir.as_path());
        let category = category_root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let output_dir = bundled_root.join(&category);
        io::ensure_dir(&output_dir)?;

        for file in list_agent_files(agent_dir)? {
            let doc = match AgentDocument::read(&file) {
                Ok(doc) => doc,
                Err(e) => {
                    report
                        .warnings
                        .push(FileWarning::new(&file, format!("failed to read agent: {e}")));
                    continue;
                }
            };
            if let Some(w) = &doc.warning {
                report.warnings.push(w.clone());
            }

            let text = render_bundle(&doc, category_root, agent_dir, &mut report.warnings);
            let output = output_dir.join(format!("{}.txt", doc.name()));
            io::atomic_write(&output, text.as_bytes())?;
            tracing::debug!(agent = %file.display(), output = %output.display(), "bundled");
            report.bundles.push(output);
        }
    }

    Ok(report)
}
