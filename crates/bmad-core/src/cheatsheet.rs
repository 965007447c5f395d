//! Rendering a Markdown summary of every agent's persona and commands.

use crate::agent::{list_agent_files, AgentConfig, AgentDocument};
use crate::diagnostics::FileWarning;
use crate::error::Result;
use crate::io;
use std::path::{Path, PathBuf};

const SECTION_SEPARATOR: &str = "\n\n---\n\n";

/// Render the section for one agent. `fallback_id` is used when the persona
/// has no usable id.
pub fn render_section(config: &AgentConfig, fallback_id: &str) -> String {
    let persona = &config.persona;
    let agent_id = persona
        .id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .unwrap_or(fallback_id);
    let title = persona.title.as_deref().map(str::trim).unwrap_or("");
    let description = persona.description.as_deref().map(str::trim).unwrap_or("");

    let mut lines = Vec::new();
    if title.is_empty() {
        lines.push(format!("## {agent_id}"));
    } else {
        lines.push(format!("## {agent_id} – {title}"));
    }

    if !description.is_empty() {
        lines.push(String::new());
        lines.push(description.to_string());
    }

    if !config.commands.is_empty() {
        lines.push(String::new());
        lines.push("### Commands".to_string());
        lines.push(String::new());
        for cmd in &config.commands {
            let name = cmd.name.as_deref().map(str::trim).unwrap_or("");
            if name.is_empty() {
                continue;
            }
            let desc = cmd.description.as_deref().map(str::trim).unwrap_or("");
            if desc.is_empty() {
                lines.push(format!("- `{name}`"));
            } else {
                lines.push(format!("- `{name}`: {desc}"));
            }
            if !cmd.parameters.is_empty() {
                lines.push(format!("  - required: {}", cmd.parameters.join(", ")));
            }
            if !cmd.optional_parameters.is_empty() {
                lines.push(format!(
                    "  - optional: {}",
                    cmd.optional_parameters.join(", ")
                ));
            }
            lines.push(String::new());
        }
        if lines.last().is_some_and(String::is_empty) {
            lines.pop();
        }
    }

    lines.join("\n")
}

/// Collect sections from every agent in `agent_dirs`. Returns `None` when no
/// agent yields a section.
pub fn synthesize(agent_dirs: &[PathBuf]) -> Result<(Option<String>, Vec<FileWarning>)> {
    let mut sections = Vec::new();
    let mut warnings = Vec::new();

    for agent_dir in agent_dirs {
        for file in list_agent_files(agent_dir)? {
            let doc = match AgentDocument::read(&file) {
                Ok(doc) => doc,
                Err(e) => {
                    warnings.push(FileWarning::new(&file, format!("failed to read agent: {e}")));
                    continue;
                }
            };
            if let Some(w) = doc.warning.clone() {
                warnings.push(w);
            }
            let Some(config) = &doc.config else {
                continue;
            };
            let section = render_section(config, &doc.name());
            if !section.trim().is_empty() {
                sections.push(section);
            }
        }
    }

    if sections.is_empty() {
        return Ok((None, warnings));
    }
    Ok((Some(format!("{}\n", sections.join(SECTION_SEPARATOR))), warnings))
}

/// Regenerate the cheat sheet at `output`, replacing any previous content.
/// Nothing is written when there are no sections. Returns whether the file
/// was written.
pub fn write_cheat_sheet(agent_dirs: &[PathBuf], output: &Path) -> Result<(bool, Vec<FileWarning>)> {
    let (content, warnings) = synthesize(agent_dirs)?;
    match content {
        Some(content) => {
            io::atomic_write(output, content.as_bytes())?;
            Ok((true, warnings))
        }
        None => Ok((false, warnings)),
    }
}
