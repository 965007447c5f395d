//! The workspace coding-standards document and the prompt that helps fill it.

use crate::config::BmadConfig;
use crate::error::{BmadError, Result};
use crate::io;
use crate::paths::{self, PackageLayout};
use std::path::{Path, PathBuf};

/// Project facts quoted in the coding-standards prompt.
#[derive(Debug, Clone, Default)]
pub struct PromptContext<'a> {
    pub project_name: &'a str,
    pub docs_dir: &'a str,
    pub project_dir: Option<&'a str>,
    pub backend_dir: Option<&'a str>,
    pub frontend_dir: Option<&'a str>,
}

impl<'a> PromptContext<'a> {
    pub fn from_config(config: &'a BmadConfig) -> Self {
        Self {
            project_name: config.project_name().unwrap_or_default(),
            docs_dir: config.docs_dir(),
            project_dir: config.project_dir(),
            backend_dir: config.backend_dir(),
            frontend_dir: config.frontend_dir(),
        }
    }
}

/// Text to paste into an LLM so it drafts `<docs>/coding-standards.md` from
/// the conventions already present in the workspace.
pub fn build_coding_standards_prompt(ctx: &PromptContext<'_>) -> String {
    let display_path = format!("{}/{}", ctx.docs_dir, paths::CODING_STANDARDS_FILE);

    let mut context = vec![format!("- Project name: {}", ctx.project_name)];
    let optional = [
        ("App directory", ctx.project_dir),
        ("Backend directory", ctx.backend_dir),
        ("Frontend directory", ctx.frontend_dir),
    ];
    for (label, value) in optional {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            context.push(format!("- {label}: {value}"));
        }
    }
    context.push(format!("- Docs directory: {}", ctx.docs_dir));

    format!(
        "Task: Create or update {display_path} with the team's coding conventions using the lean \
template headings (naming, files & directories, imports/exports, error handling, logging, testing, \
security & privacy, Git/PR, and the short review checklist).\n\
\n\
Instructions:\n\
- Inspect this workspace to infer actual conventions from existing code and configs.\n\
- Use Architecture documents for technology choices; do not duplicate tech selection here. Focus on \
conventions and policies only.\n\
- Keep entries concise and actionable. If unsure, propose sensible defaults and clearly mark items \
needing confirmation.\n\
- Modify only {display_path}. If the file does not exist, create it. Preserve the heading structure.\n\
\n\
Context:\n\
{}\n\
\n\
Output: Provide either the markdown content of {display_path} or a unified diff that \
creates/updates only that file.",
        context.join("\n")
    )
}

/// Write the packaged coding-standards template to the workspace unless a
/// document is already there. Returns the path when a file was written.
pub fn write_coding_standards(
    layout: &PackageLayout,
    cwd: &Path,
    config: &BmadConfig,
) -> Result<Option<PathBuf>> {
    let dest = paths::workspace_coding_standards(cwd, config.docs_dir());
    if dest.exists() {
        return Ok(None);
    }
    let template = layout.coding_standards_template();
    let content = match std::fs::read(&template) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(BmadError::MissingTemplate(template));
        }
        Err(e) => return Err(e.into()),
    };
    io::write_if_missing(&dest, &content)?;
    Ok(Some(dest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn prompt_lists_only_known_directories() {
        let prompt = build_coding_standards_prompt(&PromptContext {
            project_name: "shop",
            docs_dir: "docs",
            project_dir: None,
            backend_dir: Some("./api"),
            frontend_dir: Some(""),
        });
        assert!(prompt.starts_with("Task: Create or update docs/coding-standards.md"));
        assert!(prompt.contains("Context:\n- Project name: shop\n- Backend directory: ./api\n- Docs directory: docs\n"));
        assert!(!prompt.contains("App directory"));
        assert!(!prompt.contains("Frontend directory"));
        assert!(prompt.ends_with("creates/updates only that file."));
    }

    #[test]
    fn prompt_context_reads_config() {
        let config = BmadConfig::from_value(json!({
            "project": {"name": "shop", "dir": "./"},
            "docs": {"dir": "handbook"}
        }));
        let ctx = PromptContext::from_config(&config);
        assert_eq!(ctx.project_name, "shop");
        assert_eq!(ctx.docs_dir, "handbook");
        assert_eq!(ctx.project_dir, Some("./"));
        assert_eq!(ctx.backend_dir, None);
    }

    #[test]
    fn template_written_once() {
        let dir = TempDir::new().unwrap();
        let layout = PackageLayout::new(dir.path().join("pkg"));
        let template = layout.coding_standards_template();
        std::fs::create_dir_all(template.parent().unwrap()).unwrap();
        std::fs::write(&template, "# Coding Standards\n").unwrap();
        let ws = dir.path().join("ws");
        let config = BmadConfig::from_value(json!({"docs": {"dir": "docs"}}));

        let written = write_coding_standards(&layout, &ws, &config).unwrap();
        assert_eq!(written, Some(ws.join("docs/coding-standards.md")));

        std::fs::write(ws.join("docs/coding-standards.md"), "edited").unwrap();
        assert_eq!(write_coding_standards(&layout, &ws, &config).unwrap(), None);
        assert_eq!(std::fs::read_to_string(ws.join("docs/coding-standards.md")).unwrap(), "edited");
    }

    #[test]
    fn missing_template_is_an_error() {
        let dir = TempDir::new().unwrap();
        let layout = PackageLayout::new(dir.path().join("pkg"));
        let config = BmadConfig::from_value(json!({}));
        let err = write_coding_standards(&layout, dir.path(), &config).unwrap_err();
        assert!(matches!(err, BmadError::MissingTemplate(_)));
    }
}
