//! Agent persona documents and the configuration embedded in them.

use crate::diagnostics::FileWarning;
use crate::error::Result;
use crate::extract::extract_json_block;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// AgentConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AgentPersona {
    pub id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentCommand {
    pub name: Option<String>,
    pub description: Option<String>,
    pub parameters: Vec<String>,
    pub optional_parameters: Vec<String>,
    /// Relative paths of the files this command depends on.
    pub steps: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AgentConfig {
    pub persona: AgentPersona,
    pub commands: Vec<AgentCommand>,
}

fn str_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}

fn str_list(value: &Value, key: &str) -> Vec<String> {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

impl AgentConfig {
    /// Read the fields we care about from an arbitrary JSON value.
    /// Wrongly-typed entries are dropped rather than rejected.
    pub fn from_value(value: &Value) -> Self {
        let persona = value
            .pointer("/persona/agent")
            .map(|agent| AgentPersona {
                id: str_field(agent, "id"),
                title: str_field(agent, "title"),
                description: str_field(agent, "description"),
            })
            .unwrap_or_default();

        let commands = value
            .get("commands")
            .and_then(Value::as_array)
            .map(|cmds| {
                cmds.iter()
                    .filter(|c| c.is_object())
                    .map(|c| AgentCommand {
                        name: str_field(c, "name"),
                        description: str_field(c, "description"),
                        parameters: str_list(c, "parameters"),
                        optional_parameters: str_list(c, "optionalParameters"),
                        steps: str_list(c, "steps"),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self { persona, commands }
    }

    /// Unique, non-blank step paths across all commands, first-seen order.
    pub fn dependencies(&self) -> DependencySet {
        let mut deps = DependencySet::default();
        for step in self.commands.iter().flat_map(|c| c.steps.iter()) {
            deps.insert(step);
        }
        deps
    }
}

// ---------------------------------------------------------------------------
// DependencySet
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencySet {
    order: Vec<String>,
    seen: HashSet<String>,
}

impl DependencySet {
    /// Insert a trimmed path. Blank paths and duplicates are ignored.
    pub fn insert(&mut self, path: &str) -> bool {
        let trimmed = path.trim();
        if trimmed.is_empty() || !self.seen.insert(trimmed.to_string()) {
            return false;
        }
        self.order.push(trimmed.to_string());
        true
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.seen.contains(path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }
}

// ---------------------------------------------------------------------------
// AgentDocument
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct AgentDocument {
    pub path: PathBuf,
    pub content: String,
    /// `None` when the file has no usable JSON block.
    pub config: Option<AgentConfig>,
    /// Set when a JSON block was found but failed to parse.
    pub warning: Option<FileWarning>,
}

impl AgentDocument {
    /// Interpret `content` using its first fenced JSON block.
    pub fn parse(path: impl Into<PathBuf>, content: String) -> Self {
        let path = path.into();
        let (config, warning) = match extract_json_block(&content, None, &path) {
            Ok(value) => (value.as_ref().map(AgentConfig::from_value), None),
            Err(warning) => (None, Some(warning)),
        };
        Self {
            path,
            content,
            config,
            warning,
        }
    }

    pub fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::parse(path, content))
    }

    /// File name without extension, e.g. `dev` for `dev.md`.
    pub fn name(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Markdown files directly inside `agent_dir`, sorted by name.
/// A missing directory yields an empty list.
pub fn list_agent_files(agent_dir: &Path) -> Result<Vec<PathBuf>> {
    if !agent_dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut files = Vec::new();
    for entry in std::fs::read_dir(agent_dir)? {
        let entry = entry?;
        let name = entry.file_name();
        if name.to_string_lossy().ends_with(".md") && entry.file_type()?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn dependency_set_collapses_duplicates() {
        let cfg = AgentConfig::from_value(&json!({
            "commands": [
                {"steps": ["a.md", "b.md"]},
                {"steps": ["a.md"]}
            ]
        }));
        let deps = cfg.dependencies();
        assert_eq!(deps.len(), 2);
        assert!(deps.contains("a.md"));
        assert!(deps.contains("b.md"));
        assert_eq!(deps.iter().collect::<Vec<_>>(), vec!["a.md", "b.md"]);
    }

    #[test]
    fn non_string_and_blank_steps_are_ignored() {
        let cfg = AgentConfig::from_value(&json!({
            "commands": [
                {"steps": ["  x.md ", 7, null, "", "   "]},
                {"name": "no-steps"},
                "not-a-command"
            ]
        }));
        assert_eq!(cfg.commands.len(), 2);
        assert_eq!(cfg.dependencies().iter().collect::<Vec<_>>(), vec!["x.md"]);
    }

    #[test]
    fn persona_fields_are_read() {
        let cfg = AgentConfig::from_value(&json!({
            "persona": {"agent": {"id": "dev", "title": "Developer", "description": 3}},
            "commands": [{"name": "build", "parameters": ["story"], "optionalParameters": ["scope"]}]
        }));
        assert_eq!(cfg.persona.id.as_deref(), Some("dev"));
        assert_eq!(cfg.persona.title.as_deref(), Some("Developer"));
        assert_eq!(cfg.persona.description, None);
        assert_eq!(cfg.commands[0].parameters, vec!["story"]);
        assert_eq!(cfg.commands[0].optional_parameters, vec!["scope"]);
    }

    #[test]
    fn document_without_block_has_no_config() {
        let doc = AgentDocument::parse("agents/pm.md", "# PM\nno json here".to_string());
        assert!(doc.config.is_none());
        assert!(doc.warning.is_none());
        assert_eq!(doc.name(), "pm");
    }

    #[test]
    fn document_with_malformed_block_warns() {
        let doc = AgentDocument::parse("agents/qa.md", "```json\n{oops\n```".to_string());
        assert!(doc.config.is_none());
        let warning = doc.warning.unwrap();
        assert_eq!(warning.path, PathBuf::from("agents/qa.md"));
    }

    #[test]
    fn list_agent_files_filters_markdown() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("b.md"), "").unwrap();
        std::fs::write(dir.path().join("a.md"), "").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "").unwrap();
        std::fs::create_dir(dir.path().join("dir.md")).unwrap();
        let files = list_agent_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.md", "b.md"]);
    }

    #[test]
    fn list_agent_files_missing_dir_is_empty() {
        let dir = TempDir::new().unwrap();
        assert!(list_agent_files(&dir.path().join("missing")).unwrap().is_empty());
    }
}
