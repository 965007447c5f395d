use crate::error::{BmadError, Result};
use crate::fields::Answers;
use crate::io;
use crate::paths;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

pub const DEFAULT_DOCS_DIR: &str = "docs";

/// Docs subdirectories that must always be present, with their defaults.
pub const DEFAULT_DOCS_SUBDIRS: [(&str, &str); 3] =
    [("qa", "qa"), ("epics", "epics"), ("stories", "stories")];

/// Answer keys that map straight onto a string field of the config.
const STRING_ANSWERS: [(&str, &str); 7] = [
    ("baseDir", "baseDir"),
    ("projectName", "project.name"),
    ("projectType", "project.type"),
    ("dir", "project.dir"),
    ("backendDir", "project.backendDir"),
    ("frontendDir", "project.frontendDir"),
    ("docsDir", "docs.dir"),
];

// ---------------------------------------------------------------------------
// Dotted paths
// ---------------------------------------------------------------------------

/// Look up `a.b.c` in `value`. Returns `None` if any segment is missing or
/// an intermediate is not an object. An empty path yields `value` itself.
pub fn get_value_by_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(value);
    }
    path.split('.')
        .try_fold(value, |current, part| current.as_object()?.get(part))
}

/// Assign `new_value` at `a.b.c`, creating intermediate objects and
/// overwriting any non-object found on the way. An empty path replaces
/// `value` entirely.
pub fn set_value_by_path(value: &mut Value, path: &str, new_value: Value) {
    if path.is_empty() {
        *value = new_value;
        return;
    }
    let parts: Vec<&str> = path.split('.').collect();
    let Some((last, parents)) = parts.split_last() else {
        return;
    };
    let mut current = value;
    for part in parents {
        current = ensure_object(current)
            .entry(part.to_string())
            .or_insert(Value::Null);
    }
    ensure_object(current).insert(last.to_string(), new_value);
}

/// Coerce `value` into an object, discarding whatever was there before.
fn ensure_object(value: &mut Value) -> &mut Map<String, Value> {
    if !value.is_object() {
        *value = Value::Object(Map::new());
    }
    match value {
        Value::Object(map) => map,
        _ => unreachable!("value was just replaced with an object"),
    }
}

/// The trimmed string in `value`, or `default` if it is missing, not a
/// string, or blank.
fn trimmed_or(value: Option<&Value>, default: &str) -> String {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(default)
        .to_string()
}

// ---------------------------------------------------------------------------
// BmadConfig
// ---------------------------------------------------------------------------

/// The installed `config.json`.
///
/// Held as raw JSON so fields this version does not know about survive a
/// load/save cycle untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BmadConfig {
    value: Value,
}

impl BmadConfig {
    pub fn from_value(value: Value) -> Self {
        Self { value }
    }

    pub fn as_value(&self) -> &Value {
        &self.value
    }

    pub fn get(&self, path: &str) -> Option<&Value> {
        get_value_by_path(&self.value, path)
    }

    pub fn set(&mut self, path: &str, value: Value) {
        set_value_by_path(&mut self.value, path, value);
    }

    fn get_str(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(Value::as_str)
    }

    pub fn base_dir(&self) -> Option<&str> {
        self.get_str("baseDir")
    }

    pub fn project_name(&self) -> Option<&str> {
        self.get_str("project.name")
    }

    pub fn project_dir(&self) -> Option<&str> {
        self.get_str("project.dir")
    }

    pub fn backend_dir(&self) -> Option<&str> {
        self.get_str("project.backendDir")
    }

    pub fn frontend_dir(&self) -> Option<&str> {
        self.get_str("project.frontendDir")
    }

    /// `docs.dir`, falling back to the default when unset.
    pub fn docs_dir(&self) -> &str {
        self.get_str("docs.dir").unwrap_or(DEFAULT_DOCS_DIR)
    }

    /// String-valued `docs.subdirs` entries, in file order.
    pub fn docs_subdirs(&self) -> Vec<(String, String)> {
        self.get("docs.subdirs")
            .and_then(Value::as_object)
            .map(|subdirs| {
                subdirs
                    .iter()
                    .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn docs_subdir(&self, key: &str) -> Option<&str> {
        self.get("docs.subdirs")
            .and_then(|s| s.get(key))
            .and_then(Value::as_str)
    }

    /// Guarantee a well-formed `docs` section.
    ///
    /// `docs.dir` and each of `qa`/`epics`/`stories` end up as non-empty
    /// trimmed strings, filled per key from the defaults when missing,
    /// non-string or blank. Other `docs.subdirs` keys are kept as they are.
    /// A config that is not a JSON object is left alone.
    pub fn ensure_docs_defaults(&mut self) -> &mut Self {
        if let Value::Object(root) = &mut self.value {
            let docs = ensure_object(root.entry("docs").or_insert(Value::Null));

            let dir = trimmed_or(docs.get("dir"), DEFAULT_DOCS_DIR);
            docs.insert("dir".to_string(), Value::String(dir));

            let subdirs = ensure_object(docs.entry("subdirs").or_insert(Value::Null));
            for (key, default) in DEFAULT_DOCS_SUBDIRS {
                let current = trimmed_or(subdirs.get(key), default);
                subdirs.insert(key.to_string(), Value::String(current));
            }
        }
        self
    }

    pub fn load(path: &Path) -> Result<Self> {
        match io::read_json::<Value>(path)? {
            Some(value) => Ok(Self::from_value(value)),
            None => Err(BmadError::NotInstalled),
        }
    }

    /// Persist as tab-indented JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        io::write_json(path, &self.value)
    }
}

/// Read the packaged default `config.json` from `core_dir` and fill in docs
/// defaults.
pub fn load_default_config(core_dir: &Path) -> Result<BmadConfig> {
    let path = paths::config_path(core_dir);
    let value: Value =
        io::read_json(&path)?.ok_or_else(|| BmadError::MissingTemplate(path.clone()))?;
    if !value.is_object() {
        return Err(BmadError::InvalidConfig(format!(
            "{} is not a JSON object",
            path.display()
        )));
    }
    let mut config = BmadConfig::from_value(value);
    config.ensure_docs_defaults();
    Ok(config)
}

/// Overlay `answers` on a copy of `defaults`.
///
/// A field is overwritten whenever its answer key is present, so an explicit
/// empty string clears it; a `null` answer counts as an empty string.
/// `testDirs` replaces the stored list only when the answer is a list.
pub fn merge_config(defaults: &BmadConfig, answers: &Answers) -> BmadConfig {
    let mut cfg = defaults.clone();
    cfg.ensure_docs_defaults();

    if !cfg.get("project").is_some_and(Value::is_object) {
        cfg.set("project", Value::Object(Map::new()));
    }

    for (answer_key, path) in STRING_ANSWERS {
        match answers.get(answer_key) {
            Some(Value::String(s)) => cfg.set(path, Value::String(s.clone())),
            Some(Value::Null) => cfg.set(path, Value::String(String::new())),
            _ => {}
        }
    }

    if let Some(dirs @ Value::Array(_)) = answers.get("testDirs") {
        cfg.set("project.testDirs", dirs.clone());
    }

    cfg.ensure_docs_defaults();
    cfg
}

// ---------------------------------------------------------------------------
// Discovery
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLocation {
    /// Directory name relative to the workspace, e.g. `bmad-minimal`.
    pub dir: String,
    pub path: PathBuf,
}

/// Probe the known base directories under `cwd` for a `config.json`.
pub fn find_config(cwd: &Path) -> Option<ConfigLocation> {
    paths::CONFIG_SEARCH_DIRS.iter().find_map(|dir| {
        let path = paths::config_path(&cwd.join(dir));
        path.is_file().then(|| ConfigLocation {
            dir: dir.to_string(),
            path,
        })
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
