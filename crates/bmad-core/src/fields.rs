//! The ordered list of configuration questions, and the logic that asks them.
//!
//! Fields are asked in list order, so a `when` condition can rely on every
//! earlier answer being in place.

use crate::config::BmadConfig;
use crate::error::{BmadError, Result};
use crate::prompt::Prompter;
use serde_json::{Map, Value};
use std::path::Path;

/// Answers collected so far, keyed by field name. An absent key means the
/// question was never asked.
pub type Answers = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Input,
    Confirm,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultValue {
    Text(String),
    Bool(bool),
}

/// When a field is asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum When {
    Always,
    Never,
    /// Only when an earlier answer is exactly this boolean.
    AnswerIs(&'static str, bool),
}

impl When {
    pub fn applies(&self, answers: &Answers) -> bool {
        match self {
            When::Always => true,
            When::Never => false,
            When::AnswerIs(key, expected) => answers.get(*key) == Some(&Value::Bool(*expected)),
        }
    }
}

/// Transform applied to a raw text answer before it is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    None,
    /// `"a, b,,c"` → `["a","b","c"]`; `"none"` (any case) → `[]`.
    CommaList,
}

impl Filter {
    pub fn apply(&self, raw: &str) -> Value {
        match self {
            Filter::None => Value::String(raw.to_string()),
            Filter::CommaList => {
                if raw.trim().eq_ignore_ascii_case("none") {
                    return Value::Array(Vec::new());
                }
                Value::Array(
                    raw.split(',')
                        .map(str::trim)
                        .filter(|d| !d.is_empty())
                        .map(|d| Value::String(d.to_string()))
                        .collect(),
                )
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validate {
    None,
    NonEmpty,
}

impl Validate {
    pub fn check(&self, input: &str) -> std::result::Result<(), String> {
        match self {
            Validate::NonEmpty if input.trim().is_empty() => Err("a value is required".to_string()),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigField {
    /// Answer key.
    pub name: &'static str,
    /// Dotted path in `config.json` where the answer is stored. `None` for
    /// questions that only steer later ones.
    pub access_key: Option<&'static str>,
    pub kind: FieldKind,
    pub message: &'static str,
    pub default: Option<DefaultValue>,
    pub when: When,
    pub filter: Filter,
    pub validate: Validate,
}

impl ConfigField {
    fn input(name: &'static str, access_key: &'static str, message: &'static str) -> Self {
        Self {
            name,
            access_key: Some(access_key),
            kind: FieldKind::Input,
            message,
            default: None,
            when: When::Always,
            filter: Filter::None,
            validate: Validate::None,
        }
    }

    fn default_text(mut self, default: impl Into<String>) -> Self {
        self.default = Some(DefaultValue::Text(default.into()));
        self
    }

    fn when(mut self, when: When) -> Self {
        self.when = when;
        self
    }
}

/// Options given on the command line that pre-empt or seed questions.
#[derive(Debug, Clone, Default)]
pub struct FieldOptions {
    pub project: Option<String>,
    pub dir: Option<String>,
}

fn workspace_name(cwd: &Path) -> String {
    cwd.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "project".to_string())
}

pub const PROJECT_NAME_MESSAGE: &str = "Project name:";
pub const NEW_PROJECT_MESSAGE: &str = "Is this a new project?";

/// Every configuration question, in the order it is asked.
pub fn get_config_fields(cwd: &Path, options: &FieldOptions) -> Vec<ConfigField> {
    vec![
        ConfigField {
            validate: Validate::NonEmpty,
            ..ConfigField::input("projectName", "project.name", PROJECT_NAME_MESSAGE)
                .default_text(workspace_name(cwd))
                .when(if options.project.is_some() {
                    When::Never
                } else {
                    When::Always
                })
        },
        ConfigField {
            name: "isMonolithic",
            access_key: None,
            kind: FieldKind::Confirm,
            message: "Is this a monolithic app (everything happens in one place with no backend/frontend separation)?",
            default: Some(DefaultValue::Bool(true)),
            when: When::Always,
            filter: Filter::None,
            validate: Validate::None,
        },
        ConfigField::input(
            "dir",
            "project.dir",
            "Monolithic app directory (relative to current directory):",
        )
        .default_text("./")
        .when(When::AnswerIs("isMonolithic", true)),
        ConfigField::input(
            "frontendDir",
            "project.frontendDir",
            "Frontend directory (relative to current directory):",
        )
        .default_text("./frontend/")
        .when(When::AnswerIs("isMonolithic", false)),
        ConfigField::input(
            "backendDir",
            "project.backendDir",
            "Backend directory (relative to current directory):",
        )
        .default_text("./backend/")
        .when(When::AnswerIs("isMonolithic", false)),
        ConfigField {
            filter: Filter::CommaList,
            ..ConfigField::input(
                "testDirs",
                "project.testDirs",
                "Test directories (comma-separated, relative to current directory):",
            )
            .default_text("None")
        },
        ConfigField::input("baseDir", "baseDir", "Base directory for BMad files:").default_text(
            options
                .dir
                .clone()
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| crate::paths::DEFAULT_BASE_DIR.to_string()),
        ),
        ConfigField::input("docsDir", "docs.dir", "Documentation directory:")
            .default_text(crate::config::DEFAULT_DOCS_DIR),
    ]
}

/// Persisted fields whose dotted path is absent from `existing`.
///
/// Only a missing key counts; empty strings and `null` are present values.
pub fn find_missing_fields(existing: &BmadConfig, cwd: &Path) -> Vec<ConfigField> {
    get_config_fields(cwd, &FieldOptions::default())
        .into_iter()
        .filter(|field| {
            field
                .access_key
                .is_some_and(|key| existing.get(key).is_none())
        })
        .collect()
}

/// Ask each applicable field in order and record the answers.
pub fn ask(fields: &[ConfigField], prompter: &mut dyn Prompter, answers: &mut Answers) -> Result<()> {
    for field in fields {
        if !field.when.applies(answers) {
            continue;
        }
        let value = match field.kind {
            FieldKind::Input => {
                let default = match &field.default {
                    Some(DefaultValue::Text(t)) => Some(t.as_str()),
                    _ => None,
                };
                let raw = prompter.input(field.message, default, field.validate)?;
                field
                    .validate
                    .check(&raw)
                    .map_err(|reason| BmadError::InvalidAnswer {
                        field: field.name.to_string(),
                        reason,
                    })?;
                field.filter.apply(&raw)
            }
            FieldKind::Confirm => {
                let default = matches!(field.default, Some(DefaultValue::Bool(true)));
                Value::Bool(prompter.confirm(field.message, default)?)
            }
        };
        answers.insert(field.name.to_string(), value);
    }
    Ok(())
}

/// Write every answered persisted field into `config`. Returns how many
/// values were set; unanswered fields leave the config untouched.
pub fn apply_answers(fields: &[ConfigField], answers: &Answers, config: &mut BmadConfig) -> usize {
    let mut applied = 0;
    for field in fields {
        let (Some(key), Some(value)) = (field.access_key, answers.get(field.name)) else {
            continue;
        };
        config.set(key, value.clone());
        applied += 1;
    }
    applied
}

fn non_empty_answer(answers: &Answers, key: &str) -> bool {
    answers
        .get(key)
        .and_then(Value::as_str)
        .is_some_and(|s| !s.trim().is_empty())
}

/// Collect everything `install` needs to know.
///
/// Fails with [`BmadError::NoProjectLocation`] when none of the app, backend
/// or frontend directories was given.
pub fn gather_install_answers(
    cwd: &Path,
    options: &FieldOptions,
    prompter: &mut dyn Prompter,
) -> Result<Answers> {
    let mut answers = Answers::new();
    ask(&get_config_fields(cwd, options), prompter, &mut answers)?;

    if let Some(project) = options.project.as_deref().filter(|p| !p.trim().is_empty()) {
        answers.insert("projectName".to_string(), Value::String(project.to_string()));
    }
    if !non_empty_answer(&answers, "projectName") {
        let name = prompter.input(
            PROJECT_NAME_MESSAGE,
            Some(&workspace_name(cwd)),
            Validate::NonEmpty,
        )?;
        Validate::NonEmpty
            .check(&name)
            .map_err(|reason| BmadError::InvalidAnswer {
                field: "projectName".to_string(),
                reason,
            })?;
        answers.insert("projectName".to_string(), Value::String(name));
    }

    if !["dir", "backendDir", "frontendDir"]
        .iter()
        .any(|key| non_empty_answer(&answers, key))
    {
        return Err(BmadError::NoProjectLocation);
    }

    let is_new = prompter.confirm(NEW_PROJECT_MESSAGE, true)?;
    let project_type = if is_new { "greenfield" } else { "brownfield" };
    answers.insert("projectType".to_string(), Value::String(project_type.to_string()));

    Ok(answers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::{AcceptDefaults, Scripted};
    use serde_json::json;

    fn cwd() -> &'static Path {
        Path::new("/work/shop")
    }

    fn complete_config() -> BmadConfig {
        BmadConfig::from_value(json!({
            "baseDir": "bmad-minimal",
            "project": {
                "name": "",
                "dir": "",
                "frontendDir": "./web",
                "backendDir": "./api"
            },
            "docs": {"dir": "docs"}
        }))
    }

    #[test]
    fn field_order_is_stable() {
        let names: Vec<_> = get_config_fields(cwd(), &FieldOptions::default())
            .iter()
            .map(|f| f.name)
            .collect();
        assert_eq!(
            names,
            vec!["projectName", "isMonolithic", "dir", "frontendDir", "backendDir", "testDirs", "baseDir", "docsDir"]
        );
    }

    #[test]
    fn project_option_skips_name_question() {
        let opts = FieldOptions {
            project: Some("given".to_string()),
            dir: Some(".bmad".to_string()),
        };
        let fields = get_config_fields(cwd(), &opts);
        assert_eq!(fields[0].when, When::Never);
        assert_eq!(
            fields.iter().find(|f| f.name == "baseDir").unwrap().default,
            Some(DefaultValue::Text(".bmad".to_string()))
        );
    }

    #[test]
    fn missing_fields_only_reports_absent_keys() {
        let missing = find_missing_fields(&complete_config(), cwd());
        let keys: Vec<_> = missing.iter().filter_map(|f| f.access_key).collect();
        assert_eq!(keys, vec!["project.testDirs"]);
    }

    #[test]
    fn missing_fields_empty_when_complete() {
        let mut cfg = complete_config();
        cfg.set("project.testDirs", json!([]));
        assert!(find_missing_fields(&cfg, cwd()).is_empty());
    }

    #[test]
    fn comma_list_filter() {
        assert_eq!(Filter::CommaList.apply("None"), json!([]));
        assert_eq!(Filter::CommaList.apply(" tests, e2e ,, "), json!(["tests", "e2e"]));
        assert_eq!(Filter::None.apply("x"), json!("x"));
    }

    #[test]
    fn ask_follows_when_conditions() {
        let fields = get_config_fields(cwd(), &FieldOptions::default());
        let mut prompter = Scripted::new(["shop", "n", "./web", "./api", "tests", "", ""]);
        let mut answers = Answers::new();
        ask(&fields, &mut prompter, &mut answers).unwrap();

        assert!(!answers.contains_key("dir"));
        assert_eq!(answers["frontendDir"], json!("./web"));
        assert_eq!(answers["backendDir"], json!("./api"));
        assert_eq!(answers["testDirs"], json!(["tests"]));
        assert_eq!(answers["baseDir"], json!("bmad-minimal"));
        assert_eq!(answers["docsDir"], json!("docs"));
    }

    #[test]
    fn ask_rejects_blank_required_answer() {
        let fields = get_config_fields(Path::new("/"), &FieldOptions::default());
        let mut answers = Answers::new();
        let err = ask(&fields[..1], &mut Scripted::new(["   "]), &mut answers).unwrap_err();
        assert!(matches!(err, BmadError::InvalidAnswer { .. }));
    }

    #[test]
    fn gather_with_defaults_is_monolithic_greenfield() {
        let answers =
            gather_install_answers(cwd(), &FieldOptions::default(), &mut AcceptDefaults).unwrap();
        assert_eq!(answers["projectName"], json!("shop"));
        assert_eq!(answers["isMonolithic"], json!(true));
        assert_eq!(answers["dir"], json!("./"));
        assert_eq!(answers["testDirs"], json!([]));
        assert_eq!(answers["projectType"], json!("greenfield"));
    }

    #[test]
    fn gather_uses_project_option() {
        let opts = FieldOptions {
            project: Some("cli-name".to_string()),
            dir: None,
        };
        let mut prompter = Scripted::new(["", "", "", "", "", "n"]);
        let answers = gather_install_answers(cwd(), &opts, &mut prompter).unwrap();
        assert_eq!(answers["projectName"], json!("cli-name"));
        assert_eq!(answers["projectType"], json!("brownfield"));
        assert!(!prompter.asked.iter().any(|m| m == PROJECT_NAME_MESSAGE));
    }

    #[test]
    fn gather_requires_a_project_location() {
        // monolithic with an explicitly blank directory
        let mut prompter = Scripted::new(["shop", "y", " ", "", "", ""]);
        let err = gather_install_answers(cwd(), &FieldOptions::default(), &mut prompter).unwrap_err();
        assert!(matches!(err, BmadError::NoProjectLocation));
    }

    #[test]
    fn apply_answers_skips_unanswered_fields() {
        let mut cfg = complete_config();
        let fields = get_config_fields(cwd(), &FieldOptions::default());
        let answers = json!({"testDirs": ["spec"], "isMonolithic": true})
            .as_object()
            .cloned()
            .unwrap();
        assert_eq!(apply_answers(&fields, &answers, &mut cfg), 1);
        assert_eq!(cfg.get("project.testDirs"), Some(&json!(["spec"])));
        assert_eq!(cfg.get("isMonolithic"), None);
    }
}
