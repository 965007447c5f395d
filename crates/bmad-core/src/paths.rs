use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const DEFAULT_BASE_DIR: &str = "bmad-minimal";
pub const CONFIG_FILE: &str = "config.json";

pub const ENGINEERING_DIR: &str = "engineering";
pub const PLANNING_DIR: &str = "planning";
pub const AGENTS_DIR: &str = "agents";

/// The two template categories, in processing order.
pub const CATEGORIES: [&str; 2] = [ENGINEERING_DIR, PLANNING_DIR];

/// Directories probed (in order) for an installed `config.json`.
pub const CONFIG_SEARCH_DIRS: [&str; 3] = [DEFAULT_BASE_DIR, ".bmad", "bmad"];

pub const CHEAT_SHEET_FILE: &str = "cheat-sheet.md";
pub const CODING_STANDARDS_FILE: &str = "coding-standards.md";
pub const BUNDLED_DIR: &str = "bundled";

/// Comment that marks the JSON block rewritten by the compressor.
pub const INSTRUCTIONS_MARKER: &str = "<!-- INSTRUCTIONS_AND_RULES:JSON -->";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

/// `<root>/engineering/agents` and `<root>/planning/agents`.
pub fn agent_dirs(root: &Path) -> Vec<PathBuf> {
    CATEGORIES
        .iter()
        .map(|category| root.join(category).join(AGENTS_DIR))
        .collect()
}

pub fn config_path(base_dir: &Path) -> PathBuf {
    base_dir.join(CONFIG_FILE)
}

pub fn workspace_cheat_sheet(cwd: &Path, docs_dir: &str) -> PathBuf {
    cwd.join(docs_dir).join(CHEAT_SHEET_FILE)
}

pub fn workspace_coding_standards(cwd: &Path, docs_dir: &str) -> PathBuf {
    cwd.join(docs_dir).join(CODING_STANDARDS_FILE)
}

// ---------------------------------------------------------------------------
// Package layout
// ---------------------------------------------------------------------------

/// Location of the packaged template content.
///
/// ```text
/// <root>/core/config.json
/// <root>/core/engineering/...
/// <root>/core/planning/...
/// <root>/docs/cheat-sheet.md
/// <root>/templates/coding-standards.md
/// <root>/bundled/<category>/<agent>.txt   (build output)
/// ```
#[derive(Debug, Clone)]
pub struct PackageLayout {
    root: PathBuf,
}

impl PackageLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn core_dir(&self) -> PathBuf {
        self.root.join("core")
    }

    pub fn agent_dirs(&self) -> Vec<PathBuf> {
        agent_dirs(&self.core_dir())
    }

    pub fn cheat_sheet(&self) -> PathBuf {
        self.root.join("docs").join(CHEAT_SHEET_FILE)
    }

    pub fn coding_standards_template(&self) -> PathBuf {
        self.root.join("templates").join(CODING_STANDARDS_FILE)
    }

    pub fn bundled_dir(&self) -> PathBuf {
        self.root.join(BUNDLED_DIR)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
