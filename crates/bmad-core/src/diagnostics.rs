use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// A soft failure tied to one file. Batch operations collect these instead
/// of aborting; the caller decides how to present them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileWarning {
    pub path: PathBuf,
    pub message: String,
}

impl FileWarning {
    pub fn new(path: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FileWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.message)
    }
}
