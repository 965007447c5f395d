use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BmadError {
    #[error("no bmad-minimal configuration found: run 'bmad-minimal install' first")]
    NotInstalled,

    #[error("no app/backend/frontend directory provided")]
    NoProjectLocation,

    #[error("template not found: {}", .0.display())]
    MissingTemplate(PathBuf),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid answer for '{field}': {reason}")]
    InvalidAnswer { field: String, reason: String },

    #[error("prompt failed: {0}")]
    Prompt(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Regex(#[from] regex::Error),

    #[error(transparent)]
    Walk(#[from] walkdir::Error),
}

pub type Result<T> = std::result::Result<T, BmadError>;
