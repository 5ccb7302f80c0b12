use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid checkpoint template '{template}': {reason}")]
    InvalidTemplate { template: String, reason: String },

    #[error("Unsupported config format: {0}")]
    UnsupportedConfigFormat(PathBuf),

    #[error("History columns {found:?} do not match header {expected:?}")]
    ColumnMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("Metric name {0:?} cannot be used as a CSV column")]
    InvalidColumn(String),

    #[error("Malformed history at line {line}: {reason}")]
    MalformedHistory { line: usize, reason: String },
}

pub type Result<T> = std::result::Result<T, SettingsError>;
