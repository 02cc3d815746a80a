use std::path::PathBuf;

use thiserror::Error;

use crate::types::LogicalInput;

/// Problems detected before a match is allowed to start.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
    #[error("no device code bound to logical input '{0}'")]
    MissingBinding(LogicalInput),
    #[error("malformed saved match: {0}")]
    MalformedSave(String),
    #[error("key script {}: {reason}", path.display())]
    KeyScript { path: PathBuf, reason: String },
}
