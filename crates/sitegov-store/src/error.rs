//! Storage errors.

use crate::jsonl::JsonlError;
use sitegov_kernel::GovernanceError;

#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    #[error("{path}: I/O error: {message}")]
    Io { path: String, message: String },

    #[error("{path}: invalid config: {message}")]
    Config { path: String, message: String },

    #[error("{path}: invalid JSON: {message}")]
    Json { path: String, message: String },

    #[error("block records: {0}")]
    Jsonl(#[from] JsonlError),

    #[error(transparent)]
    Governance(#[from] GovernanceError),

    #[error("block supplier failed: {0}")]
    Supplier(String),
}

impl StoreError {
    pub(crate) fn io(path: &std::path::Path, err: impl std::fmt::Display) -> Self {
        Self::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }
}
