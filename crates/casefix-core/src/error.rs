//! Error types for casefix-core

/// Result type for casefix-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in casefix-core operations
///
/// Index queries and reconciliation steps do not surface here: they are
/// logged and degrade to "nothing found" or a partial fix. What remains are
/// failures the caller must act on.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The caller cancelled a scan; partial results were discarded
    #[error("Operation cancelled")]
    Cancelled,

    /// A resolution name could not be parsed
    #[error("Invalid resolution '{value}' (expected ask, match-index or match-filesystem)")]
    InvalidResolution { value: String },

    /// A configuration key or value could not be applied
    #[error("Invalid value '{value}' for config key '{key}'")]
    InvalidConfigValue { key: String, value: String },

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from casefix-fs
    #[error(transparent)]
    Fs(#[from] casefix_fs::Error),

    /// Git error from casefix-git
    #[error(transparent)]
    Git(#[from] casefix_git::Error),
}
