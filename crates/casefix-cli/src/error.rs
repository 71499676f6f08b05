//! Error types for casefix-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from casefix-core
    #[error(transparent)]
    Core(#[from] casefix_core::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON output could not be produced
    #[error("Failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML output could not be produced
    #[error("Failed to render TOML: {0}")]
    Toml(#[from] toml::ser::Error),
}
