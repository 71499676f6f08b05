//! Error types for casefix-git

use std::path::PathBuf;

/// Result type for casefix-git operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in casefix-git operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("`git {command}` failed in {root} (exit {status:?}): {stderr}")]
    CommandFailed {
        command: String,
        root: PathBuf,
        status: Option<i32>,
        stderr: String,
    },

    #[error("Git CLI `{binary}` could not be executed: {message}")]
    GitUnavailable { binary: PathBuf, message: String },

    #[error("Not a git repository: {path}")]
    NotARepository { path: PathBuf },

    #[error("Repository at {path} has no working tree")]
    BareRepository { path: PathBuf },

    #[error("Could not scan {path} for repositories: {message}")]
    Discovery { path: PathBuf, message: String },
}
