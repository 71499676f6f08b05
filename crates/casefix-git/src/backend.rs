//! Git index access trait

use serde::{Deserialize, Serialize};

use crate::Result;
use crate::cli::GitCli;
use crate::libgit2::Git2Backend;
use casefix_fs::NormalizedPath;

/// Operations against a repository's index.
///
/// Paths are relative to the repository root and use forward slashes.
/// Implementations are synchronous; callers batch `unindex`/`reindex`
/// arguments themselves.
pub trait GitBackend: Send + Sync {
    /// All tracked paths, spelled as the index records them.
    fn list_tracked_files(&self, root: &NormalizedPath) -> Result<Vec<String>>;

    /// Remove `paths` from the index, leaving the working tree alone.
    fn unindex(&self, root: &NormalizedPath, paths: &[String]) -> Result<()>;

    /// Add `paths` from the working tree to the index.
    fn reindex(&self, root: &NormalizedPath, paths: &[String]) -> Result<()>;
}

/// Which [`GitBackend`] implementation to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackendKind {
    /// Spawn the `git` executable
    #[default]
    Cli,
    /// Edit the index in-process through libgit2
    Libgit2,
}

impl BackendKind {
    /// Build the backend this kind names.
    pub fn create(self) -> Result<Box<dyn GitBackend>> {
        Ok(match self {
            Self::Cli => Box::new(GitCli::from_env()?),
            Self::Libgit2 => Box::new(Git2Backend),
        })
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "cli"),
            Self::Libgit2 => write!(f, "libgit2"),
        }
    }
}
