//! Well-known file and directory names.

use std::path::Path;

/// Filesystem markers the fixer looks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// The `.git` entry that marks a repository root (directory or gitfile)
    GitDir,
    /// Project-level fixer configuration
    ConfigFile,
}

impl Marker {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GitDir => ".git",
            Self::ConfigFile => ".casefix.toml",
        }
    }
}

impl AsRef<Path> for Marker {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<str> for Marker {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for Marker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
