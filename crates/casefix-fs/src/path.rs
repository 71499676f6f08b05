//! Normalized path handling for cross-platform compatibility

use std::path::{Path, PathBuf};

/// A path normalized to use forward slashes internally.
///
/// Git reports tracked paths with forward slashes on every platform, so all
/// comparisons between index paths and filesystem paths happen on this
/// representation. Conversion to a platform-native path only happens at I/O
/// boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedPath {
    /// Internal representation always uses forward slashes
    inner: String,
}

impl NormalizedPath {
    /// Create a new NormalizedPath from any path-like input.
    ///
    /// Converts backslashes to forward slashes and drops a trailing `/.`
    /// component, which some path sources append to directory roots.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path_str = path.as_ref().to_string_lossy();
        let mut normalized = path_str.replace('\\', "/");
        if normalized.len() > 2 && normalized.ends_with("/.") {
            normalized.truncate(normalized.len() - 2);
        }
        Self { inner: normalized }
    }

    /// Get the internal normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Convert to a platform-native PathBuf for I/O operations.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.inner)
    }

    /// Join this path with a segment.
    pub fn join(&self, segment: &str) -> Self {
        let segment_normalized = segment.replace('\\', "/");
        if self.inner.is_empty() {
            return Self {
                inner: segment_normalized,
            };
        }
        let joined = if self.inner.ends_with('/') {
            format!("{}{}", self.inner, segment_normalized)
        } else {
            format!("{}/{}", self.inner, segment_normalized)
        };
        Self { inner: joined }
    }

    /// Get the parent directory.
    pub fn parent(&self) -> Option<Self> {
        let trimmed = self.inner.trim_end_matches('/');
        match trimmed.rfind('/') {
            Some(idx) if idx > 0 => Some(Self {
                inner: trimmed[..idx].to_string(),
            }),
            Some(0) => Some(Self {
                inner: "/".to_string(),
            }),
            _ => None,
        }
    }

    /// Get the file name component.
    pub fn file_name(&self) -> Option<&str> {
        let trimmed = self.inner.trim_end_matches('/');
        trimmed.rsplit('/').next().filter(|name| !name.is_empty())
    }

    /// Iterate over the non-empty components of the path.
    pub fn components(&self) -> impl Iterator<Item = &str> {
        self.inner.split('/').filter(|c| !c.is_empty())
    }

    /// Lowercased form with exactly one trailing slash.
    ///
    /// This is the key used to test whether another path lives under this
    /// directory without regard to case.
    pub fn dir_prefix(&self) -> String {
        let mut prefix = self.inner.trim_end_matches('/').to_lowercase();
        prefix.push('/');
        prefix
    }

    /// What follows `dir` in this path, comparing components without regard
    /// to case. Empty when the paths name the same directory.
    fn remainder_after(&self, dir: &NormalizedPath) -> Option<&str> {
        if self.inner.starts_with('/') != dir.inner.starts_with('/') {
            return None;
        }
        let mut rest = self.inner.as_str();
        for wanted in dir.components() {
            rest = rest.trim_start_matches('/');
            let (head, tail) = rest.split_once('/').unwrap_or((rest, ""));
            if head != wanted && head.to_lowercase() != wanted.to_lowercase() {
                return None;
            }
            rest = tail;
        }
        Some(rest.trim_start_matches('/'))
    }

    /// Case-insensitive test for `self` being `dir` or located under it.
    pub fn starts_with_ignore_case(&self, dir: &NormalizedPath) -> bool {
        self.remainder_after(dir).is_some()
    }

    /// Strip `dir` from the front of this path, ignoring case, and return the
    /// remainder with the casing of `self`.
    ///
    /// Returns `None` when `self` is not under `dir` or is `dir` itself.
    pub fn strip_prefix_ignore_case(&self, dir: &NormalizedPath) -> Option<&str> {
        self.remainder_after(dir).filter(|rest| !rest.is_empty())
    }

    /// Check if this path exists on the filesystem.
    pub fn exists(&self) -> bool {
        self.to_native().exists()
    }

    /// Get the extension if present.
    pub fn extension(&self) -> Option<&str> {
        self.file_name().and_then(|name| {
            let idx = name.rfind('.')?;
            if idx == 0 {
                None
            } else {
                Some(&name[idx + 1..])
            }
        })
    }
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<&str> for NormalizedPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NormalizedPath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<PathBuf> for NormalizedPath {
    fn from(p: PathBuf) -> Self {
        Self::new(p)
    }
}

impl From<&Path> for NormalizedPath {
    fn from(p: &Path) -> Self {
        Self::new(p)
    }
}
