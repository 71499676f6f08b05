//! Scan records: repository roots, tracked file entries and resolutions

use std::str::FromStr;

use casefix_fs::NormalizedPath;
use serde::{Deserialize, Serialize};

use crate::Error;

/// How a mismatch is to be fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Resolution {
    /// Undecided; reconciliation leaves the entry alone
    #[default]
    Ask,
    /// Rename on disk so the filesystem matches the index casing
    MatchFilesystem,
    /// Remove and re-add so the index matches the filesystem casing
    MatchIndex,
}

impl Resolution {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ask => "ask",
            Self::MatchFilesystem => "match-filesystem",
            Self::MatchIndex => "match-index",
        }
    }

    pub fn is_automatic(&self) -> bool {
        !matches!(self, Self::Ask)
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resolution {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ask" | "prompt" => Ok(Self::Ask),
            "match-filesystem" | "filesystem" | "rename" => Ok(Self::MatchFilesystem),
            "match-index" | "index" | "git" | "reindex" => Ok(Self::MatchIndex),
            _ => Err(Error::InvalidResolution {
                value: s.to_string(),
            }),
        }
    }
}

/// Root directory of one repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RepoRoot {
    path: NormalizedPath,
    prefix: String,
}

impl RepoRoot {
    pub fn new(path: impl Into<NormalizedPath>) -> Self {
        let path = path.into();
        let prefix = path.dir_prefix();
        Self { path, prefix }
    }

    pub fn path(&self) -> &NormalizedPath {
        &self.path
    }

    /// Lowercased root path with a trailing slash.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Whether the lowercased directory key `dir_key` (trailing slash
    /// included) is this root or lies beneath it.
    pub fn contains_dir_key(&self, dir_key: &str) -> bool {
        dir_key.starts_with(&self.prefix)
    }
}

impl std::fmt::Display for RepoRoot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path)
    }
}

/// A tracked file as seen by the index and by the filesystem.
///
/// `index_path` and `file_path` are both relative to the repository root;
/// the entry is a mismatch when they differ.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedFileEntry {
    repository: RepoRoot,
    full_path: NormalizedPath,
    index_path: String,
    file_path: String,
    /// Fix chosen for this entry
    pub resolution: Resolution,
}

impl TrackedFileEntry {
    pub fn new(
        repository: RepoRoot,
        full_path: NormalizedPath,
        index_path: impl Into<String>,
        file_path: impl Into<String>,
    ) -> Self {
        Self {
            repository,
            full_path,
            index_path: index_path.into(),
            file_path: file_path.into(),
            resolution: Resolution::Ask,
        }
    }

    pub fn repository(&self) -> &RepoRoot {
        &self.repository
    }

    /// Absolute path with on-disk casing.
    pub fn full_path(&self) -> &NormalizedPath {
        &self.full_path
    }

    /// Path as recorded by the index.
    pub fn index_path(&self) -> &str {
        &self.index_path
    }

    /// Path as spelled on disk.
    pub fn file_path(&self) -> &str {
        &self.file_path
    }

    pub fn is_mismatch(&self) -> bool {
        self.index_path != self.file_path
    }

    /// Lowercased absolute path; identifies the file on a case-insensitive
    /// filesystem.
    pub(crate) fn identity(&self) -> String {
        self.full_path.as_str().to_lowercase()
    }
}

/// One record of the change set handed to the scanner.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChangeRecord {
    /// Path after the change; `None` for deletions
    pub after_path: Option<NormalizedPath>,
}

impl ChangeRecord {
    pub fn deleted() -> Self {
        Self { after_path: None }
    }
}

impl From<NormalizedPath> for ChangeRecord {
    fn from(path: NormalizedPath) -> Self {
        Self {
            after_path: Some(path),
        }
    }
}

impl From<&std::path::Path> for ChangeRecord {
    fn from(path: &std::path::Path) -> Self {
        NormalizedPath::new(path).into()
    }
}

impl From<&str> for ChangeRecord {
    fn from(path: &str) -> Self {
        NormalizedPath::new(path).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("ask", Resolution::Ask)]
    #[case("match-filesystem", Resolution::MatchFilesystem)]
    #[case("Rename", Resolution::MatchFilesystem)]
    #[case("match-index", Resolution::MatchIndex)]
    #[case("git", Resolution::MatchIndex)]
    fn resolution_parses(#[case] input: &str, #[case] expected: Resolution) {
        assert_eq!(input.parse::<Resolution>().unwrap(), expected);
    }

    #[test]
    fn unknown_resolution_is_rejected() {
        assert!(matches!(
            "sideways".parse::<Resolution>(),
            Err(Error::InvalidResolution { .. })
        ));
    }

    #[test]
    fn repo_root_prefix_is_folded() {
        let root = RepoRoot::new("/Work/Project/.");
        assert_eq!(root.prefix(), "/work/project/");
        assert!(root.contains_dir_key("/work/project/src/"));
        assert!(!root.contains_dir_key("/work/project2/"));
    }

    #[test]
    fn entry_mismatch_is_exact_comparison() {
        let root = RepoRoot::new("/r");
        let same = TrackedFileEntry::new(root.clone(), "/r/a.txt".into(), "a.txt", "a.txt");
        let differs = TrackedFileEntry::new(root, "/r/A.txt".into(), "a.txt", "A.txt");
        assert!(!same.is_mismatch());
        assert!(differs.is_mismatch());
        assert_eq!(differs.resolution, Resolution::Ask);
    }
}
