//! [`TestRepo`] builder for case mismatch scenarios.

use std::fs;
use std::path::{Path, PathBuf};

use casefix_fs::NormalizedPath;
use tempfile::TempDir;

use crate::git::repo_with_tracked_files;

/// A temporary git repository whose index and working tree can be made to
/// disagree about letter case.
///
/// # Example
///
/// ```rust,no_run
/// use casefix_test_utils::repo::TestRepo;
///
/// let repo = TestRepo::new();
/// repo.track(&["docs/readme.md"]);
/// repo.respell_on_disk("docs/readme.md", "DOCS/ReadMe.md");
/// repo.assert_spelled_on_disk("DOCS/ReadMe.md");
/// ```
pub struct TestRepo {
    _temp_dir: TempDir,
    root: PathBuf,
}

impl Default for TestRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl TestRepo {
    /// Create an empty temporary directory (canonicalized, so prefix
    /// comparisons against discovered roots line up).
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let root = dunce::canonicalize(temp_dir.path()).unwrap();
        Self {
            _temp_dir: temp_dir,
            root,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn normalized_root(&self) -> NormalizedPath {
        NormalizedPath::new(&self.root)
    }

    /// Absolute normalized path of `relative`.
    pub fn path(&self, relative: &str) -> NormalizedPath {
        self.normalized_root().join(relative)
    }

    /// Initialise a repository at the root and stage `files`.
    pub fn track(&self, files: &[&str]) {
        repo_with_tracked_files(&self.root, files);
    }

    /// Write an untracked file.
    pub fn write(&self, relative: &str, content: &str) {
        let full = self.root.join(relative);
        fs::create_dir_all(full.parent().unwrap()).unwrap();
        fs::write(full, content).unwrap();
    }

    /// Rename every component of `from` whose spelling differs in `to`,
    /// outermost first. Both paths must have the same number of components.
    pub fn respell_on_disk(&self, from: &str, to: &str) {
        let from_parts: Vec<&str> = from.split('/').collect();
        let to_parts: Vec<&str> = to.split('/').collect();
        assert_eq!(
            from_parts.len(),
            to_parts.len(),
            "respell_on_disk: component counts differ"
        );

        let mut current = self.root.clone();
        for (old, new) in from_parts.iter().zip(&to_parts) {
            if old != new {
                fs::rename(current.join(old), current.join(new)).unwrap_or_else(|e| {
                    panic!("respell_on_disk: {old} -> {new} in {}: {e}", current.display())
                });
            }
            current = current.join(new);
        }
    }

    /// Names stored in the directory `relative` (empty for the root).
    pub fn listing(&self, relative: &str) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(self.root.join(relative))
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    /// Assert every component of `relative` is stored with exactly this
    /// spelling.
    ///
    /// # Panics
    /// Panics with the actual directory listing when a component is spelled
    /// differently or missing.
    pub fn assert_spelled_on_disk(&self, relative: &str) {
        let mut dir = String::new();
        for part in relative.split('/') {
            let names = self.listing(&dir);
            assert!(
                names.iter().any(|n| n == part),
                "Expected '{part}' in '{dir}', found {names:?}"
            );
            if !dir.is_empty() {
                dir.push('/');
            }
            dir.push_str(part);
        }
    }
}
