//! Case-insensitive view of one repository's tracked paths

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use casefix_git::GitBackend;

use crate::entry::RepoRoot;

type PathMap = HashMap<String, String>;

/// Map from `lowercase(tracked path)` to the tracked path as the index spells
/// it.
///
/// The map is only ever replaced wholesale: a rebuild populates a fresh map
/// and swaps it in, so readers see either the previous generation or the
/// complete new one.
#[derive(Debug)]
pub struct RepositoryIndex {
    root: RepoRoot,
    files: RwLock<Option<Arc<PathMap>>>,
}

impl RepositoryIndex {
    /// An index for `root` that has not been populated yet.
    pub fn new(root: RepoRoot) -> Self {
        Self {
            root,
            files: RwLock::new(None),
        }
    }

    /// Create and populate an index in one step.
    pub fn build(root: RepoRoot, backend: &dyn GitBackend) -> Self {
        let index = Self::new(root);
        index.rebuild(backend);
        index
    }

    pub fn root(&self) -> &RepoRoot {
        &self.root
    }

    /// Re-query the tracked paths and publish them.
    ///
    /// A failing query is logged and published as an empty map; the caller
    /// sees "no tracked files" rather than an error.
    pub fn rebuild(&self, backend: &dyn GitBackend) {
        let map = match backend.list_tracked_files(self.root.path()) {
            Ok(paths) => {
                let mut map = PathMap::with_capacity(paths.len());
                for path in paths {
                    let key = path.to_lowercase();
                    if let Some(existing) = map.get(&key) {
                        tracing::debug!(
                            repo = %self.root,
                            kept = %existing,
                            dropped = %path,
                            "Index tracks paths differing only in case"
                        );
                        continue;
                    }
                    map.insert(key, path);
                }
                map
            }
            Err(e) => {
                tracing::warn!(repo = %self.root, error = %e, "Failed to list tracked files");
                PathMap::new()
            }
        };

        tracing::debug!(repo = %self.root, count = map.len(), "Built repository index");
        *self.files.write().unwrap_or_else(|p| p.into_inner()) = Some(Arc::new(map));
    }

    /// Build unless a populated generation is already published.
    pub fn ensure_built(&self, backend: &dyn GitBackend) {
        if !self.is_built() {
            self.rebuild(backend);
        }
    }

    pub fn is_built(&self) -> bool {
        self.files
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .is_some()
    }

    /// Drop the published map; the next [`ensure_built`](Self::ensure_built)
    /// repopulates from scratch.
    pub fn invalidate(&self) {
        *self.files.write().unwrap_or_else(|p| p.into_inner()) = None;
    }

    fn snapshot(&self) -> Option<Arc<PathMap>> {
        self.files.read().unwrap_or_else(|p| p.into_inner()).clone()
    }

    /// Tracked spelling for an already lowercased relative path.
    pub fn lookup(&self, lowercase_path: &str) -> Option<String> {
        self.snapshot()?.get(lowercase_path).cloned()
    }

    /// All tracked paths, sorted.
    pub fn tracked_paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self
            .snapshot()
            .map(|map| map.values().cloned().collect())
            .unwrap_or_default();
        paths.sort();
        paths
    }

    pub fn len(&self) -> usize {
        self.snapshot().map(|map| map.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use casefix_fs::NormalizedPath;
    use casefix_test_utils::memory::MemoryGit;
    use pretty_assertions::assert_eq;

    fn root() -> RepoRoot {
        RepoRoot::new("/work/repo")
    }

    #[test]
    fn lookup_is_keyed_by_lowercase_path() {
        let git = MemoryGit::new().with_repo(root().path(), &["Src/Main.java", "docs/readme.md"]);

        let index = RepositoryIndex::build(root(), &git);

        assert_eq!(index.lookup("src/main.java").as_deref(), Some("Src/Main.java"));
        assert_eq!(index.lookup("Src/Main.java"), None);
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn failing_listing_yields_empty_index() {
        let git = MemoryGit::new().with_repo(root().path(), &["a.txt"]);
        git.fail_all();

        let index = RepositoryIndex::build(root(), &git);

        assert!(index.is_built());
        assert!(index.is_empty());
        assert_eq!(index.lookup("a.txt"), None);
    }

    #[test]
    fn invalidate_forces_fresh_listing() {
        let git = MemoryGit::new().with_repo(root().path(), &["a.txt"]);
        let index = RepositoryIndex::new(root());

        index.ensure_built(&git);
        index.ensure_built(&git);
        assert_eq!(git.list_count(), 1);

        index.invalidate();
        assert!(!index.is_built());
        assert_eq!(index.lookup("a.txt"), None);

        index.ensure_built(&git);
        assert_eq!(git.list_count(), 2);
        assert_eq!(index.lookup("a.txt").as_deref(), Some("a.txt"));
    }

    #[test]
    fn case_duplicates_keep_first_listed_spelling() {
        let git = MemoryGit::new().with_repo(root().path(), &["README.md", "readme.md"]);

        let index = RepositoryIndex::build(root(), &git);

        assert_eq!(index.len(), 1);
        assert_eq!(index.lookup("readme.md").as_deref(), Some("README.md"));
    }

    #[test]
    fn tracked_paths_are_sorted() {
        let git = MemoryGit::new().with_repo(&NormalizedPath::new("/work/repo"), &["b.txt", "A.txt"]);
        let index = RepositoryIndex::build(root(), &git);
        assert_eq!(index.tracked_paths(), vec!["A.txt", "b.txt"]);
    }
}
