//! Repository roots of a project and path-to-repository resolution

use std::collections::HashMap;
use std::ops::ControlFlow;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

use casefix_fs::{FileHandle, FileSystem, NormalizedPath};
use casefix_git::GitBackend;

use crate::Result;
use crate::entry::{RepoRoot, TrackedFileEntry};
use crate::index::RepositoryIndex;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Known repository roots of one project, each with its lazily built index.
///
/// Roots are kept sorted by descending prefix length, so the first root whose
/// prefix matches a directory is the most deeply nested one. Directory to
/// repository answers are cached, including "no repository".
pub struct RepositoryRegistry {
    roots: RwLock<Vec<Arc<RepositoryIndex>>>,
    dir_cache: Mutex<HashMap<String, Option<Arc<RepositoryIndex>>>>,
    backend: Arc<dyn GitBackend>,
    fs: Arc<dyn FileSystem>,
}

impl std::fmt::Debug for RepositoryRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RepositoryRegistry")
            .field("roots", &self.roots())
            .finish_non_exhaustive()
    }
}

impl RepositoryRegistry {
    /// An empty registry; add roots with [`set_roots`](Self::set_roots) or
    /// [`discover`](Self::discover).
    pub fn new(backend: Arc<dyn GitBackend>, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            roots: RwLock::new(Vec::new()),
            dir_cache: Mutex::new(HashMap::new()),
            backend,
            fs,
        }
    }

    pub fn backend(&self) -> &Arc<dyn GitBackend> {
        &self.backend
    }

    pub fn fs(&self) -> &Arc<dyn FileSystem> {
        &self.fs
    }

    /// Replace the known roots. Indexes are created unbuilt.
    pub fn set_roots(&self, roots: impl IntoIterator<Item = NormalizedPath>) {
        let mut indexes: Vec<Arc<RepositoryIndex>> = roots
            .into_iter()
            .map(|path| Arc::new(RepositoryIndex::new(RepoRoot::new(path))))
            .collect();
        indexes.sort_by(|a, b| {
            b.root()
                .prefix()
                .len()
                .cmp(&a.root().prefix().len())
                .then_with(|| a.root().cmp(b.root()))
        });
        indexes.dedup_by(|a, b| a.root().prefix() == b.root().prefix());

        tracing::debug!(count = indexes.len(), "Registered repository roots");
        *self.roots.write().unwrap_or_else(|p| p.into_inner()) = indexes;
        lock(&self.dir_cache).clear();
    }

    /// Find the repositories under (or enclosing) `project_root` and register
    /// them. Returns the number of roots found.
    pub fn discover(&self, project_root: &Path) -> Result<usize> {
        let roots = casefix_git::discover_roots(project_root)?;
        let count = roots.len();
        self.set_roots(roots);
        Ok(count)
    }

    /// React to the set of repositories having changed.
    pub fn vcs_configuration_changed(&self, roots: impl IntoIterator<Item = NormalizedPath>) {
        self.set_roots(roots);
        self.clear_caches();
    }

    /// Invalidate every index, the directory cache and the filesystem's
    /// cached listings.
    pub fn clear_caches(&self) {
        for index in self.indexes() {
            index.invalidate();
        }
        lock(&self.dir_cache).clear();
        self.fs.clear_cache();
        tracing::trace!("Cleared repository caches");
    }

    /// Registered roots, most deeply nested first.
    pub fn roots(&self) -> Vec<RepoRoot> {
        self.indexes().iter().map(|i| i.root().clone()).collect()
    }

    fn indexes(&self) -> Vec<Arc<RepositoryIndex>> {
        self.roots.read().unwrap_or_else(|p| p.into_inner()).clone()
    }

    fn owning_index(&self, dir_key: &str) -> Option<Arc<RepositoryIndex>> {
        if let Some(cached) = lock(&self.dir_cache).get(dir_key) {
            return cached.clone();
        }
        let found = self
            .indexes()
            .into_iter()
            .find(|index| index.root().contains_dir_key(dir_key));
        lock(&self.dir_cache).insert(dir_key.to_string(), found.clone());
        found
    }

    /// Index of the repository owning the file at `path`.
    ///
    /// Returns `None` outside every root and for repositories on a
    /// case-sensitive filesystem, where case mismatches cannot occur.
    pub fn repository_for(&self, path: &NormalizedPath) -> Option<Arc<RepositoryIndex>> {
        let dir = path.parent()?;
        let index = self.owning_index(&dir.dir_prefix())?;
        if self.fs.is_case_sensitive(index.root().path()) {
            return None;
        }
        Some(index)
    }

    /// Root of the repository owning `path`.
    pub fn root_for(&self, path: &NormalizedPath) -> Option<RepoRoot> {
        self.repository_for(path).map(|index| index.root().clone())
    }

    /// Entry for a resolved file, or `None` when the file is untracked or
    /// outside every repository.
    pub fn entry_for(&self, handle: &FileHandle) -> Option<TrackedFileEntry> {
        let index = self.repository_for(handle.path())?;
        let file_path = handle.path().strip_prefix_ignore_case(index.root().path())?;
        index.ensure_built(self.backend.as_ref());
        let index_path = index.lookup(&file_path.to_lowercase())?;
        Some(TrackedFileEntry::new(
            index.root().clone(),
            handle.path().clone(),
            index_path,
            file_path,
        ))
    }

    /// Call `visitor` with an entry for every tracked file that exists on
    /// disk, stopping early when it breaks.
    ///
    /// Each index is built at most once per cache generation. Tracked paths
    /// missing on disk are skipped.
    pub fn visit_all_tracked_files<B>(
        &self,
        mut visitor: impl FnMut(TrackedFileEntry) -> ControlFlow<B>,
    ) -> ControlFlow<B> {
        for index in self.indexes() {
            let root = index.root();
            if self.fs.is_case_sensitive(root.path()) {
                tracing::debug!(repo = %root, "Skipping case-sensitive repository");
                continue;
            }
            index.ensure_built(self.backend.as_ref());

            for index_path in index.tracked_paths() {
                let Some(handle) = self.fs.resolve(root.path(), &index_path) else {
                    tracing::trace!(repo = %root, path = %index_path, "Tracked file missing on disk");
                    continue;
                };
                if handle.is_dir() {
                    continue;
                }
                let Some(file_path) = handle.path().strip_prefix_ignore_case(root.path()) else {
                    continue;
                };
                let entry = TrackedFileEntry::new(
                    root.clone(),
                    handle.path().clone(),
                    index_path.as_str(),
                    file_path,
                );
                visitor(entry)?;
            }
        }
        ControlFlow::Continue(())
    }
}
