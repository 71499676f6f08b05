//! Applying a resolution to mismatched entries
//!
//! Two directions exist. [`Resolution::MatchIndex`] removes each entry from
//! the index by its tracked path and adds it back by its on-disk path, in
//! batches sized by [`BatchPolicy`]. [`Resolution::MatchFilesystem`] renames
//! the on-disk entry, and any ancestor directory spelled differently, to the
//! tracked casing. Entries left at [`Resolution::Ask`] are never touched.
//!
//! Neither direction is transactional: every batch or entry stands alone,
//! failures are logged into the [`FixReport`], and a later scan picks up
//! whatever is still mismatched.

mod batch;
mod rename;

pub use batch::{BatchPolicy, DEFAULT_BATCH_COUNT, FILE_PATH_LIMIT};
pub use rename::PendingFix;

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use casefix_fs::FileSystem;
use casefix_git::GitBackend;
use serde::Serialize;

use crate::Resolution;
use crate::entry::{RepoRoot, TrackedFileEntry};
use rename::{RenameWriter, rename_entries};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Outcome of one reconciliation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FixReport {
    /// Entries whose index record was rewritten
    pub reindexed: usize,
    /// Entries renamed on disk
    pub renamed: usize,
    /// Entries left alone because they were unresolved
    pub skipped: usize,
    /// One message per failed batch or entry
    pub errors: Vec<String>,
}

impl FixReport {
    pub fn merge(&mut self, other: FixReport) {
        self.reindexed += other.reindexed;
        self.renamed += other.renamed;
        self.skipped += other.skipped;
        self.errors.extend(other.errors);
    }

    pub fn fixed(&self) -> usize {
        self.reindexed + self.renamed
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Executes resolutions against the index and the filesystem.
///
/// One engine serves one workspace. Index rewrites hold an in-flight lock for
/// their whole run; renames are queued to a single writer thread that is
/// started on first use.
pub struct ReconciliationEngine {
    backend: Arc<dyn GitBackend>,
    fs: Arc<dyn FileSystem>,
    batch: BatchPolicy,
    in_flight: Mutex<()>,
    writer: Mutex<Option<RenameWriter>>,
}

impl std::fmt::Debug for ReconciliationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReconciliationEngine")
            .field("batch", &self.batch)
            .finish_non_exhaustive()
    }
}

impl ReconciliationEngine {
    pub fn new(backend: Arc<dyn GitBackend>, fs: Arc<dyn FileSystem>, batch: BatchPolicy) -> Self {
        Self {
            backend,
            fs,
            batch,
            in_flight: Mutex::new(()),
            writer: Mutex::new(None),
        }
    }

    pub fn batch_policy(&self) -> BatchPolicy {
        self.batch
    }

    /// Apply one resolution to all `entries`, blocking until done.
    pub fn apply(&self, entries: &[TrackedFileEntry], resolution: Resolution) -> FixReport {
        match resolution {
            Resolution::Ask => FixReport {
                skipped: entries.len(),
                ..FixReport::default()
            },
            Resolution::MatchIndex => self.reindex(entries),
            Resolution::MatchFilesystem => self.rename_deferred(entries.to_vec()).wait(),
        }
    }

    /// Apply each entry's own resolution; unresolved entries are skipped.
    pub fn apply_each(&self, entries: &[TrackedFileEntry]) -> FixReport {
        let mut to_reindex = Vec::new();
        let mut to_rename = Vec::new();
        let mut report = FixReport::default();
        for entry in entries {
            match entry.resolution {
                Resolution::Ask => report.skipped += 1,
                Resolution::MatchIndex => to_reindex.push(entry.clone()),
                Resolution::MatchFilesystem => to_rename.push(entry.clone()),
            }
        }

        if !to_reindex.is_empty() {
            report.merge(self.reindex(&to_reindex));
        }
        if !to_rename.is_empty() {
            report.merge(self.rename_deferred(to_rename).wait());
        }
        report
    }

    /// Rewrite index records so they carry the on-disk casing.
    pub fn reindex(&self, entries: &[TrackedFileEntry]) -> FixReport {
        let _guard = lock(&self.in_flight);
        let mut report = FixReport::default();

        let mut by_repo: BTreeMap<&RepoRoot, Vec<&TrackedFileEntry>> = BTreeMap::new();
        for entry in entries {
            by_repo.entry(entry.repository()).or_default().push(entry);
        }

        for (root, entries) in by_repo {
            let pairs: Vec<(&str, &str)> = entries
                .iter()
                .map(|e| (e.index_path(), e.file_path()))
                .collect();

            for range in self.batch.batches(&pairs) {
                let batch = &pairs[range];
                let index_paths: Vec<String> = batch.iter().map(|p| p.0.to_string()).collect();
                let file_paths: Vec<String> = batch.iter().map(|p| p.1.to_string()).collect();
                tracing::debug!(repo = %root, count = batch.len(), "Reindexing batch");

                if let Err(e) = self.backend.unindex(root.path(), &index_paths) {
                    tracing::warn!(repo = %root, error = %e, "Failed to remove paths from index");
                    report.errors.push(format!("{root}: {e}"));
                    continue;
                }
                if let Err(e) = self.backend.reindex(root.path(), &file_paths) {
                    tracing::warn!(repo = %root, error = %e, "Failed to add paths to index");
                    report.errors.push(format!("{root}: {e}"));
                    continue;
                }
                report.reindexed += batch.len();
            }
        }
        report
    }

    /// Queue renames towards the index casing and return without waiting.
    ///
    /// Jobs run in submission order on the writer thread. If the writer
    /// cannot be started the renames run on the calling thread instead.
    pub fn rename_deferred(&self, entries: Vec<TrackedFileEntry>) -> PendingFix {
        let mut writer = lock(&self.writer);
        if writer.is_none() {
            match RenameWriter::spawn(Arc::clone(&self.fs)) {
                Ok(spawned) => *writer = Some(spawned),
                Err(e) => {
                    tracing::warn!(error = %e, "Could not start rename writer; renaming inline");
                }
            }
        }

        let entries = match writer.as_ref() {
            Some(w) => match w.submit(entries) {
                Ok(pending) => return pending,
                Err(entries) => entries,
            },
            None => entries,
        };
        PendingFix::Ready(rename_entries(self.fs.as_ref(), &entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use casefix_fs::{CaseSensitivity, LocalFileSystem};
    use casefix_test_utils::memory::{GitCall, MemoryGit};
    use casefix_test_utils::repo::TestRepo;
    use pretty_assertions::assert_eq;

    fn entry(root: &RepoRoot, index_path: &str, file_path: &str) -> TrackedFileEntry {
        TrackedFileEntry::new(
            root.clone(),
            root.path().join(file_path),
            index_path,
            file_path,
        )
    }

    fn insensitive() -> Arc<LocalFileSystem> {
        Arc::new(LocalFileSystem::with_case_sensitivity(CaseSensitivity::Insensitive))
    }

    #[test]
    fn reindex_removes_by_index_path_then_adds_by_file_path() {
        let root = RepoRoot::new("/r");
        let git = Arc::new(MemoryGit::new().with_repo(root.path(), &["Src/A.java"]));
        let engine = ReconciliationEngine::new(git.clone(), insensitive(), BatchPolicy::default());

        let report = engine.apply(&[entry(&root, "Src/A.java", "src/A.java")], Resolution::MatchIndex);

        assert_eq!(report.reindexed, 1);
        assert_eq!(
            git.calls(),
            vec![
                GitCall::Unindex("/r".into(), vec!["Src/A.java".into()]),
                GitCall::Reindex("/r".into(), vec!["src/A.java".into()]),
            ]
        );
        assert_eq!(git.tracked(root.path()), vec!["src/A.java"]);
    }

    #[test]
    fn reindex_groups_by_repository_and_batches() {
        let a = RepoRoot::new("/a");
        let b = RepoRoot::new("/b");
        let git = Arc::new(MemoryGit::new());
        let engine = ReconciliationEngine::new(
            git.clone(),
            insensitive(),
            BatchPolicy::Count { size: 2 },
        );
        let entries = vec![
            entry(&a, "X1", "x1"),
            entry(&b, "Y1", "y1"),
            entry(&a, "X2", "x2"),
            entry(&a, "X3", "x3"),
        ];

        let report = engine.apply(&entries, Resolution::MatchIndex);

        assert_eq!(report.reindexed, 4);
        let unindexed: Vec<_> = git
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                GitCall::Unindex(root, paths) => Some((root, paths)),
                _ => None,
            })
            .collect();
        assert_eq!(
            unindexed,
            vec![
                ("/a".to_string(), vec!["X1".to_string(), "X2".to_string()]),
                ("/a".to_string(), vec!["X3".to_string()]),
                ("/b".to_string(), vec!["Y1".to_string()]),
            ]
        );
    }

    #[test]
    fn failing_backend_is_reported_not_raised() {
        let root = RepoRoot::new("/r");
        let git = Arc::new(MemoryGit::new());
        git.fail_all();
        let engine = ReconciliationEngine::new(git.clone(), insensitive(), BatchPolicy::Count { size: 1 });

        let report = engine.apply(
            &[entry(&root, "A", "a"), entry(&root, "B", "b")],
            Resolution::MatchIndex,
        );

        assert_eq!(report.reindexed, 0);
        assert_eq!(report.errors.len(), 2);
        // No add after a failed remove
        assert!(git.calls().iter().all(|c| matches!(c, GitCall::Unindex(..))));
    }

    #[test]
    fn ask_entries_are_left_alone() {
        let root = RepoRoot::new("/r");
        let git = Arc::new(MemoryGit::new());
        let engine = ReconciliationEngine::new(git.clone(), insensitive(), BatchPolicy::default());
        let entries = vec![entry(&root, "A", "a")];

        assert_eq!(engine.apply(&entries, Resolution::Ask).skipped, 1);
        assert_eq!(engine.apply_each(&entries).skipped, 1);
        assert!(git.calls().is_empty());
    }

    #[test]
    fn rename_fixes_parent_before_child() {
        let repo = TestRepo::new();
        repo.write("DOCS/ReadMe.md", "# docs");
        let root = RepoRoot::new(repo.normalized_root());
        let fs = insensitive();
        let engine = ReconciliationEngine::new(Arc::new(MemoryGit::new()), fs.clone(), BatchPolicy::default());

        let report = engine.apply(
            &[entry(&root, "docs/readme.md", "DOCS/ReadMe.md")],
            Resolution::MatchFilesystem,
        );

        assert_eq!(report.renamed, 1, "{:?}", report.errors);
        repo.assert_spelled_on_disk("docs/readme.md");
        assert_eq!(fs.take_dirty(), vec![repo.path("docs/readme.md")]);
    }

    #[test]
    fn rename_of_missing_file_is_logged_and_skipped() {
        let repo = TestRepo::new();
        repo.write("B.txt", "b");
        let root = RepoRoot::new(repo.normalized_root());
        let engine = ReconciliationEngine::new(Arc::new(MemoryGit::new()), insensitive(), BatchPolicy::default());

        let report = engine.apply(
            &[entry(&root, "a.txt", "A.txt"), entry(&root, "b.txt", "B.txt")],
            Resolution::MatchFilesystem,
        );

        assert_eq!(report.renamed, 1);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].contains("was not found by relative path A.txt"));
        repo.assert_spelled_on_disk("b.txt");
    }

    #[test]
    fn deferred_renames_complete_in_order() {
        let repo = TestRepo::new();
        repo.write("LIB/One.rs", "1");
        repo.write("LIB/Two.rs", "2");
        let root = RepoRoot::new(repo.normalized_root());
        let engine = ReconciliationEngine::new(Arc::new(MemoryGit::new()), insensitive(), BatchPolicy::default());

        let first = engine.rename_deferred(vec![entry(&root, "lib/one.rs", "LIB/One.rs")]);
        let second = engine.rename_deferred(vec![entry(&root, "lib/two.rs", "LIB/Two.rs")]);

        assert_eq!(first.wait().renamed, 1);
        assert_eq!(second.wait().renamed, 1);
        repo.assert_spelled_on_disk("lib/one.rs");
        repo.assert_spelled_on_disk("lib/two.rs");
        assert_eq!(repo.listing(""), vec!["lib"]);
    }
}
