//! Classification of changed and tracked files into mismatches

use std::collections::HashSet;
use std::ops::ControlFlow;

use crate::cancel::CancellationToken;
use crate::entry::{ChangeRecord, TrackedFileEntry};
use crate::registry::RepositoryRegistry;
use crate::{Error, Result};

/// Mismatches found by one scan.
///
/// The two lists are disjoint; a file that is both changed and tracked is
/// only reported as changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanOutcome {
    pub changed_mismatches: Vec<TrackedFileEntry>,
    pub other_mismatches: Vec<TrackedFileEntry>,
}

impl ScanOutcome {
    pub fn is_empty(&self) -> bool {
        self.changed_mismatches.is_empty() && self.other_mismatches.is_empty()
    }

    pub fn total(&self) -> usize {
        self.changed_mismatches.len() + self.other_mismatches.len()
    }

    /// Changed mismatches followed by the others.
    pub fn into_entries(self) -> Vec<TrackedFileEntry> {
        let mut entries = self.changed_mismatches;
        entries.extend(self.other_mismatches);
        entries
    }
}

/// Compares on-disk casing against the index for a set of files.
pub struct MismatchScanner<'a> {
    registry: &'a RepositoryRegistry,
}

impl<'a> MismatchScanner<'a> {
    pub fn new(registry: &'a RepositoryRegistry) -> Self {
        Self { registry }
    }

    /// Scan `changes`, then every tracked file when `include_all` is set.
    ///
    /// `cancel` is polled before each change record and each tracked file;
    /// a cancelled scan returns [`Error::Cancelled`] and drops what it found.
    pub fn scan(
        &self,
        changes: &[ChangeRecord],
        include_all: bool,
        cancel: &CancellationToken,
    ) -> Result<ScanOutcome> {
        cancel.check()?;
        let mut outcome = ScanOutcome::default();
        let mut checked: HashSet<String> = HashSet::new();
        let fs = self.registry.fs();

        for change in changes {
            cancel.check()?;
            let Some(path) = &change.after_path else {
                continue;
            };
            let Some(handle) = fs.resolve_path(path) else {
                tracing::trace!(path = %path, "Changed file not on disk");
                continue;
            };
            if handle.is_dir() {
                continue;
            }
            if !checked.insert(handle.path().as_str().to_lowercase()) {
                continue;
            }
            if let Some(entry) = self.registry.entry_for(&handle)
                && entry.is_mismatch()
            {
                tracing::debug!(
                    index = %entry.index_path(),
                    file = %entry.file_path(),
                    "Changed file case mismatch"
                );
                outcome.changed_mismatches.push(entry);
            }
        }

        if include_all {
            let flow = self.registry.visit_all_tracked_files(|entry| {
                if cancel.is_cancelled() {
                    return ControlFlow::Break(());
                }
                if entry.is_mismatch() && checked.insert(entry.identity()) {
                    outcome.other_mismatches.push(entry);
                }
                ControlFlow::Continue(())
            });
            if flow.is_break() {
                return Err(Error::Cancelled);
            }
        }

        tracing::debug!(
            changed = outcome.changed_mismatches.len(),
            other = outcome.other_mismatches.len(),
            "Scan finished"
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use casefix_fs::{CaseSensitivity, LocalFileSystem};
    use casefix_test_utils::memory::MemoryGit;
    use casefix_test_utils::repo::TestRepo;
    use pretty_assertions::assert_eq;

    fn setup(tracked: &[&str], on_disk: &[&str]) -> (TestRepo, RepositoryRegistry) {
        let repo = TestRepo::new();
        for path in on_disk {
            repo.write(path, path);
        }
        let registry = RepositoryRegistry::new(
            Arc::new(MemoryGit::new().with_repo(&repo.normalized_root(), tracked)),
            Arc::new(LocalFileSystem::with_case_sensitivity(CaseSensitivity::Insensitive)),
        );
        registry.set_roots([repo.normalized_root()]);
        (repo, registry)
    }

    fn pairs(entries: &[TrackedFileEntry]) -> Vec<(&str, &str)> {
        entries
            .iter()
            .map(|e| (e.index_path(), e.file_path()))
            .collect()
    }

    #[test]
    fn changed_file_takes_precedence_over_all_files() {
        let (repo, registry) = setup(
            &["src/Main.java", "lib/util.rs", "same.txt"],
            &["Src/Main.java", "LIB/Util.rs", "same.txt"],
        );
        let changes = vec![ChangeRecord::from(repo.path("Src/Main.java"))];

        let outcome = MismatchScanner::new(&registry)
            .scan(&changes, true, &CancellationToken::new())
            .unwrap();

        assert_eq!(pairs(&outcome.changed_mismatches), vec![("src/Main.java", "Src/Main.java")]);
        assert_eq!(pairs(&outcome.other_mismatches), vec![("lib/util.rs", "LIB/Util.rs")]);
    }

    #[test]
    fn deletions_directories_and_duplicates_are_skipped() {
        let (repo, registry) = setup(&["A.txt"], &["a.txt", "dir/x.txt"]);
        let changes = vec![
            ChangeRecord::deleted(),
            ChangeRecord::from(repo.path("dir")),
            ChangeRecord::from(repo.path("a.txt")),
            ChangeRecord::from(repo.path("A.TXT")),
        ];

        let outcome = MismatchScanner::new(&registry)
            .scan(&changes, false, &CancellationToken::new())
            .unwrap();

        assert_eq!(pairs(&outcome.changed_mismatches), vec![("A.txt", "a.txt")]);
        assert!(outcome.other_mismatches.is_empty());
    }

    #[test]
    fn matching_files_produce_nothing_and_rescans_agree() {
        let (_repo, registry) = setup(&["docs/readme.md"], &["docs/readme.md"]);
        let scanner = MismatchScanner::new(&registry);

        let first = scanner.scan(&[], true, &CancellationToken::new()).unwrap();
        registry.clear_caches();
        let second = scanner.scan(&[], true, &CancellationToken::new()).unwrap();

        assert!(first.is_empty());
        assert_eq!(first, second);
    }

    #[test]
    fn cancelled_scan_reports_cancellation() {
        let (repo, registry) = setup(&["a.txt"], &["A.txt"]);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = MismatchScanner::new(&registry)
            .scan(&[ChangeRecord::from(repo.path("A.txt"))], true, &cancel)
            .unwrap_err();
        assert!(matches!(err, Error::Cancelled));

        let err = MismatchScanner::new(&registry)
            .scan(&[], true, &cancel)
            .unwrap_err();
        assert!(matches!(err, Error::Cancelled));
    }
}
