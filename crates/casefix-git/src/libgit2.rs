//! [`GitBackend`] that edits the index in-process through libgit2

use std::collections::HashSet;
use std::path::Path;

use git2::Repository;
use casefix_fs::NormalizedPath;

use crate::backend::GitBackend;
use crate::{Error, Result};

/// Index access without spawning `git`.
///
/// Failures on individual paths while adding are logged and skipped, the same
/// way `git add --ignore-errors` behaves.
#[derive(Debug, Default, Clone, Copy)]
pub struct Git2Backend;

fn open(root: &NormalizedPath) -> Result<Repository> {
    let repo = Repository::open(root.to_native()).map_err(|_| Error::NotARepository {
        path: root.to_native(),
    })?;
    if repo.is_bare() {
        return Err(Error::BareRepository {
            path: root.to_native(),
        });
    }
    Ok(repo)
}

impl GitBackend for Git2Backend {
    fn list_tracked_files(&self, root: &NormalizedPath) -> Result<Vec<String>> {
        let repo = open(root)?;
        let index = repo.index()?;

        // Conflicted paths appear once per stage
        let mut seen = HashSet::new();
        let paths: Vec<String> = index
            .iter()
            .map(|entry| String::from_utf8_lossy(&entry.path).into_owned())
            .filter(|path| seen.insert(path.clone()))
            .collect();

        tracing::debug!(repo = %root, count = paths.len(), "Read tracked files from index");
        Ok(paths)
    }

    fn unindex(&self, root: &NormalizedPath, paths: &[String]) -> Result<()> {
        if paths.is_empty() {
            return Ok(());
        }
        let repo = open(root)?;
        let mut index = repo.index()?;
        for path in paths {
            index.remove_path(Path::new(path))?;
        }
        index.write()?;
        Ok(())
    }

    fn reindex(&self, root: &NormalizedPath, paths: &[String]) -> Result<()> {
        if paths.is_empty() {
            return Ok(());
        }
        let repo = open(root)?;
        let mut index = repo.index()?;
        for path in paths {
            if let Err(e) = index.add_path(Path::new(path)) {
                tracing::warn!(repo = %root, path = %path, error = %e, "Failed to add path to index");
            }
        }
        index.write()?;
        Ok(())
    }
}
