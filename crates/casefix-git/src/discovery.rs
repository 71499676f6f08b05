//! Repository root discovery
//!
//! Finds every git working tree that contributes files to a project
//! directory: the repository enclosing the project (if any) and every nested
//! repository below it.

use std::collections::HashSet;
use std::path::Path;

use casefix_fs::{Marker, NormalizedPath};
use git2::Repository;
use walkdir::WalkDir;

use crate::{Error, Result};

/// Discover repository roots for `project_root`.
///
/// The result is deduplicated without regard to case and ordered by path.
pub fn discover_roots(project_root: &Path) -> Result<Vec<NormalizedPath>> {
    let project_root = dunce::canonicalize(project_root).map_err(|e| Error::Discovery {
        path: project_root.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut seen = HashSet::new();
    let mut roots = Vec::new();
    let mut push = |root: NormalizedPath| {
        if seen.insert(root.dir_prefix()) {
            roots.push(root);
        }
    };

    if let Ok(repo) = Repository::discover(&project_root)
        && let Some(workdir) = repo.workdir()
    {
        push(workdir_path(workdir));
    }

    let walker = WalkDir::new(&project_root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| entry.file_name() != Marker::GitDir.as_str());

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::debug!(error = %err, root = %project_root.display(), "Skipping path during repository scan");
                continue;
            }
        };
        if !entry.file_type().is_dir() {
            continue;
        }
        if entry.path().join(Marker::GitDir.as_str()).exists() {
            push(workdir_path(entry.path()));
        }
    }

    roots.sort();
    tracing::debug!(project = %project_root.display(), count = roots.len(), "Discovered repositories");
    Ok(roots)
}

fn workdir_path(path: &Path) -> NormalizedPath {
    let canonical = dunce::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    let normalized = NormalizedPath::new(canonical);
    let trimmed = normalized.as_str().trim_end_matches('/');
    if trimmed.is_empty() {
        normalized
    } else {
        NormalizedPath::new(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn finds_top_level_and_nested_repositories() {
        let temp = TempDir::new().unwrap();
        let top = temp.path().join("project");
        let nested = top.join("vendor/lib");
        fs::create_dir_all(&nested).unwrap();
        Repository::init(&top).unwrap();
        Repository::init(&nested).unwrap();

        let roots = discover_roots(&top).unwrap();

        let expected_top = workdir_path(&top);
        let expected_nested = workdir_path(&nested);
        assert_eq!(roots, vec![expected_top, expected_nested]);
    }

    #[test]
    fn finds_enclosing_repository_of_subdirectory() {
        let temp = TempDir::new().unwrap();
        Repository::init(temp.path()).unwrap();
        let sub = temp.path().join("module");
        fs::create_dir_all(&sub).unwrap();

        let roots = discover_roots(&sub).unwrap();

        assert_eq!(roots, vec![workdir_path(temp.path())]);
    }

    #[test]
    fn missing_project_root_is_an_error() {
        let temp = TempDir::new().unwrap();
        let result = discover_roots(&temp.path().join("absent"));
        assert!(matches!(result, Err(Error::Discovery { .. })));
    }
}
