//! Git repository fixtures.
//!
//! Choose the lowest-realism fixture that satisfies your test's needs.

use std::fs;
use std::path::Path;
use std::process::Command;

/// Creates a minimal `.git` directory **without** initialising a real
/// repository.
///
/// Realism level: **FAKE** - enough for root discovery, useless for index
/// queries.
///
/// # Panics
/// Panics if the filesystem operations fail.
pub fn fake_git_dir(path: &Path) {
    fs::create_dir_all(path.join(".git"))
        .unwrap_or_else(|e| panic!("fake_git_dir: failed to create .git: {e}"));
    fs::write(path.join(".git/HEAD"), "ref: refs/heads/main\n")
        .unwrap_or_else(|e| panic!("fake_git_dir: failed to write HEAD: {e}"));
}

/// Initialises a real repository with `git2` and stages `files` (relative
/// paths, written with their own path as content).
///
/// Realism level: **REAL** - valid index, no commits. Both `git ls-files`
/// and libgit2 report the staged spellings.
///
/// # Panics
/// Panics if any git or filesystem operation fails.
pub fn repo_with_tracked_files(path: &Path, files: &[&str]) -> git2::Repository {
    let repo = git2::Repository::init(path).unwrap_or_else(|e| {
        panic!(
            "repo_with_tracked_files: failed to init repository at {}: {e}",
            path.display()
        )
    });

    {
        let mut index = repo
            .index()
            .unwrap_or_else(|e| panic!("repo_with_tracked_files: no index: {e}"));
        for file in files {
            let full = path.join(file);
            if let Some(parent) = full.parent() {
                fs::create_dir_all(parent).unwrap_or_else(|e| {
                    panic!("repo_with_tracked_files: failed to create {}: {e}", parent.display())
                });
            }
            fs::write(&full, file)
                .unwrap_or_else(|e| panic!("repo_with_tracked_files: failed to write {file}: {e}"));
            index
                .add_path(Path::new(file))
                .unwrap_or_else(|e| panic!("repo_with_tracked_files: failed to stage {file}: {e}"));
        }
        index
            .write()
            .unwrap_or_else(|e| panic!("repo_with_tracked_files: failed to write index: {e}"));
    }

    repo
}

/// Whether a `git` executable can be spawned. CLI-backed tests return early
/// when it cannot.
pub fn git_cli_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}
