//! Filesystem collaborator trait

use crate::{NormalizedPath, Result};

/// A live filesystem entry, spelled the way the directory entries on disk
/// spell it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHandle {
    path: NormalizedPath,
    is_dir: bool,
}

impl FileHandle {
    pub fn new(path: NormalizedPath, is_dir: bool) -> Self {
        Self { path, is_dir }
    }

    /// Absolute path with on-disk casing.
    pub fn path(&self) -> &NormalizedPath {
        &self.path
    }

    pub fn is_dir(&self) -> bool {
        self.is_dir
    }

    /// Final component of the path.
    pub fn name(&self) -> &str {
        self.path.file_name().unwrap_or_default()
    }
}

/// Operations the reconciliation core performs against the filesystem.
///
/// Implementations must be shareable across the scanning worker and the
/// writer that applies renames.
pub trait FileSystem: Send + Sync {
    /// Resolve `relative` below `root`, matching each component without
    /// regard to case. The returned handle carries the on-disk spelling.
    fn resolve(&self, root: &NormalizedPath, relative: &str) -> Option<FileHandle>;

    /// Resolve an absolute path, refreshing the on-disk spelling of every
    /// component.
    fn resolve_path(&self, path: &NormalizedPath) -> Option<FileHandle>;

    /// Rename the entry behind `handle` to `new_name` within the same
    /// directory, returning the handle of the renamed entry.
    fn rename(&self, handle: &FileHandle, new_name: &str) -> Result<FileHandle>;

    /// Record that `path` changed so downstream tooling re-evaluates it.
    fn mark_dirty(&self, path: &NormalizedPath);

    /// Drain the paths marked dirty since the last call, sorted.
    fn take_dirty(&self) -> Vec<NormalizedPath>;

    /// Forget cached directory listings so the next lookup reads the disk.
    fn clear_cache(&self);

    /// Whether names in `dir` are case-sensitive.
    fn is_case_sensitive(&self, dir: &NormalizedPath) -> bool;

    /// Run `mutation` as one serialized write region.
    fn write_scope(&self, mutation: &mut dyn FnMut() -> Result<()>) -> Result<()>;
}
