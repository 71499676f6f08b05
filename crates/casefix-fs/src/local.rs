//! [`FileSystem`] implementation backed by the local disk

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::case::{CaseSensitivity, detect_case_sensitive};
use crate::provider::{FileHandle, FileSystem};
use crate::{Error, NormalizedPath, Result};

/// Names stored in one directory, indexed for exact and case-folded lookup.
#[derive(Debug, Default)]
struct DirListing {
    exact: HashSet<String>,
    /// `lowercase(name) -> name`; the first spelling read wins
    folded: HashMap<String, String>,
}

impl DirListing {
    fn read(dir: &Path) -> std::io::Result<Self> {
        let mut listing = Self::default();
        for entry in fs::read_dir(dir)?.filter_map(|e| e.ok()) {
            let name = entry.file_name().to_string_lossy().into_owned();
            listing
                .folded
                .entry(name.to_lowercase())
                .or_insert_with(|| name.clone());
            listing.exact.insert(name);
        }
        Ok(listing)
    }

    fn find(&self, name: &str) -> Option<&str> {
        if let Some(exact) = self.exact.get(name) {
            return Some(exact);
        }
        self.folded.get(&name.to_lowercase()).map(String::as_str)
    }
}

/// Local filesystem access with case-insensitive name resolution.
///
/// Directory entries are matched against a listing of the parent directory,
/// so the returned handles always report the spelling stored on disk even
/// when the caller asked with a different one. Each directory is listed once
/// until [`clear_cache`](FileSystem::clear_cache) or a rename inside it.
#[derive(Debug, Default)]
pub struct LocalFileSystem {
    sensitivity: CaseSensitivity,
    detected: Mutex<HashMap<NormalizedPath, bool>>,
    listings: Mutex<HashMap<NormalizedPath, Arc<DirListing>>>,
    dirty: Mutex<BTreeSet<NormalizedPath>>,
    writer: Mutex<()>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl LocalFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a fixed case sensitivity instead of detecting it per directory.
    pub fn with_case_sensitivity(sensitivity: CaseSensitivity) -> Self {
        Self {
            sensitivity,
            ..Self::default()
        }
    }

    /// Cached listing of `dir`, read on first use.
    fn listing(&self, dir: &NormalizedPath) -> Option<Arc<DirListing>> {
        if let Some(listing) = lock(&self.listings).get(dir) {
            return Some(Arc::clone(listing));
        }
        let listing = Arc::new(DirListing::read(&dir_native(dir)).ok()?);
        lock(&self.listings).insert(dir.clone(), Arc::clone(&listing));
        Some(listing)
    }

    /// Drop the cached listings of `dir` and of everything below it.
    fn forget_listings(&self, dir: &NormalizedPath) {
        lock(&self.listings).retain(|cached, _| !cached.starts_with_ignore_case(dir));
    }

    /// Find the on-disk spelling of `name` inside `dir`.
    fn match_component(&self, dir: &NormalizedPath, name: &str) -> Option<String> {
        let exists_as_asked = || {
            fs::symlink_metadata(dir_native(dir).join(name))
                .ok()
                .map(|_| name.to_string())
        };
        if self.is_case_sensitive(dir) {
            return exists_as_asked();
        }
        match self.listing(dir) {
            Some(listing) => listing.find(name).map(str::to_string),
            // Unlistable ancestors (e.g. traverse-only permissions) keep the caller's spelling
            None => exists_as_asked(),
        }
    }

    fn walk<'a>(
        &self,
        mut current: NormalizedPath,
        components: impl Iterator<Item = &'a str>,
    ) -> Option<FileHandle> {
        for component in components {
            if component == "." {
                continue;
            }
            let actual = self.match_component(&current, component)?;
            current = current.join(&actual);
        }
        let meta = fs::metadata(current.to_native()).ok()?;
        Some(FileHandle::new(current, meta.is_dir()))
    }

    fn listing_contains(dir: &Path, name: &str) -> bool {
        fs::read_dir(dir)
            .map(|entries| {
                entries
                    .filter_map(|e| e.ok())
                    .any(|e| e.file_name().to_string_lossy() == name)
            })
            .unwrap_or(false)
    }
}

/// Native directory for a normalized path, treating the empty path as the
/// current directory.
fn dir_native(dir: &NormalizedPath) -> PathBuf {
    if dir.as_str().is_empty() {
        PathBuf::from(".")
    } else {
        dir.to_native()
    }
}

/// Split an absolute path into its anchor (`/`, `C:/` or empty) and the
/// remaining components.
fn split_anchor(path: &NormalizedPath) -> (NormalizedPath, Vec<&str>) {
    let mut components: Vec<&str> = path.components().collect();
    if path.as_str().starts_with('/') {
        return (NormalizedPath::new("/"), components);
    }
    if let Some(first) = components.first()
        && first.ends_with(':')
    {
        let anchor = NormalizedPath::new(format!("{first}/"));
        components.remove(0);
        return (anchor, components);
    }
    (NormalizedPath::new(""), components)
}

impl FileSystem for LocalFileSystem {
    fn resolve(&self, root: &NormalizedPath, relative: &str) -> Option<FileHandle> {
        let relative = NormalizedPath::new(relative);
        self.walk(root.clone(), relative.components())
    }

    fn resolve_path(&self, path: &NormalizedPath) -> Option<FileHandle> {
        let (anchor, components) = split_anchor(path);
        self.walk(anchor, components.into_iter())
    }

    fn rename(&self, handle: &FileHandle, new_name: &str) -> Result<FileHandle> {
        let from = handle.path().to_native();
        if new_name.is_empty() || new_name.contains(['/', '\\']) {
            return Err(Error::InvalidRename {
                path: from,
                message: format!("'{new_name}' is not a single path component"),
            });
        }
        let parent = handle.path().parent().ok_or_else(|| Error::InvalidRename {
            path: from.clone(),
            message: "entry has no parent directory".into(),
        })?;
        if handle.name() == new_name {
            return Ok(handle.clone());
        }

        let target = parent.join(new_name);
        let to = target.to_native();
        if Self::listing_contains(&parent.to_native(), new_name) {
            return Err(Error::InvalidRename {
                path: from,
                message: format!("a separate entry named '{new_name}' already exists"),
            });
        }

        if let Err(e) = fs::rename(&from, &to) {
            if handle.name().to_lowercase() != new_name.to_lowercase() {
                return Err(Error::io(&from, e));
            }
            // Some filesystems refuse case-only renames; hop through a temporary name
            let hop = parent
                .join(&format!(".{}.casefix-{}", handle.name(), std::process::id()))
                .to_native();
            fs::rename(&from, &hop).map_err(|_| Error::io(&from, e))?;
            fs::rename(&hop, &to).map_err(|e| Error::io(&to, e))?;
        }

        self.forget_listings(&parent);
        if handle.is_dir() {
            self.forget_listings(handle.path());
        }
        tracing::debug!(from = %handle.path(), to = %target, "Renamed entry");
        Ok(FileHandle::new(target, handle.is_dir()))
    }

    fn mark_dirty(&self, path: &NormalizedPath) {
        lock(&self.dirty).insert(path.clone());
    }

    fn take_dirty(&self) -> Vec<NormalizedPath> {
        std::mem::take(&mut *lock(&self.dirty)).into_iter().collect()
    }

    fn clear_cache(&self) {
        lock(&self.listings).clear();
    }

    fn is_case_sensitive(&self, dir: &NormalizedPath) -> bool {
        match self.sensitivity {
            CaseSensitivity::Sensitive => true,
            CaseSensitivity::Insensitive => false,
            CaseSensitivity::Detect => {
                if let Some(known) = lock(&self.detected).get(dir) {
                    return *known;
                }
                let sensitive = detect_case_sensitive(&dir_native(dir));
                lock(&self.detected).insert(dir.clone(), sensitive);
                sensitive
            }
        }
    }

    fn write_scope(&self, mutation: &mut dyn FnMut() -> Result<()>) -> Result<()> {
        let _guard = lock(&self.writer);
        mutation()
    }
}
