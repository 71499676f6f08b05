//! Grouping of mismatches under a misspelled ancestor directory

use std::collections::BTreeMap;

use crate::Resolution;
use crate::entry::TrackedFileEntry;

/// Lowercased directory prefix, with trailing slash, up to and including
/// the first directory component spelled differently in the two paths.
///
/// Only directory components are compared; `None` means the paths differ in
/// the file name alone (or not at all).
///
/// ```
/// use casefix_core::grouping::mismatch_ancestor;
///
/// assert_eq!(mismatch_ancestor("Src/Util/Foo.java", "src/Util/foo.java").as_deref(), Some("src/"));
/// assert_eq!(mismatch_ancestor("src/Foo.java", "src/foo.java"), None);
/// ```
pub fn mismatch_ancestor(index_path: &str, file_path: &str) -> Option<String> {
    let index: Vec<&str> = index_path.split('/').collect();
    let file: Vec<&str> = file_path.split('/').collect();
    let dirs = index.len().min(file.len()).saturating_sub(1);

    let first_diff = (0..dirs).find(|&i| index[i] != file[i])?;
    let mut key = file[..=first_diff].join("/").to_lowercase();
    key.push('/');
    Some(key)
}

/// [`mismatch_ancestor`] of an entry's index and on-disk paths.
pub fn shortest_mismatch_ancestor(entry: &TrackedFileEntry) -> Option<String> {
    mismatch_ancestor(entry.index_path(), entry.file_path())
}

/// Set `resolution` on `entries[changed]` and on every entry sharing its
/// ancestor key. Returns how many entries were updated.
pub fn apply_group_resolution(
    entries: &mut [TrackedFileEntry],
    changed: usize,
    resolution: Resolution,
) -> usize {
    let keys: Vec<Option<String>> = entries.iter().map(shortest_mismatch_ancestor).collect();
    propagate_resolution(entries, &keys, changed, resolution, false)
}

/// Set `resolution` on `entries[changed]` and carry it to the entries of the
/// same repository whose key in `keys` matches. With `ask_stays_local`, a
/// return to `ask` touches only the changed entry.
pub(crate) fn propagate_resolution(
    entries: &mut [TrackedFileEntry],
    keys: &[Option<String>],
    changed: usize,
    resolution: Resolution,
    ask_stays_local: bool,
) -> usize {
    let Some(target) = entries.get_mut(changed) else {
        return 0;
    };
    target.resolution = resolution;
    let repo = target.repository().clone();
    let key = match keys.get(changed) {
        Some(Some(key)) if resolution.is_automatic() || !ask_stays_local => key,
        _ => return 1,
    };

    let mut updated = 1;
    for (i, (entry, other)) in entries.iter_mut().zip(keys).enumerate() {
        if i != changed && other.as_ref() == Some(key) && entry.repository() == &repo {
            entry.resolution = resolution;
            updated += 1;
        }
    }
    updated
}

/// Entries sharing one mismatched ancestor directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MismatchGroup {
    pub key: String,
    /// Positions in the slice passed to [`groups`]
    pub members: Vec<usize>,
}

/// Group entries by ancestor key, ordered by key. Entries whose mismatch is
/// confined to the file name belong to no group.
pub fn groups(entries: &[TrackedFileEntry]) -> Vec<MismatchGroup> {
    let mut by_key: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    for (i, entry) in entries.iter().enumerate() {
        if let Some(key) = shortest_mismatch_ancestor(entry) {
            by_key.entry(key).or_default().push(i);
        }
    }
    by_key
        .into_iter()
        .map(|(key, members)| MismatchGroup { key, members })
        .collect()
}
