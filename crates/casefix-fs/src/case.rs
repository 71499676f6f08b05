//! Case sensitivity detection

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// How the filesystem treats letter case in names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CaseSensitivity {
    /// Check the directory on first use and remember the answer
    #[default]
    Detect,
    /// Names differing only in case are different entries
    Sensitive,
    /// Names differing only in case refer to the same entry
    Insensitive,
}

/// Detect whether `dir` lives on a case-sensitive filesystem.
///
/// Looks for an entry whose name changes under case swapping and checks
/// whether the swapped spelling resolves too. When the directory has no such
/// entry the platform default is assumed.
pub fn detect_case_sensitive(dir: &Path) -> bool {
    let Ok(entries) = fs::read_dir(dir) else {
        return platform_default();
    };

    let names: Vec<String> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();

    for name in &names {
        let swapped = swap_case(name);
        if swapped == *name || names.contains(&swapped) {
            continue;
        }
        let sensitive = fs::symlink_metadata(dir.join(&swapped)).is_err();
        tracing::debug!(dir = %dir.display(), sample = %name, sensitive, "Detected filesystem case sensitivity");
        return sensitive;
    }

    platform_default()
}

fn platform_default() -> bool {
    !cfg!(any(windows, target_os = "macos"))
}

fn swap_case(name: &str) -> String {
    name.chars()
        .flat_map(|c| {
            if c.is_uppercase() {
                c.to_lowercase().collect::<Vec<_>>()
            } else {
                c.to_uppercase().collect::<Vec<_>>()
            }
        })
        .collect()
}
