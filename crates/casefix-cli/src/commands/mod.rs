//! Command implementations for casefix-cli

pub mod check;
pub mod config;
pub mod fix;
pub mod output;
pub mod scan;

pub use check::run_check;
pub use config::{run_config_set, run_config_show};
pub use fix::run_fix;
pub use scan::run_scan;

use std::path::{Path, PathBuf};

use casefix_core::ChangeRecord;

/// Change records for command-line PATHs, resolved against `root`.
///
/// Paths that cannot be canonicalized (for instance deleted files) are kept
/// as given; the scanner skips whatever is not on disk.
pub fn change_records(root: &Path, paths: &[PathBuf]) -> Vec<ChangeRecord> {
    paths
        .iter()
        .map(|path| {
            let joined = if path.is_absolute() {
                path.clone()
            } else {
                root.join(path)
            };
            let resolved = dunce::canonicalize(&joined).unwrap_or(joined);
            ChangeRecord::from(resolved.as_path())
        })
        .collect()
}
