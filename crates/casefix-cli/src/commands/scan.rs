//! `casefix scan`

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use colored::Colorize;

use casefix_core::{CancellationToken, Workspace};

use super::change_records;
use super::output::{ScanView, print_entries};
use crate::error::Result;

/// Whether tracked files beyond the given PATHs are scanned.
pub fn include_all(all: bool, changed_only: bool, has_paths: bool, configured: bool) -> bool {
    if all {
        true
    } else if changed_only {
        false
    } else if !has_paths {
        true
    } else {
        configured
    }
}

pub fn run_scan(
    root: &Path,
    paths: &[PathBuf],
    all: bool,
    changed_only: bool,
    json: bool,
) -> Result<ExitCode> {
    let workspace = Workspace::open(root)?;
    let include_all = include_all(
        all,
        changed_only,
        !paths.is_empty(),
        workspace.config().check_unmodified_files,
    );
    let changes = change_records(workspace.project_root(), paths);

    let outcome = workspace.scan(&changes, include_all, &CancellationToken::new())?;
    workspace.registry().clear_caches();

    if json {
        println!("{}", serde_json::to_string_pretty(&ScanView::from(&outcome))?);
        return Ok(ExitCode::SUCCESS);
    }

    if outcome.is_empty() {
        println!(
            "{} No mismatches between git and the file system.",
            "OK".green().bold()
        );
        return Ok(ExitCode::SUCCESS);
    }

    print_entries("Changed files", &outcome.changed_mismatches);
    print_entries("Other tracked files", &outcome.other_mismatches);
    println!();
    println!(
        "Run {} or {} to repair.",
        "casefix fix --match index".cyan(),
        "casefix fix --match filesystem".cyan()
    );
    Ok(ExitCode::SUCCESS)
}
