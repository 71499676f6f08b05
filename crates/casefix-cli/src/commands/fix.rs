//! `casefix fix`

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use colored::Colorize;

use casefix_core::{CancellationToken, Resolution, Workspace};

use super::change_records;
use super::output::{print_changed, print_entries, print_report};
use crate::error::Result;

pub fn run_fix(
    root: &Path,
    paths: &[PathBuf],
    resolution: Resolution,
    dry_run: bool,
) -> Result<ExitCode> {
    let workspace = Workspace::open(root)?;
    let changes = change_records(workspace.project_root(), paths);

    let outcome = workspace.scan(&changes, paths.is_empty(), &CancellationToken::new())?;
    if outcome.is_empty() {
        workspace.registry().clear_caches();
        println!("{} Nothing to fix.", "OK".green().bold());
        return Ok(ExitCode::SUCCESS);
    }

    let entries = outcome.into_entries();
    if dry_run {
        workspace.registry().clear_caches();
        let verb = match resolution {
            Resolution::MatchIndex => "reindex",
            _ => "rename on disk",
        };
        print_entries(&format!("Would {verb}"), &entries);
        return Ok(ExitCode::SUCCESS);
    }

    println!(
        "{} Fixing {} file(s) ({})...",
        "=>".blue().bold(),
        entries.len(),
        resolution
    );
    let report = workspace.fix(&entries, resolution);
    print_report(&report);
    print_changed(workspace.project_root(), &workspace.take_dirty());

    if report.is_clean() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
