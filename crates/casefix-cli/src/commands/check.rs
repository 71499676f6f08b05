//! `casefix check`, meant to run from a pre-commit hook

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use colored::Colorize;

use casefix_core::{CancellationToken, CheckOutcome, Workspace};

use super::change_records;
use super::output::{print_changed, print_entries, print_report};
use crate::error::Result;

pub fn run_check(root: &Path, paths: &[PathBuf]) -> Result<ExitCode> {
    let workspace = Workspace::open(root)?;
    let changes = change_records(workspace.project_root(), paths);

    match workspace.pre_commit_check(&changes, &CancellationToken::new())? {
        CheckOutcome::Proceed { fixed: None } => {
            println!("{} No case mismatches.", "OK".green().bold());
            Ok(ExitCode::SUCCESS)
        }
        CheckOutcome::Proceed {
            fixed: Some(report),
        } => {
            print_report(&report);
            print_changed(workspace.project_root(), &workspace.take_dirty());
            Ok(ExitCode::SUCCESS)
        }
        CheckOutcome::NeedsReview { summary, outcome } => {
            println!("{} {}", "MISMATCH".yellow().bold(), summary);
            print_entries("Changed files", &outcome.changed_mismatches);
            print_entries("Other tracked files", &outcome.other_mismatches);
            println!();
            println!(
                "Review with {} or set {} to fix automatically.",
                "casefix fix --match index|filesystem".cyan(),
                "casefix config set fixer_action <match-index|match-filesystem>".cyan()
            );
            Ok(ExitCode::FAILURE)
        }
        CheckOutcome::Cancelled => {
            println!("{} Check cancelled.", "CANCELLED".red().bold());
            Ok(ExitCode::FAILURE)
        }
    }
}
