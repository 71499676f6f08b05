//! Human and JSON rendering of mismatches

use std::path::{Path, PathBuf};

use colored::Colorize;
use serde::Serialize;

use casefix_core::{FixReport, ScanOutcome, TrackedFileEntry, shortest_mismatch_ancestor};

/// One mismatch as printed in JSON output.
#[derive(Debug, Serialize)]
pub struct EntryView {
    pub repository: String,
    pub index_path: String,
    pub file_path: String,
    /// Misspelled ancestor directory shared with other entries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<String>,
}

impl From<&TrackedFileEntry> for EntryView {
    fn from(entry: &TrackedFileEntry) -> Self {
        Self {
            repository: entry.repository().to_string(),
            index_path: entry.index_path().to_string(),
            file_path: entry.file_path().to_string(),
            directory: shortest_mismatch_ancestor(entry),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ScanView {
    pub changed: Vec<EntryView>,
    pub other: Vec<EntryView>,
}

impl From<&ScanOutcome> for ScanView {
    fn from(outcome: &ScanOutcome) -> Self {
        Self {
            changed: outcome.changed_mismatches.iter().map(EntryView::from).collect(),
            other: outcome.other_mismatches.iter().map(EntryView::from).collect(),
        }
    }
}

/// Print one section of mismatches under `title`.
pub fn print_entries(title: &str, entries: &[TrackedFileEntry]) {
    if entries.is_empty() {
        return;
    }
    println!("{} ({}):", title.bold(), entries.len());
    for entry in entries {
        let directory = shortest_mismatch_ancestor(entry)
            .map(|key| format!("  [{key}]").dimmed().to_string())
            .unwrap_or_default();
        println!(
            "   {} {} {} {}{}",
            "!".yellow(),
            entry.index_path().cyan(),
            "->".dimmed(),
            entry.file_path(),
            directory
        );
    }
}

pub fn print_report(report: &FixReport) {
    if report.reindexed > 0 {
        println!("{} Reindexed {} file(s).", "OK".green().bold(), report.reindexed);
    }
    if report.renamed > 0 {
        println!("{} Renamed {} file(s).", "OK".green().bold(), report.renamed);
    }
    if report.skipped > 0 {
        println!("{} Skipped {} undecided file(s).", "--".dimmed(), report.skipped);
    }
    for error in &report.errors {
        println!("   {} {}", "x".red(), error);
    }
}

/// List paths renamed on disk, relative to `root` where possible.
pub fn print_changed(root: &Path, paths: &[PathBuf]) {
    if paths.is_empty() {
        return;
    }
    println!("{} ({}):", "Changed on disk".bold(), paths.len());
    for path in paths {
        let shown = path.strip_prefix(root).unwrap_or(path);
        println!("   {} {}", "~".green(), shown.display());
    }
}
