//! Pre-commit check: scan the pending change set and fix or report

use std::fmt;

use serde::Serialize;

use crate::cancel::CancellationToken;
use crate::config::FixerConfig;
use crate::entry::ChangeRecord;
use crate::reconcile::{FixReport, ReconciliationEngine};
use crate::registry::RepositoryRegistry;
use crate::scanner::{MismatchScanner, ScanOutcome};
use crate::{Error, Result};

/// Mismatch counts shown before a commit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MismatchSummary {
    pub changed: usize,
    pub other: usize,
}

impl MismatchSummary {
    pub fn of(outcome: &ScanOutcome) -> Self {
        Self {
            changed: outcome.changed_mismatches.len(),
            other: outcome.other_mismatches.len(),
        }
    }

    pub fn total(&self) -> usize {
        self.changed + self.other
    }
}

fn files(n: usize) -> &'static str {
    if n == 1 { "file differs" } else { "files differ" }
}

impl fmt::Display for MismatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.changed, self.other) {
            (0, 0) => write!(f, "No case mismatches between git and the file system"),
            (0, other) => write!(
                f,
                "{other} unmodified {} in case between git and the file system",
                files(other)
            ),
            (changed, 0) => write!(
                f,
                "{changed} changed {} in case between git and the file system",
                files(changed)
            ),
            (changed, other) => write!(
                f,
                "{changed} changed and {other} unmodified {} in case between git and the file system",
                files(changed + other)
            ),
        }
    }
}

/// Result of a pre-commit check.
#[derive(Debug)]
pub enum CheckOutcome {
    /// Nothing blocks the commit; `fixed` reports an automatic fix
    Proceed { fixed: Option<FixReport> },
    /// Mismatches await a decision
    NeedsReview {
        summary: MismatchSummary,
        outcome: ScanOutcome,
    },
    /// The scan was cancelled
    Cancelled,
}

/// Check run before a commit, driven by [`FixerConfig`].
pub struct PreCommitCheck<'a> {
    registry: &'a RepositoryRegistry,
    engine: &'a ReconciliationEngine,
    config: &'a FixerConfig,
}

impl<'a> PreCommitCheck<'a> {
    pub fn new(
        registry: &'a RepositoryRegistry,
        engine: &'a ReconciliationEngine,
        config: &'a FixerConfig,
    ) -> Self {
        Self {
            registry,
            engine,
            config,
        }
    }

    /// Scan `changes` (and every tracked file when configured) and either
    /// fix the mismatches with the configured resolution or hand them back
    /// for review.
    ///
    /// Caches are cleared before the scan and again once the cycle is over.
    pub fn run(&self, changes: &[ChangeRecord], cancel: &CancellationToken) -> Result<CheckOutcome> {
        if !self.config.check_file_case {
            return Ok(CheckOutcome::Proceed { fixed: None });
        }

        self.registry.clear_caches();
        let scanned = MismatchScanner::new(self.registry).scan(
            changes,
            self.config.check_unmodified_files,
            cancel,
        );
        let outcome = match scanned {
            Ok(outcome) => outcome,
            Err(Error::Cancelled) => {
                tracing::info!("Case check cancelled");
                self.registry.clear_caches();
                return Ok(CheckOutcome::Cancelled);
            }
            Err(e) => {
                self.registry.clear_caches();
                return Err(e);
            }
        };

        let result = if outcome.is_empty() {
            CheckOutcome::Proceed { fixed: None }
        } else if self.config.fixer_action.is_automatic() {
            let resolution = self.config.fixer_action;
            let mut report = self.engine.apply(&outcome.changed_mismatches, resolution);
            report.merge(self.engine.apply(&outcome.other_mismatches, resolution));
            tracing::info!(
                fixed = report.fixed(),
                failed = report.errors.len(),
                %resolution,
                "Fixed case mismatches before commit"
            );
            CheckOutcome::Proceed {
                fixed: Some(report),
            }
        } else {
            CheckOutcome::NeedsReview {
                summary: MismatchSummary::of(&outcome),
                outcome,
            }
        };

        self.registry.clear_caches();
        Ok(result)
    }
}
