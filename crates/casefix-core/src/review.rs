//! Per-entry and per-group choice of resolutions before a fix

use serde::Serialize;

use crate::entry::TrackedFileEntry;
use crate::grouping::{propagate_resolution, shortest_mismatch_ancestor};
use crate::reconcile::{FixReport, ReconciliationEngine};
use crate::scanner::ScanOutcome;
use crate::Resolution;

/// Number of entries per resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResolutionCounts {
    pub ask: usize,
    pub match_filesystem: usize,
    pub match_index: usize,
}

/// Mismatches under review, with their ancestor keys computed once.
///
/// Choosing `match-index` or `match-filesystem` for one entry carries the
/// choice to every entry under the same misspelled directory. Going back to
/// `ask` only affects the entry itself.
#[derive(Debug, Clone, Default)]
pub struct ReviewSession {
    entries: Vec<TrackedFileEntry>,
    keys: Vec<Option<String>>,
}

impl ReviewSession {
    pub fn new(entries: Vec<TrackedFileEntry>) -> Self {
        let keys = entries.iter().map(shortest_mismatch_ancestor).collect();
        Self { entries, keys }
    }

    /// Review changed mismatches first, then the others.
    pub fn from_outcome(outcome: ScanOutcome) -> Self {
        Self::new(outcome.into_entries())
    }

    pub fn entries(&self) -> &[TrackedFileEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Ancestor key of entry `index`, if its mismatch involves a directory.
    pub fn key(&self, index: usize) -> Option<&str> {
        self.keys.get(index)?.as_deref()
    }

    /// Choose `resolution` for entry `index`. Returns the number of entries
    /// updated, zero for an out-of-range index.
    pub fn set_resolution(&mut self, index: usize, resolution: Resolution) -> usize {
        propagate_resolution(&mut self.entries, &self.keys, index, resolution, true)
    }

    pub fn set_all(&mut self, resolution: Resolution) {
        for entry in &mut self.entries {
            entry.resolution = resolution;
        }
    }

    pub fn counts(&self) -> ResolutionCounts {
        let mut counts = ResolutionCounts::default();
        for entry in &self.entries {
            match entry.resolution {
                Resolution::Ask => counts.ask += 1,
                Resolution::MatchFilesystem => counts.match_filesystem += 1,
                Resolution::MatchIndex => counts.match_index += 1,
            }
        }
        counts
    }

    /// Fix every entry with its chosen resolution; `ask` entries stay as
    /// they are.
    pub fn apply(&self, engine: &ReconciliationEngine) -> FixReport {
        engine.apply_each(&self.entries)
    }

    pub fn into_entries(self) -> Vec<TrackedFileEntry> {
        self.entries
    }
}
