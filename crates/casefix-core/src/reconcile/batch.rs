//! Splitting index rewrites into command-line sized batches

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Aggregate path length one git invocation may carry.
pub const FILE_PATH_LIMIT: usize = 7600;

/// Paths per invocation for [`BatchPolicy::Count`].
pub const DEFAULT_BATCH_COUNT: usize = 20;

/// How `(index path, file path)` pairs are split across invocations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum BatchPolicy {
    /// Close a batch before either path list would exceed `limit` characters
    PathLength { limit: usize },
    /// At most `size` pairs per batch
    Count { size: usize },
}

impl Default for BatchPolicy {
    fn default() -> Self {
        Self::PathLength {
            limit: FILE_PATH_LIMIT,
        }
    }
}

impl BatchPolicy {
    /// Contiguous ranges over `pairs` covering every pair exactly once.
    ///
    /// Under [`PathLength`](Self::PathLength) a single pair longer than the
    /// limit still gets a batch of its own.
    pub fn batches<S: AsRef<str>>(&self, pairs: &[(S, S)]) -> Vec<Range<usize>> {
        let mut ranges = Vec::new();
        match *self {
            Self::Count { size } => {
                let size = size.max(1);
                let mut start = 0;
                while start < pairs.len() {
                    let end = (start + size).min(pairs.len());
                    ranges.push(start..end);
                    start = end;
                }
            }
            Self::PathLength { limit } => {
                let mut start = 0;
                let mut index_len = 0;
                let mut file_len = 0;
                for (i, (index_path, file_path)) in pairs.iter().enumerate() {
                    let (a, b) = (index_path.as_ref().len(), file_path.as_ref().len());
                    if i > start && (index_len + a > limit || file_len + b > limit) {
                        ranges.push(start..i);
                        start = i;
                        index_len = 0;
                        file_len = 0;
                    }
                    index_len += a;
                    file_len += b;
                }
                if start < pairs.len() {
                    ranges.push(start..pairs.len());
                }
            }
        }
        ranges
    }
}
