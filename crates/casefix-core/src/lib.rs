//! Case mismatch detection and reconciliation for casefix
//!
//! On a case-insensitive filesystem a file tracked by git as `Src/Foo.java`
//! can live on disk as `src/foo.java`. This crate finds such files and makes
//! the two spellings agree again:
//!
//! - **RepositoryIndex**: lowercased tracked path to tracked path, per repository
//! - **RepositoryRegistry**: repository roots and path-to-repository lookup
//! - **MismatchScanner**: changed and all-file scans into disjoint lists
//! - **ReconciliationEngine**: batched reindexing and ordered on-disk renames
//! - **Grouping**: shared misspelled ancestor directories
//!
//! # Architecture
//!
//! ```text
//!                 casefix-cli
//!                      |
//!                casefix-core
//!                      |
//!            +---------+---------+
//!            |                   |
//!       casefix-fs          casefix-git
//! ```
//!
//! # Example
//!
//! ```no_run
//! use casefix_core::{CancellationToken, Resolution, Workspace};
//!
//! fn fix_everything(root: &std::path::Path) -> casefix_core::Result<()> {
//!     let workspace = Workspace::open(root)?;
//!     let mismatches = workspace.all_mismatches(&CancellationToken::new())?;
//!     let report = workspace.fix(&mismatches, Resolution::MatchIndex);
//!     println!("fixed {}", report.fixed());
//!     Ok(())
//! }
//! ```

pub mod cancel;
pub mod check;
pub mod config;
pub mod entry;
pub mod error;
pub mod grouping;
pub mod index;
pub mod reconcile;
pub mod registry;
pub mod review;
pub mod scanner;
pub mod workspace;

pub use cancel::CancellationToken;
pub use check::{CheckOutcome, MismatchSummary, PreCommitCheck};
pub use config::FixerConfig;
pub use entry::{ChangeRecord, RepoRoot, Resolution, TrackedFileEntry};
pub use error::{Error, Result};
pub use grouping::{MismatchGroup, apply_group_resolution, shortest_mismatch_ancestor};
pub use index::RepositoryIndex;
pub use reconcile::{BatchPolicy, FixReport, PendingFix, ReconciliationEngine};
pub use registry::RepositoryRegistry;
pub use review::{ResolutionCounts, ReviewSession};
pub use scanner::{MismatchScanner, ScanOutcome};
pub use workspace::Workspace;
