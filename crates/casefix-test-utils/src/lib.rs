//! Shared test utilities for the casefix workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`git`] - git repository fixtures
//! - [`memory`] - [`MemoryGit`](memory::MemoryGit), an in-memory index backend
//! - [`repo`] - [`TestRepo`](repo::TestRepo) builder for mismatch scenarios

pub mod git;
pub mod memory;
pub mod repo;
