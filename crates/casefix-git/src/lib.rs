//! Git access for the case mismatch fixer
//!
//! Lists tracked paths, rewrites index entries and locates repository roots.
//! Two interchangeable backends implement [`GitBackend`]: the `git` CLI and
//! libgit2.

pub mod backend;
pub mod cli;
pub mod discovery;
pub mod error;
pub mod libgit2;

pub use backend::{BackendKind, GitBackend};
pub use cli::{CommandRunner, GitCli, ProcessCommandRunner};
pub use discovery::discover_roots;
pub use error::{Error, Result};
pub use libgit2::Git2Backend;
