//! Filesystem abstraction for the case mismatch fixer
//!
//! Provides normalized paths, case-insensitive resolution of on-disk names,
//! serialized renames and format-agnostic configuration files.

pub mod case;
pub mod config;
pub mod constants;
pub mod error;
pub mod io;
pub mod local;
pub mod path;
pub mod provider;

pub use case::CaseSensitivity;
pub use config::ConfigStore;
pub use constants::Marker;
pub use error::{Error, Result};
pub use local::LocalFileSystem;
pub use path::NormalizedPath;
pub use provider::{FileHandle, FileSystem};
