//! Fixer configuration
//!
//! Stored as `.casefix.toml` at the project root. Every field has a default,
//! so a missing file or a partial one is valid.

use std::path::Path;

use casefix_fs::{CaseSensitivity, ConfigStore, Marker, NormalizedPath};
use casefix_git::BackendKind;
use serde::{Deserialize, Serialize};

use crate::reconcile::BatchPolicy;
use crate::{Error, Resolution, Result};

/// Settings consumed by scans and fixes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixerConfig {
    /// Run the mismatch check at all
    pub check_file_case: bool,
    /// Include every tracked file, not just the changed ones
    pub check_unmodified_files: bool,
    /// Resolution applied without asking; `ask` defers to review
    pub fixer_action: Resolution,
    /// Override for filesystem case sensitivity detection
    pub case_sensitivity: CaseSensitivity,
    /// Which git backend talks to the index
    pub git_backend: BackendKind,
    /// How index rewrites are split into separate git invocations
    pub batch: BatchPolicy,
}

impl Default for FixerConfig {
    fn default() -> Self {
        Self {
            check_file_case: true,
            check_unmodified_files: true,
            fixer_action: Resolution::Ask,
            case_sensitivity: CaseSensitivity::Detect,
            git_backend: BackendKind::Cli,
            batch: BatchPolicy::default(),
        }
    }
}

impl FixerConfig {
    /// Location of the config file for `project_root`.
    pub fn path_for(project_root: &Path) -> NormalizedPath {
        NormalizedPath::new(project_root).join(Marker::ConfigFile.as_str())
    }

    /// Load the project config, or defaults when there is none.
    pub fn load(project_root: &Path) -> Result<Self> {
        let path = Self::path_for(project_root);
        Ok(ConfigStore::new().load_or_default(&path)?)
    }

    pub fn save(&self, project_root: &Path) -> Result<()> {
        let path = Self::path_for(project_root);
        ConfigStore::new().save(&path, self)?;
        tracing::debug!(path = %path, "Saved fixer config");
        Ok(())
    }

    /// Set one field from its textual form, as given on a command line.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let invalid = || Error::InvalidConfigValue {
            key: key.to_string(),
            value: value.to_string(),
        };
        match key {
            "check_file_case" => self.check_file_case = value.parse().map_err(|_| invalid())?,
            "check_unmodified_files" => {
                self.check_unmodified_files = value.parse().map_err(|_| invalid())?
            }
            "fixer_action" => self.fixer_action = value.parse()?,
            "batch.limit" => {
                let limit = value.parse().map_err(|_| invalid())?;
                self.batch = BatchPolicy::PathLength { limit };
            }
            "batch.size" => {
                let size: usize = value.parse().map_err(|_| invalid())?;
                if size == 0 {
                    return Err(invalid());
                }
                self.batch = BatchPolicy::Count { size };
            }
            "case_sensitivity" => {
                self.case_sensitivity = match value {
                    "detect" => CaseSensitivity::Detect,
                    "sensitive" => CaseSensitivity::Sensitive,
                    "insensitive" => CaseSensitivity::Insensitive,
                    _ => return Err(invalid()),
                }
            }
            "git_backend" => {
                self.git_backend = match value {
                    "cli" => BackendKind::Cli,
                    "libgit2" => BackendKind::Libgit2,
                    _ => return Err(invalid()),
                }
            }
            _ => return Err(invalid()),
        }
        Ok(())
    }
}
