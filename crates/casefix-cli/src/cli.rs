//! CLI argument parsing using clap derive

use std::path::PathBuf;

use casefix_core::Resolution;
use clap::{Parser, Subcommand, ValueEnum};

/// casefix - Find and fix letter-case mismatches between git and the file system
#[derive(Parser, Debug)]
#[command(name = "casefix")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Project directory to operate on (defaults to the current directory)
    #[arg(short = 'C', long, global = true, env = "CASEFIX_ROOT")]
    pub root: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// List files whose on-disk casing differs from the git index
    ///
    /// With PATHs, those files are checked as the change set; tracked files
    /// are added according to --all, --changed-only or the config.
    ///
    /// Examples:
    ///   casefix scan                  # Every tracked file
    ///   casefix scan src/Main.java    # One changed file plus the rest
    ///   casefix scan --changed-only a.txt b.txt
    Scan {
        /// Also scan every tracked file
        #[arg(long, conflicts_with = "changed_only")]
        all: bool,

        /// Only scan the given PATHs
        #[arg(long)]
        changed_only: bool,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,

        /// Changed files to check first
        paths: Vec<PathBuf>,
    },

    /// Make git and the file system agree on casing
    ///
    /// Examples:
    ///   casefix fix --match index          # Git adopts the on-disk names
    ///   casefix fix --match filesystem     # Rename files to the git names
    ///   casefix fix --match index --dry-run
    Fix {
        /// Which side should change
        #[arg(long = "match", value_enum)]
        target: MatchTarget,

        /// Preview fixes without applying them
        #[arg(long)]
        dry_run: bool,

        /// Restrict the fix to these files
        paths: Vec<PathBuf>,
    },

    /// Pre-commit check: fix or report mismatches among PATHs
    ///
    /// Follows `fixer_action` from the config. Exits with status 1 when
    /// mismatches need review.
    Check {
        /// Files about to be committed
        paths: Vec<PathBuf>,
    },

    /// Show or change the project configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Side of a mismatch that gets rewritten
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTarget {
    /// Rewrite the index to the on-disk casing
    Index,
    /// Rename on-disk entries to the index casing
    Filesystem,
}

impl From<MatchTarget> for Resolution {
    fn from(target: MatchTarget) -> Self {
        match target {
            MatchTarget::Index => Resolution::MatchIndex,
            MatchTarget::Filesystem => Resolution::MatchFilesystem,
        }
    }
}

/// Config subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Set one key, e.g. `fixer_action match-index` or `batch.size 20`
    Set { key: String, value: String },
}
