//! casefix CLI
//!
//! Finds files whose letter case differs between the git index and the file
//! system, and fixes them in either direction.

mod cli;
mod commands;
mod error;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use cli::{Cli, Commands, ConfigAction};
use error::Result;

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let builder = FmtSubscriber::builder()
        .with_writer(std::io::stderr)
        .with_target(verbose);
    let result = if verbose {
        tracing::subscriber::set_global_default(builder.with_max_level(Level::DEBUG).finish())
    } else {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        tracing::subscriber::set_global_default(builder.with_env_filter(filter).finish())
    };
    if result.is_err() {
        eprintln!("{}: tracing subscriber already set", "warning".yellow());
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    tracing::debug!("Verbose mode enabled");

    let root = match cli.root {
        Some(root) => root,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Some(cmd) => execute_command(cmd, root),
        None => {
            // No command provided - show help hint
            println!(
                "{} find and fix git file name case mismatches",
                "casefix".green().bold()
            );
            println!();
            println!("Run {} for available commands.", "casefix --help".cyan());
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn execute_command(cmd: Commands, root: PathBuf) -> Result<ExitCode> {
    match cmd {
        Commands::Scan {
            all,
            changed_only,
            json,
            paths,
        } => commands::run_scan(&root, &paths, all, changed_only, json),
        Commands::Fix {
            target,
            dry_run,
            paths,
        } => commands::run_fix(&root, &paths, target.into(), dry_run),
        Commands::Check { paths } => commands::run_check(&root, &paths),
        Commands::Config { action } => match action {
            ConfigAction::Show { json } => commands::run_config_show(&root, json),
            ConfigAction::Set { key, value } => commands::run_config_set(&root, &key, &value),
        },
    }
}
