//! `casefix config show|set`

use std::path::Path;
use std::process::ExitCode;

use colored::Colorize;

use casefix_core::FixerConfig;

use crate::error::Result;

/// Display the effective configuration
pub fn run_config_show(root: &Path, json: bool) -> Result<ExitCode> {
    let config = FixerConfig::load(root)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(ExitCode::SUCCESS);
    }

    println!(
        "{} {}",
        "Configuration".bold(),
        FixerConfig::path_for(root).as_str().dimmed()
    );
    println!();
    print!("{}", toml::to_string_pretty(&config)?);
    Ok(ExitCode::SUCCESS)
}

/// Change one key and save
pub fn run_config_set(root: &Path, key: &str, value: &str) -> Result<ExitCode> {
    let mut config = FixerConfig::load(root)?;
    config.set(key, value)?;
    config.save(root)?;

    println!("{} {} = {}", "OK".green().bold(), key.cyan(), value);
    Ok(ExitCode::SUCCESS)
}
