//! CLI command implementations

pub mod group;
pub mod init;
pub mod lifecycle;
pub mod provision;
pub mod user;

use std::path::{Path, PathBuf};

use crate::batch::BatchResult;
use crate::config::Settings;
use crate::error::{CliError, CliResult};

/// Loads the configuration file and applies environment overrides.
pub fn load_settings(path: &Path) -> CliResult<Settings> {
    if !path.exists() {
        return Err(CliError::Config(format!(
            "Config file {} not found",
            path.display()
        )));
    }

    let mut settings = Settings::from_file(path)?;
    settings.apply_env_overrides();
    Ok(settings)
}

/// Picks the input file from the command line, falling back to the config.
fn input_file(arg: Option<PathBuf>, configured: Option<&PathBuf>, section: &str) -> CliResult<PathBuf> {
    arg.or_else(|| configured.cloned()).ok_or_else(|| {
        CliError::Validation(format!(
            "No input file given and {section}.file is not set in the config"
        ))
    })
}

fn print_batch_result(result: &BatchResult, json: bool) -> CliResult<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else {
        println!();
        println!("{}", result.summary());
    }
    Ok(())
}
