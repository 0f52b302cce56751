//! Init command - write a starter configuration file

use std::path::{Path, PathBuf};

use clap::Args;

use crate::config::write_starter_config;
use crate::error::CliResult;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Where to write the configuration (defaults to --config)
    #[arg(long)]
    pub path: Option<PathBuf>,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

/// Execute the init command
pub fn execute(args: InitArgs, config_path: &Path) -> CliResult<()> {
    let path = args.path.as_deref().unwrap_or(config_path);
    write_starter_config(path, args.force)?;

    println!("Wrote starter configuration to {}", path.display());
    println!();
    println!("Next steps:");
    println!("  1. Set credentials.key_file to your service account JSON key");
    println!("  2. Set credentials.delegate to an administrator account");
    println!("  3. Adjust the sales, eng and catch_all group lists");

    Ok(())
}
