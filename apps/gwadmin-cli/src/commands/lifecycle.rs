//! Lifecycle command - apply one account action to every address in a file

use std::path::{Path, PathBuf};

use clap::Args;

use crate::batch::{read_identifiers, run_lifecycle, LifecycleAction};
use crate::commands::{input_file, load_settings, print_batch_result};
use crate::error::CliResult;

/// Arguments for the lifecycle command
#[derive(Args, Debug)]
pub struct LifecycleArgs {
    /// File with one email per line (defaults to batch.file)
    pub file: Option<PathBuf>,

    /// Action to apply (defaults to batch.action)
    #[arg(long, value_enum)]
    pub action: Option<LifecycleAction>,

    /// Print the run summary as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute the lifecycle command
pub async fn execute(args: LifecycleArgs, config_path: &Path) -> CliResult<()> {
    let settings = load_settings(config_path)?;
    let file = input_file(args.file, settings.batch.file.as_ref(), "batch")?;
    let action = args.action.unwrap_or(settings.batch.action);

    let entries = read_identifiers(&file)?;
    let client = settings.build_client()?;

    let json = args.json;
    let result = run_lifecycle(&client, action, &entries, |entry, outcome| {
        if json {
            return;
        }
        match outcome {
            Ok(change) if change.is_applied() => println!("{}", action.applied_message(&entry.email)),
            Ok(_) => {}
            Err(e) => println!("{e}"),
        }
    })
    .await;

    print_batch_result(&result, json)
}
