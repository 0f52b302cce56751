//! Provision command - department-based group assignment from a TSV export

use std::path::{Path, PathBuf};

use clap::Args;

use crate::commands::{input_file, load_settings, print_batch_result};
use crate::error::CliResult;
use crate::provisioning::{read_records_from_path, DepartmentRouter, Provisioner, RecordOutcome};

/// Arguments for the provision command
#[derive(Args, Debug)]
pub struct ProvisionArgs {
    /// Tab-separated onboarding export (defaults to provision.file)
    pub file: Option<PathBuf>,

    /// Show which groups would be added without changing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Print the run summary as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute the provision command
pub async fn execute(args: ProvisionArgs, config_path: &Path) -> CliResult<()> {
    let settings = load_settings(config_path)?;
    let file = input_file(args.file, settings.provision.file.as_ref(), "provision")?;

    let rows = read_records_from_path(&file)?;
    if rows.is_empty() {
        return Ok(());
    }

    let client = settings.build_client()?;
    let provisioner = Provisioner::new(&client, DepartmentRouter::from_mappings(&settings.groups));

    let json = args.json;
    let result = provisioner
        .run(&rows, args.dry_run, |line, email, outcome| {
            if !json {
                print_outcome(line, email, outcome);
            }
        })
        .await;

    print_batch_result(&result, json)
}

fn print_outcome(line: usize, email: &str, outcome: &RecordOutcome) {
    match outcome {
        RecordOutcome::Malformed { reason } => println!("Line {line}: skipped, {reason}"),
        RecordOutcome::Inactive | RecordOutcome::Unrouted { .. } => {}
        RecordOutcome::Failed(e) => println!("{e}"),
        RecordOutcome::Reconciled {
            added,
            planned,
            failed,
            ..
        } => {
            for group in added {
                println!("{email} was successfully added to {group}");
            }
            for group in planned {
                println!("[dry-run] would add {email} to {group}");
            }
            for e in failed {
                println!("{e}");
            }
        }
    }
}
