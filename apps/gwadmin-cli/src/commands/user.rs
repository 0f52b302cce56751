//! User commands - single-account lookups and lifecycle actions

use std::path::Path;

use clap::{Args, Subcommand};
use serde::Serialize;

use crate::batch::LifecycleAction;
use crate::commands::load_settings;
use crate::error::CliResult;

/// User management commands
#[derive(Args, Debug)]
pub struct UserArgs {
    #[command(subcommand)]
    pub command: UserCommands,
}

#[derive(Subcommand, Debug)]
pub enum UserCommands {
    /// Show whether an account is suspended
    Status(EmailArgs),
    /// List the groups an account belongs to
    Groups(EmailArgs),
    /// Suspend an account
    Suspend(EmailArgs),
    /// Reactivate a suspended account
    Unsuspend(EmailArgs),
    /// Delete a suspended account
    Delete(EmailArgs),
    /// Restore a deleted account
    Undelete(EmailArgs),
}

#[derive(Args, Debug)]
pub struct EmailArgs {
    /// Account email address
    pub email: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct StatusOutput<'a> {
    email: &'a str,
    suspended: bool,
}

/// Execute user commands
pub async fn execute(args: UserArgs, config_path: &Path) -> CliResult<()> {
    let settings = load_settings(config_path)?;
    let client = settings.build_client()?;

    match args.command {
        UserCommands::Status(a) => {
            let suspended = client.user_status(&a.email).await?;
            if a.json {
                let output = StatusOutput {
                    email: &a.email,
                    suspended,
                };
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else if suspended {
                println!("{} is suspended", a.email);
            } else {
                println!("{} is active", a.email);
            }
        }
        UserCommands::Groups(a) => {
            let groups = client.list_user_groups(&a.email).await?;
            if a.json {
                println!("{}", serde_json::to_string_pretty(&groups)?);
            } else if groups.is_empty() {
                println!("{} is not a member of any group", a.email);
            } else {
                for group in groups {
                    println!("{group}");
                }
            }
        }
        UserCommands::Suspend(a) => apply(&client, LifecycleAction::Suspend, &a.email).await?,
        UserCommands::Unsuspend(a) => apply(&client, LifecycleAction::Unsuspend, &a.email).await?,
        UserCommands::Delete(a) => apply(&client, LifecycleAction::Delete, &a.email).await?,
        UserCommands::Undelete(a) => apply(&client, LifecycleAction::Undelete, &a.email).await?,
    }

    Ok(())
}

async fn apply(
    client: &gwadmin_directory::DirectoryClient,
    action: LifecycleAction,
    email: &str,
) -> CliResult<()> {
    if action.apply(client, email).await?.is_applied() {
        println!("{}", action.applied_message(email));
    } else {
        println!("{email}: nothing to do, {}", action.unchanged_reason());
    }
    Ok(())
}
