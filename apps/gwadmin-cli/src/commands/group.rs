//! Group commands - list, add and remove members

use std::path::Path;

use clap::{Args, Subcommand};

use crate::commands::load_settings;
use crate::error::CliResult;

/// Group membership commands
#[derive(Args, Debug)]
pub struct GroupArgs {
    #[command(subcommand)]
    pub command: GroupCommands,
}

#[derive(Subcommand, Debug)]
pub enum GroupCommands {
    /// List every member of a group
    Members(MembersArgs),
    /// Add an account to a group (no-op if already a member)
    Add(MembershipArgs),
    /// Remove an account from a group
    Remove(MembershipArgs),
}

#[derive(Args, Debug)]
pub struct MembersArgs {
    /// Group email address
    pub group: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct MembershipArgs {
    /// Group email address
    pub group: String,
    /// Account email address
    pub email: String,
}

/// Execute group commands
pub async fn execute(args: GroupArgs, config_path: &Path) -> CliResult<()> {
    let settings = load_settings(config_path)?;
    let client = settings.build_client()?;

    match args.command {
        GroupCommands::Members(a) => {
            let members = client.list_group_members(&a.group).await?;
            if a.json {
                println!("{}", serde_json::to_string_pretty(&members)?);
            } else if members.is_empty() {
                println!("{} has no members", a.group);
            } else {
                for member in &members {
                    println!("{member}");
                }
                println!();
                println!("{} members", members.len());
            }
        }
        GroupCommands::Add(a) => {
            let change = client.add_membership(&a.group, &a.email).await?;
            println!("{change}");
        }
        GroupCommands::Remove(a) => {
            client.remove_membership(&a.group, &a.email).await?;
            println!("{} was removed from {}", a.email, a.group);
        }
    }

    Ok(())
}
