//! gwadmin - Google Workspace directory administration
//!
//! - Assign onboarding users to department groups from a TSV export
//! - Suspend, unsuspend, delete or undelete accounts listed in a file
//! - Inspect and change single accounts and group memberships

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use gwadmin_cli::commands;
use gwadmin_cli::config::{CONFIG_ENV, DEFAULT_CONFIG_PATH};
use gwadmin_cli::logging::init_logging;
use gwadmin_cli::CliResult;

/// gwadmin - Google Workspace directory administration
#[derive(Parser)]
#[command(name = "gwadmin")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file
    #[arg(long, global = true, env = CONFIG_ENV, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add activated onboarding users to their department groups
    Provision(commands::provision::ProvisionArgs),

    /// Apply a lifecycle action to every account in a file
    Lifecycle(commands::lifecycle::LifecycleArgs),

    /// Single-account operations
    User(commands::user::UserArgs),

    /// Group membership operations
    Group(commands::group::GroupArgs),

    /// Write a starter configuration file
    Init(commands::init::InitArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = run(cli).await;

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            e.print();
            std::process::exit(e.exit_code());
        }
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    let config = cli.config;
    match cli.command {
        Commands::Provision(args) => commands::provision::execute(args, &config).await,
        Commands::Lifecycle(args) => commands::lifecycle::execute(args, &config).await,
        Commands::User(args) => commands::user::execute(args, &config).await,
        Commands::Group(args) => commands::group::execute(args, &config).await,
        Commands::Init(args) => commands::init::execute(args, &config),
    }
}
