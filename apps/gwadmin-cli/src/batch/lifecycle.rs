//! Lifecycle batch runner
//!
//! Applies one lifecycle action to every account listed in a file, one
//! email per line. A failing line never stops the run.

use std::fmt;
use std::path::Path;
use std::time::Instant;

use gwadmin_directory::{DirectoryClient, DirectoryResult, StateChange, UNDELETE_WINDOW_DAYS};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::batch::result::BatchResult;
use crate::error::{CliError, CliResult};

/// Lifecycle action applied by the batch runner.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleAction {
    Suspend,
    #[default]
    Unsuspend,
    Delete,
    Undelete,
}

impl LifecycleAction {
    /// Runs the action for one account.
    pub async fn apply(self, client: &DirectoryClient, email: &str) -> DirectoryResult<StateChange> {
        match self {
            Self::Suspend => client.suspend(email).await,
            Self::Unsuspend => client.unsuspend(email).await,
            Self::Delete => client.delete(email).await,
            Self::Undelete => client.undo_delete(email).await,
        }
    }

    /// Message for an applied action.
    pub fn applied_message(self, email: &str) -> String {
        match self {
            Self::Suspend => format!("Suspended {email}"),
            Self::Unsuspend => format!("Unsuspended {email}"),
            Self::Delete => format!(
                "Deleted {email}; if this was done in error use 'gwadmin user undelete' within {UNDELETE_WINDOW_DAYS} days"
            ),
            Self::Undelete => {
                format!("Un-deleted {email}; if this was done in error use 'gwadmin user delete'")
            }
        }
    }

    /// Reason an action left the account untouched.
    pub fn unchanged_reason(self) -> &'static str {
        match self {
            Self::Suspend => "already suspended",
            Self::Unsuspend => "not suspended",
            Self::Delete | Self::Undelete => "account is not suspended",
        }
    }
}

impl fmt::Display for LifecycleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Suspend => write!(f, "suspend"),
            Self::Unsuspend => write!(f, "unsuspend"),
            Self::Delete => write!(f, "delete"),
            Self::Undelete => write!(f, "undelete"),
        }
    }
}

/// An account listed in the batch file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchEntry {
    /// Line number in the file (1-based)
    pub line: usize,
    pub email: String,
}

/// Parses one identifier per line, skipping blank lines.
pub fn parse_identifiers(content: &str) -> Vec<BatchEntry> {
    content
        .lines()
        .enumerate()
        .filter_map(|(i, line)| {
            let email = line.trim();
            (!email.is_empty()).then(|| BatchEntry {
                line: i + 1,
                email: email.to_string(),
            })
        })
        .collect()
}

/// Reads the batch file.
///
/// Undecodable bytes are replaced so that only the affected line fails.
pub fn read_identifiers(path: &Path) -> CliResult<Vec<BatchEntry>> {
    let content = std::fs::read(path)
        .map_err(|e| CliError::InputFile(format!("Failed to read {}: {}", path.display(), e)))?;
    Ok(parse_identifiers(&String::from_utf8_lossy(&content)))
}

/// Runs `action` for every entry, reporting each outcome to `on_item`.
#[instrument(skip(client, entries, on_item), fields(count = entries.len()))]
pub async fn run_lifecycle<F>(
    client: &DirectoryClient,
    action: LifecycleAction,
    entries: &[BatchEntry],
    mut on_item: F,
) -> BatchResult
where
    F: FnMut(&BatchEntry, &DirectoryResult<StateChange>),
{
    let start = Instant::now();
    let mut result = BatchResult::new(&action.to_string());

    for entry in entries {
        let outcome = action.apply(client, &entry.email).await;
        on_item(entry, &outcome);

        match outcome {
            Ok(StateChange::Applied) => {
                result.add_success(entry.line, entry.email.clone(), Some(action.to_string()))
            }
            Ok(StateChange::Unchanged) => result.add_skipped(
                entry.line,
                entry.email.clone(),
                action.unchanged_reason().to_string(),
            ),
            Err(e) => {
                warn!(line = entry.line, "{}", e);
                result.add_failure(entry.line, entry.email.clone(), e.to_string());
            }
        }
    }

    result.set_duration(start.elapsed().as_millis() as u64);
    info!("{}", result.summary());
    result
}
