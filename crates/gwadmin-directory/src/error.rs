//! Error types for the directory client.

use std::fmt;

use thiserror::Error;

/// Result type alias using `DirectoryError`.
pub type DirectoryResult<T> = Result<T, DirectoryError>;

/// A directory operation together with the account/group it acted on.
///
/// The `Display` form is the action phrase used in error messages,
/// e.g. `adding jane@example.com to sales@example.com`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    UserStatus { email: String },
    ListGroupMembers { group: String },
    ListUserGroups { email: String },
    AddMembership { group: String, email: String },
    RemoveMembership { group: String, email: String },
    Suspend { email: String },
    Unsuspend { email: String },
    Delete { email: String },
    UndoDelete { email: String },
}

impl Operation {
    /// Stable machine-readable name of the operation.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::UserStatus { .. } => "user_status",
            Self::ListGroupMembers { .. } => "list_group_members",
            Self::ListUserGroups { .. } => "list_user_groups",
            Self::AddMembership { .. } => "add_membership",
            Self::RemoveMembership { .. } => "remove_membership",
            Self::Suspend { .. } => "suspend",
            Self::Unsuspend { .. } => "unsuspend",
            Self::Delete { .. } => "delete",
            Self::UndoDelete { .. } => "undo_delete",
        }
    }

    /// The account or group the operation targets.
    #[must_use]
    pub fn subject(&self) -> &str {
        match self {
            Self::ListGroupMembers { group } => group,
            Self::UserStatus { email }
            | Self::ListUserGroups { email }
            | Self::AddMembership { email, .. }
            | Self::RemoveMembership { email, .. }
            | Self::Suspend { email }
            | Self::Unsuspend { email }
            | Self::Delete { email }
            | Self::UndoDelete { email } => email,
        }
    }

    /// The group involved, for membership operations.
    #[must_use]
    pub fn group(&self) -> Option<&str> {
        match self {
            Self::ListGroupMembers { group }
            | Self::AddMembership { group, .. }
            | Self::RemoveMembership { group, .. } => Some(group),
            _ => None,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UserStatus { email } => write!(f, "getting {email} status"),
            Self::ListGroupMembers { group } => write!(f, "getting {group} group membership"),
            Self::ListUserGroups { email } => write!(f, "getting {email} group membership"),
            Self::AddMembership { group, email } => write!(f, "adding {email} to {group}"),
            Self::RemoveMembership { group, email } => {
                write!(f, "removing {email} from {group}")
            }
            Self::Suspend { email } => write!(f, "suspending {email}"),
            Self::Unsuspend { email } => write!(f, "unsuspending {email}"),
            Self::Delete { email } => write!(f, "deleting {email}"),
            Self::UndoDelete { email } => write!(f, "un-deleting {email}"),
        }
    }
}

/// Errors that can occur when talking to the directory.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// Configuration validation error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Service account key could not be read or parsed.
    #[error("Credentials error: {0}")]
    Credentials(String),

    /// `OAuth2` token acquisition failed.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Directory API answered with a non-success status.
    #[error("Directory API error ({status}): {reason}")]
    Api { status: u16, reason: String },

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// A directory operation failed.
    #[error("An error has occurred while {operation} -- {reason}")]
    Remote {
        operation: Operation,
        status: Option<u16>,
        reason: String,
    },
}

impl DirectoryError {
    /// Attributes this error to a directory operation.
    ///
    /// API errors keep their HTTP status; any other failure is carried as the
    /// reason text with no status. Errors already attributed are left alone.
    #[must_use]
    pub fn during(self, operation: Operation) -> Self {
        match self {
            Self::Remote { .. } => self,
            Self::Api { status, reason } => Self::Remote {
                operation,
                status: Some(status),
                reason,
            },
            other => Self::Remote {
                operation,
                status: None,
                reason: other.to_string(),
            },
        }
    }

    /// The operation this error was raised by, if any.
    #[must_use]
    pub fn operation(&self) -> Option<&Operation> {
        match self {
            Self::Remote { operation, .. } => Some(operation),
            _ => None,
        }
    }

    /// HTTP status returned by the directory, if one was received.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Remote { status, .. } => *status,
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns true if the directory reported the resource as missing.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Returns true if the directory reported a conflicting resource.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        self.status() == Some(409)
    }
}
