//! Account status and lifecycle transitions.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::{DeleteGate, DirectoryClient, DirectoryResult, Operation};

/// Undo window the directory keeps for deleted accounts.
pub const UNDELETE_WINDOW_DAYS: u32 = 5;

/// Fields read from a user resource.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserStatus {
    #[serde(default)]
    suspended: bool,
}

#[derive(Debug, Serialize)]
struct SuspendedUpdate {
    suspended: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UndeleteRequest<'a> {
    org_unit_path: &'a str,
}

/// Outcome of a lifecycle operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateChange {
    /// The mutation was sent.
    Applied,
    /// The account was not in the required state; nothing was sent.
    Unchanged,
}

impl StateChange {
    #[must_use]
    pub fn is_applied(self) -> bool {
        self == Self::Applied
    }
}

impl DirectoryClient {
    async fn fetch_suspended(&self, email: &str) -> DirectoryResult<bool> {
        let url = self.url(&["users", email]);
        let user: UserStatus = self.api().get(&url, &[]).await?;
        Ok(user.suspended)
    }

    async fn set_suspended(&self, email: &str, suspended: bool) -> DirectoryResult<()> {
        let url = self.url(&["users", email]);
        self.api()
            .send(
                reqwest::Method::PUT,
                &url,
                Some(&SuspendedUpdate { suspended }),
            )
            .await
    }

    /// Whether delete/undelete may proceed under the configured gate.
    async fn delete_gate_open(&self, email: &str) -> DirectoryResult<bool> {
        match self.config().delete_gate {
            DeleteGate::Suspended => self.fetch_suspended(email).await,
            DeleteGate::Unconditional => Ok(true),
        }
    }

    /// Returns whether the account is currently suspended.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::Remote` for `user_status` if the lookup fails.
    #[instrument(skip(self))]
    pub async fn user_status(&self, email: &str) -> DirectoryResult<bool> {
        self.fetch_suspended(email).await.map_err(|e| {
            e.during(Operation::UserStatus {
                email: email.to_string(),
            })
        })
    }

    /// Suspends the account unless it is already suspended.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::Remote` for `suspend` if the status read or
    /// the update fails.
    #[instrument(skip(self))]
    pub async fn suspend(&self, email: &str) -> DirectoryResult<StateChange> {
        let operation = || Operation::Suspend {
            email: email.to_string(),
        };

        if self
            .fetch_suspended(email)
            .await
            .map_err(|e| e.during(operation()))?
        {
            debug!("Already suspended");
            return Ok(StateChange::Unchanged);
        }

        info!("Suspending user: {}", email);
        self.set_suspended(email, true)
            .await
            .map_err(|e| e.during(operation()))?;

        Ok(StateChange::Applied)
    }

    /// Lifts the suspension if the account is suspended.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::Remote` for `unsuspend` if the status read or
    /// the update fails.
    #[instrument(skip(self))]
    pub async fn unsuspend(&self, email: &str) -> DirectoryResult<StateChange> {
        let operation = || Operation::Unsuspend {
            email: email.to_string(),
        };

        if !self
            .fetch_suspended(email)
            .await
            .map_err(|e| e.during(operation()))?
        {
            debug!("Not suspended");
            return Ok(StateChange::Unchanged);
        }

        info!("Unsuspending user: {}", email);
        self.set_suspended(email, false)
            .await
            .map_err(|e| e.during(operation()))?;

        Ok(StateChange::Applied)
    }

    /// Deletes the account.
    ///
    /// Under [`DeleteGate::Suspended`] only suspended accounts are deleted.
    /// The directory keeps deleted accounts restorable for
    /// [`UNDELETE_WINDOW_DAYS`] days.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::Remote` for `delete` on any failure.
    #[instrument(skip(self))]
    pub async fn delete(&self, email: &str) -> DirectoryResult<StateChange> {
        let operation = || Operation::Delete {
            email: email.to_string(),
        };

        if !self
            .delete_gate_open(email)
            .await
            .map_err(|e| e.during(operation()))?
        {
            debug!("Delete gate closed, account not suspended");
            return Ok(StateChange::Unchanged);
        }

        let url = self.url(&["users", email]);
        self.api()
            .delete(&url)
            .await
            .map_err(|e| e.during(operation()))?;

        info!(
            "Deleted {}; if this was done in error use undo_delete within {} days",
            email, UNDELETE_WINDOW_DAYS
        );

        Ok(StateChange::Applied)
    }

    /// Restores a deleted account into the configured organizational unit.
    ///
    /// Gated the same way as [`DirectoryClient::delete`].
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::Remote` for `undo_delete` on any failure.
    #[instrument(skip(self))]
    pub async fn undo_delete(&self, email: &str) -> DirectoryResult<StateChange> {
        let operation = || Operation::UndoDelete {
            email: email.to_string(),
        };

        if !self
            .delete_gate_open(email)
            .await
            .map_err(|e| e.during(operation()))?
        {
            debug!("Delete gate closed, account not suspended");
            return Ok(StateChange::Unchanged);
        }

        let url = self.url(&["users", email, "undelete"]);
        let body = UndeleteRequest {
            org_unit_path: &self.config().restore_org_unit,
        };
        self.api()
            .send(reqwest::Method::POST, &url, Some(&body))
            .await
            .map_err(|e| e.during(operation()))?;

        info!(
            "Un-deleted {} into {}; if this was done in error use delete",
            email,
            self.config().restore_org_unit
        );

        Ok(StateChange::Applied)
    }
}
