//! Group membership listing and mutation.

use std::fmt;

use serde::Deserialize;
use tracing::{debug, info, instrument};

use crate::{DirectoryClient, DirectoryError, DirectoryResult, Operation};

/// A member or group entry; only the email is read.
#[derive(Debug, Deserialize)]
struct EmailEntry {
    email: Option<String>,
}

/// Outcome of [`DirectoryClient::add_membership`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MembershipChange {
    /// The member was inserted.
    Added { group: String, email: String },
    /// The member was already in the group; nothing was inserted.
    AlreadyMember { group: String, email: String },
}

impl MembershipChange {
    /// Returns true if a member was inserted.
    #[must_use]
    pub fn is_added(&self) -> bool {
        matches!(self, Self::Added { .. })
    }
}

impl fmt::Display for MembershipChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Added { group, email } => write!(f, "{email} was successfully added to {group}"),
            Self::AlreadyMember { group, email } => {
                write!(f, "{email} is already a member of {group}")
            }
        }
    }
}

impl DirectoryClient {
    fn page_query(&self) -> Vec<(&'static str, String)> {
        vec![("maxResults", self.config().page_size.to_string())]
    }

    /// Collects the emails of a paginated listing in page order.
    async fn collect_emails(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> DirectoryResult<Vec<String>> {
        let mut emails = Vec::new();

        self.api()
            .get_paginated(url, query, |page: Vec<EmailEntry>| {
                debug!("Processing page with {} entries", page.len());
                for entry in page {
                    match entry.email {
                        Some(email) => emails.push(email),
                        None => debug!("Skipping entry without email"),
                    }
                }
                Ok(())
            })
            .await?;

        Ok(emails)
    }

    /// Lists every member email of a group, in page order.
    ///
    /// An empty group yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::Remote` for `list_group_members` on any failure.
    #[instrument(skip(self))]
    pub async fn list_group_members(&self, group: &str) -> DirectoryResult<Vec<String>> {
        let url = self.url(&["groups", group, "members"]);

        self.collect_emails(&url, &self.page_query())
            .await
            .map_err(|e| {
                e.during(Operation::ListGroupMembers {
                    group: group.to_string(),
                })
            })
    }

    /// Lists the emails of every group the user belongs to, in page order.
    ///
    /// Scoped to the configured domain when one is set. A user in no group
    /// yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::Remote` for `list_user_groups` on any failure.
    #[instrument(skip(self))]
    pub async fn list_user_groups(&self, email: &str) -> DirectoryResult<Vec<String>> {
        let url = self.url(&["groups"]);

        let mut query = self.page_query();
        query.push(("userKey", email.to_string()));
        if let Some(ref domain) = self.config().domain {
            query.push(("domain", domain.clone()));
        }

        self.collect_emails(&url, &query).await.map_err(|e| {
            e.during(Operation::ListUserGroups {
                email: email.to_string(),
            })
        })
    }

    /// Returns true if `email` is a member of `group`.
    async fn is_member(&self, group: &str, email: &str) -> DirectoryResult<bool> {
        let url = self.url(&["groups", group, "members", email]);

        match self.api().get::<serde_json::Value>(&url, &[]).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Adds `email` to `group` unless it is already a member.
    ///
    /// A conflict reported by the insert (the member appeared between the
    /// check and the insert) is treated as already present.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::Remote` for `add_membership` on any other failure.
    #[instrument(skip(self))]
    pub async fn add_membership(&self, group: &str, email: &str) -> DirectoryResult<MembershipChange> {
        let operation = || Operation::AddMembership {
            group: group.to_string(),
            email: email.to_string(),
        };
        let already = || MembershipChange::AlreadyMember {
            group: group.to_string(),
            email: email.to_string(),
        };

        if self
            .is_member(group, email)
            .await
            .map_err(|e| e.during(operation()))?
        {
            debug!("Already a member, skipping insert");
            return Ok(already());
        }

        info!("Adding {} to {}", email, group);

        let url = self.url(&["groups", group, "members"]);
        let body = serde_json::json!({ "email": email });

        match self
            .api()
            .send(reqwest::Method::POST, &url, Some(&body))
            .await
        {
            Ok(()) => Ok(MembershipChange::Added {
                group: group.to_string(),
                email: email.to_string(),
            }),
            Err(e) if e.is_conflict() => {
                debug!("Insert reported an existing member");
                Ok(already())
            }
            Err(e) => Err(e.during(operation())),
        }
    }

    /// Removes `email` from `group`.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::Remote` for `remove_membership` on any failure.
    #[instrument(skip(self))]
    pub async fn remove_membership(&self, group: &str, email: &str) -> DirectoryResult<()> {
        info!("Removing {} from {}", email, group);

        let url = self.url(&["groups", group, "members", email]);

        self.api()
            .delete(&url)
            .await
            .map_err(|e: DirectoryError| {
                e.during(Operation::RemoveMembership {
                    group: group.to_string(),
                    email: email.to_string(),
                })
            })
    }
}
