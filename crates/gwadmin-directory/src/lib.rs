//! Google Workspace directory client for gwadmin
//!
//! This crate wraps the Admin SDK Directory API for the account and group
//! operations gwadmin automates.
//!
//! # Features
//!
//! - Service account authentication with domain-wide delegation and token caching
//! - Page-token pagination for group member and user group listings
//! - Idempotent membership adds
//! - Suspend, unsuspend, delete and undelete with state checks
//! - Structured errors naming the failed operation, its subject and HTTP status
//!
//! # Example
//!
//! ```no_run
//! use gwadmin_directory::{DirectoryClient, DirectoryConfig, DirectoryCredentials, ServiceAccountKey};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = DirectoryConfig::builder()
//!     .delegate("admin@example.com")
//!     .domain("example.com")
//!     .build()?;
//!
//! let key = ServiceAccountKey::from_file("service-account.json")?;
//! let client = DirectoryClient::new(config, DirectoryCredentials::ServiceAccount(key))?;
//!
//! for group in client.list_user_groups("jane@example.com").await? {
//!     println!("{group}");
//! }
//! # Ok(())
//! # }
//! ```

mod admin_client;
mod auth;
mod client;
mod config;
mod error;
mod groups;
mod users;

// Re-exports
pub use admin_client::{AdminApiClient, ListPage};
pub use auth::TokenCache;
pub use client::DirectoryClient;
pub use config::{
    DeleteGate, DirectoryConfig, DirectoryConfigBuilder, DirectoryCredentials, ServiceAccountKey,
    DEFAULT_DIRECTORY_ENDPOINT, DEFAULT_SCOPES, DEFAULT_TOKEN_URI, MAX_PAGE_SIZE,
};
pub use error::{DirectoryError, DirectoryResult, Operation};
pub use groups::MembershipChange;
pub use users::{StateChange, UNDELETE_WINDOW_DAYS};
