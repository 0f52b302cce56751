//! Directory client configuration and credentials.

use std::path::Path;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::{DirectoryError, DirectoryResult};

/// Admin SDK Directory API v1 base URL.
pub const DEFAULT_DIRECTORY_ENDPOINT: &str = "https://admin.googleapis.com/admin/directory/v1";

/// Google OAuth2 token endpoint.
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Scopes needed for group membership and user lifecycle operations.
pub const DEFAULT_SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/admin.directory.group",
    "https://www.googleapis.com/auth/admin.directory.user",
];

/// Largest page the Directory API serves for members and groups listings.
pub const MAX_PAGE_SIZE: u32 = 200;

/// Precondition checked before deleting or restoring an account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeleteGate {
    /// Only act on accounts that are currently suspended.
    #[default]
    Suspended,
    /// Act without reading the account status first.
    Unconditional,
}

/// Service account key, as downloaded from the Google Cloud console.
#[derive(Debug, Clone)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: SecretString,
    pub private_key_id: Option<String>,
    pub token_uri: String,
}

#[derive(Deserialize)]
struct RawServiceAccountKey {
    client_email: String,
    private_key: String,
    #[serde(default)]
    private_key_id: Option<String>,
    #[serde(default)]
    token_uri: Option<String>,
}

impl ServiceAccountKey {
    /// Parses a service account JSON key.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::Credentials` if the JSON is malformed or
    /// misses `client_email`/`private_key`.
    pub fn from_json(json: &str) -> DirectoryResult<Self> {
        let raw: RawServiceAccountKey = serde_json::from_str(json)
            .map_err(|e| DirectoryError::Credentials(format!("Invalid service account key: {e}")))?;

        Ok(Self {
            client_email: raw.client_email,
            private_key: raw.private_key.into(),
            private_key_id: raw.private_key_id,
            token_uri: raw
                .token_uri
                .unwrap_or_else(|| DEFAULT_TOKEN_URI.to_string()),
        })
    }

    /// Reads a service account JSON key file.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::Credentials` if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> DirectoryResult<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            DirectoryError::Credentials(format!(
                "Failed to read key file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        Self::from_json(&content)
    }
}

/// How the client authorizes against the directory.
#[derive(Debug, Clone)]
pub enum DirectoryCredentials {
    /// Service account with domain-wide delegation.
    ServiceAccount(ServiceAccountKey),
    /// A bearer token issued elsewhere.
    AccessToken(SecretString),
}

/// Directory client configuration.
#[derive(Debug, Clone)]
pub struct DirectoryConfig {
    /// Directory API base URL.
    pub endpoint: String,
    /// Token endpoint override; defaults to the key file's `token_uri`.
    pub token_uri: Option<String>,
    /// Administrator impersonated through domain-wide delegation.
    pub delegate: String,
    /// `OAuth2` scopes requested for every token.
    pub scopes: Vec<String>,
    /// Domain that scopes group listings for a user.
    pub domain: Option<String>,
    /// Page size for listing calls (1..=200).
    pub page_size: u32,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Reuse cached access tokens until they near expiry.
    pub reuse_tokens: bool,
    /// Precondition for delete/undelete.
    pub delete_gate: DeleteGate,
    /// Organizational unit restored accounts are placed in.
    pub restore_org_unit: String,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_DIRECTORY_ENDPOINT.to_string(),
            token_uri: None,
            delegate: String::new(),
            scopes: DEFAULT_SCOPES.iter().map(|s| (*s).to_string()).collect(),
            domain: None,
            page_size: MAX_PAGE_SIZE,
            request_timeout_secs: 30,
            reuse_tokens: true,
            delete_gate: DeleteGate::default(),
            restore_org_unit: "/".to_string(),
        }
    }
}

impl DirectoryConfig {
    /// Starts building a configuration.
    #[must_use]
    pub fn builder() -> DirectoryConfigBuilder {
        DirectoryConfigBuilder::default()
    }

    /// Checks field constraints.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::Config` describing the first invalid field.
    pub fn validate(&self) -> DirectoryResult<()> {
        url::Url::parse(&self.endpoint)
            .map_err(|e| DirectoryError::Config(format!("Invalid endpoint '{}': {e}", self.endpoint)))?;

        if let Some(ref token_uri) = self.token_uri {
            url::Url::parse(token_uri)
                .map_err(|e| DirectoryError::Config(format!("Invalid token URI '{token_uri}': {e}")))?;
        }

        if self.scopes.is_empty() {
            return Err(DirectoryError::Config("At least one scope is required".into()));
        }

        if !(1..=MAX_PAGE_SIZE).contains(&self.page_size) {
            return Err(DirectoryError::Config(format!(
                "page_size must be between 1 and {MAX_PAGE_SIZE}, got {}",
                self.page_size
            )));
        }

        if self.request_timeout_secs == 0 {
            return Err(DirectoryError::Config(
                "request_timeout_secs must be greater than zero".into(),
            ));
        }

        if !self.restore_org_unit.starts_with('/') {
            return Err(DirectoryError::Config(format!(
                "restore_org_unit must be an absolute path, got '{}'",
                self.restore_org_unit
            )));
        }

        Ok(())
    }
}

/// Builder for [`DirectoryConfig`].
#[derive(Debug, Default)]
pub struct DirectoryConfigBuilder {
    config: DirectoryConfig,
}

impl DirectoryConfigBuilder {
    #[must_use]
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    #[must_use]
    pub fn token_uri(mut self, token_uri: impl Into<String>) -> Self {
        self.config.token_uri = Some(token_uri.into());
        self
    }

    #[must_use]
    pub fn delegate(mut self, delegate: impl Into<String>) -> Self {
        self.config.delegate = delegate.into();
        self
    }

    #[must_use]
    pub fn scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.scopes = scopes.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.config.domain = Some(domain.into());
        self
    }

    #[must_use]
    pub fn page_size(mut self, page_size: u32) -> Self {
        self.config.page_size = page_size;
        self
    }

    #[must_use]
    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.config.request_timeout_secs = secs;
        self
    }

    #[must_use]
    pub fn reuse_tokens(mut self, reuse: bool) -> Self {
        self.config.reuse_tokens = reuse;
        self
    }

    #[must_use]
    pub fn delete_gate(mut self, gate: DeleteGate) -> Self {
        self.config.delete_gate = gate;
        self
    }

    #[must_use]
    pub fn restore_org_unit(mut self, org_unit: impl Into<String>) -> Self {
        self.config.restore_org_unit = org_unit.into();
        self
    }

    /// Validates and returns the configuration.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::Config` if validation fails.
    pub fn build(self) -> DirectoryResult<DirectoryConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
