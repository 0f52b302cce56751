//! Directory client entry point.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, instrument};

use crate::admin_client::AdminApiClient;
use crate::{DirectoryConfig, DirectoryCredentials, DirectoryResult, TokenCache};

/// Google Workspace directory client.
///
/// Operations are split across modules: account lifecycle in `users`,
/// membership listing and mutation in `groups`.
#[derive(Debug)]
pub struct DirectoryClient {
    config: DirectoryConfig,
    api: AdminApiClient,
}

impl DirectoryClient {
    /// Creates a client from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::Config` if the configuration is invalid or
    /// the HTTP client cannot be built.
    pub fn new(config: DirectoryConfig, credentials: DirectoryCredentials) -> DirectoryResult<Self> {
        config.validate()?;

        let timeout = Duration::from_secs(config.request_timeout_secs);

        let token_cache = Arc::new(TokenCache::new(
            credentials,
            config.delegate.clone(),
            config.scopes.clone(),
            config.token_uri.clone(),
            config.reuse_tokens,
            timeout,
        )?);

        let api = AdminApiClient::new(token_cache, config.endpoint.clone(), timeout)?;

        info!(
            endpoint = %config.endpoint,
            delegate = %config.delegate,
            "Directory client ready"
        );

        Ok(Self { config, api })
    }

    /// Returns the client configuration.
    #[must_use]
    pub fn config(&self) -> &DirectoryConfig {
        &self.config
    }

    pub(crate) fn api(&self) -> &AdminApiClient {
        &self.api
    }

    /// Builds `{endpoint}/{segment}/{segment}...` with each segment percent-encoded.
    pub(crate) fn url(&self, segments: &[&str]) -> String {
        let mut url = self.api.base_url().to_string();
        for segment in segments {
            url.push('/');
            url.push_str(&urlencoding::encode(segment));
        }
        url
    }

    /// Acquires a token to confirm the credentials are usable.
    ///
    /// # Errors
    ///
    /// Returns the authentication error if no token can be obtained.
    #[instrument(skip(self))]
    pub async fn test_connection(&self) -> DirectoryResult<()> {
        self.api.token_cache().get_token().await.map(|_| ())
    }
}
