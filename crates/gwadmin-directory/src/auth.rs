//! `OAuth2` service account authentication for the Directory API.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration as StdDuration;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use crate::{DirectoryCredentials, DirectoryError, DirectoryResult, ServiceAccountKey};

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Lifetime Google accepts for a signed assertion.
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Claims of the signed assertion exchanged for an access token.
#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    sub: &'a str,
    scope: String,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

/// Token endpoint response.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
    #[allow(dead_code)]
    token_type: String,
}

/// Cached `OAuth2` access token.
#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    /// Returns true if the token is expired or will expire within the grace period.
    fn is_expired(&self, grace_period: Duration) -> bool {
        Utc::now() + grace_period >= self.expires_at
    }
}

/// Token cache for managing delegated access tokens.
#[derive(Debug)]
pub struct TokenCache {
    credentials: DirectoryCredentials,
    delegate: String,
    scopes: Vec<String>,
    token_uri: Option<String>,
    reuse: bool,
    http_client: reqwest::Client,
    cached_token: Arc<RwLock<Option<CachedToken>>>,
    /// Grace period before expiry to trigger refresh (default: 5 minutes).
    grace_period: Duration,
}

impl TokenCache {
    /// Creates a new token cache.
    ///
    /// `token_uri` overrides the endpoint named in the service account key.
    /// With `reuse` disabled every call to [`TokenCache::get_token`] acquires
    /// a fresh token. Token requests are bounded by `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(
        credentials: DirectoryCredentials,
        delegate: String,
        scopes: Vec<String>,
        token_uri: Option<String>,
        reuse: bool,
        timeout: StdDuration,
    ) -> DirectoryResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DirectoryError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            credentials,
            delegate,
            scopes,
            token_uri,
            reuse,
            http_client,
            cached_token: Arc::new(RwLock::new(None)),
            grace_period: Duration::minutes(5),
        })
    }

    /// Gets a valid access token, refreshing if necessary.
    #[instrument(skip(self), fields(delegate = %self.delegate))]
    pub async fn get_token(&self) -> DirectoryResult<String> {
        let key = match self.credentials {
            DirectoryCredentials::AccessToken(ref token) => {
                return Ok(token.expose_secret().to_string());
            }
            DirectoryCredentials::ServiceAccount(ref key) => key,
        };

        if self.reuse {
            let cache = self.cached_token.read().await;
            if let Some(ref token) = *cache {
                if !token.is_expired(self.grace_period) {
                    debug!("Using cached token");
                    return Ok(token.access_token.clone());
                }
            }
        }

        debug!("Acquiring access token");
        let new_token = self.acquire_token(key).await?;

        if self.reuse {
            let mut cache = self.cached_token.write().await;
            *cache = Some(new_token.clone());
        }

        Ok(new_token.access_token)
    }

    /// Drops the cached token, forcing a refresh on next use.
    pub async fn invalidate(&self) {
        let mut cache = self.cached_token.write().await;
        *cache = None;
    }

    /// Builds the RS256 assertion for the delegated subject.
    fn sign_assertion(&self, key: &ServiceAccountKey, audience: &str) -> DirectoryResult<String> {
        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.expose_secret().as_bytes())
            .map_err(|e| DirectoryError::Credentials(format!("Invalid private key: {e}")))?;

        let mut header = Header::new(Algorithm::RS256);
        header.kid = key.private_key_id.clone();

        let iat = Utc::now().timestamp();
        let claims = AssertionClaims {
            iss: &key.client_email,
            sub: &self.delegate,
            scope: self.scopes.join(" "),
            aud: audience,
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
        };

        jsonwebtoken::encode(&header, &claims, &encoding_key)
            .map_err(|e| DirectoryError::Auth(format!("Failed to sign assertion: {e}")))
    }

    /// Exchanges a signed assertion for an access token.
    #[instrument(skip(self, key), fields(client_email = %key.client_email))]
    async fn acquire_token(&self, key: &ServiceAccountKey) -> DirectoryResult<CachedToken> {
        let token_uri = self.token_uri.as_deref().unwrap_or(&key.token_uri);
        let assertion = self.sign_assertion(key, token_uri)?;

        let params = [("grant_type", JWT_BEARER_GRANT), ("assertion", &assertion)];

        let response = self
            .http_client
            .post(token_uri)
            .form(&params)
            .send()
            .await
            .map_err(|e| DirectoryError::Auth(format!("Token request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DirectoryError::Auth(format!(
                "Token request failed with status {status}: {body}"
            )));
        }

        let token_response: TokenResponse = response
            .json()
            .await
            .map_err(|e| DirectoryError::Auth(format!("Failed to parse token response: {e}")))?;

        let expires_at = Duration::try_seconds(token_response.expires_in)
            .and_then(|lifetime| Utc::now().checked_add_signed(lifetime))
            .ok_or_else(|| {
                DirectoryError::Auth(format!(
                    "Token response has an out of range expires_in: {}",
                    token_response.expires_in
                ))
            })?;

        debug!(
            "Acquired new token, expires at {}",
            expires_at.format("%Y-%m-%d %H:%M:%S UTC")
        );

        Ok(CachedToken {
            access_token: token_response.access_token,
            expires_at,
        })
    }
}
