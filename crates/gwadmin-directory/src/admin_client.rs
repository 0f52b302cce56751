//! Admin SDK HTTP client with page-token pagination.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::{DirectoryError, DirectoryResult, TokenCache};

/// Error response from the Directory API.
#[derive(Debug, Deserialize)]
pub struct GoogleApiError {
    pub error: GoogleApiErrorBody,
}

/// Error body.
#[derive(Debug, Deserialize)]
pub struct GoogleApiErrorBody {
    pub code: u16,
    pub message: String,
    #[serde(default)]
    pub status: Option<String>,
}

/// One page of a listing.
///
/// Members listings carry their entries under `members`, group listings
/// under `groups`. The field is absent altogether when there is nothing to
/// list.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPage<T> {
    #[serde(alias = "members", alias = "groups")]
    pub items: Option<Vec<T>>,
    pub next_page_token: Option<String>,
}

/// Directory API client.
#[derive(Debug)]
pub struct AdminApiClient {
    http_client: reqwest::Client,
    token_cache: Arc<TokenCache>,
    base_url: String,
}

impl AdminApiClient {
    /// Creates a new client against `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(
        token_cache: Arc<TokenCache>,
        base_url: String,
        timeout: Duration,
    ) -> DirectoryResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DirectoryError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            http_client,
            token_cache,
            base_url,
        })
    }

    /// Returns the base URL for Directory API requests.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the token cache shared by all requests.
    #[must_use]
    pub fn token_cache(&self) -> &Arc<TokenCache> {
        &self.token_cache
    }

    /// Performs a GET request and decodes the JSON body.
    #[instrument(skip(self, query))]
    pub async fn get<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> DirectoryResult<T> {
        let body = self
            .execute(reqwest::Method::GET, url, query, None::<&()>)
            .await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Sends a request whose response body is not needed.
    #[instrument(skip(self, body))]
    pub async fn send<B: serde::Serialize>(
        &self,
        method: reqwest::Method,
        url: &str,
        body: Option<&B>,
    ) -> DirectoryResult<()> {
        self.execute(method, url, &[], body).await.map(|_| ())
    }

    /// Performs a DELETE request.
    #[instrument(skip(self))]
    pub async fn delete(&self, url: &str) -> DirectoryResult<()> {
        self.send(reqwest::Method::DELETE, url, None::<&()>).await
    }

    /// Performs the request and returns the raw response body.
    async fn execute<B: serde::Serialize>(
        &self,
        method: reqwest::Method,
        url: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> DirectoryResult<String> {
        let token = self.token_cache.get_token().await?;

        let mut request = self
            .http_client
            .request(method, url)
            .bearer_auth(&token)
            .query(query);

        if let Some(b) = body {
            request = request.json(b);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await.unwrap_or_default();

        if status.is_success() {
            return Ok(text);
        }

        if status == reqwest::StatusCode::UNAUTHORIZED {
            debug!("Access token rejected, dropping cached token");
            self.token_cache.invalidate().await;
        }

        if let Ok(api_error) = serde_json::from_str::<GoogleApiError>(&text) {
            debug!(
                code = api_error.error.code,
                status = api_error.error.status.as_deref().unwrap_or_default(),
                "Directory API returned an error"
            );
            return Err(DirectoryError::Api {
                status: status.as_u16(),
                reason: api_error.error.message,
            });
        }

        let reason = if text.is_empty() {
            status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string()
        } else {
            text
        };

        Err(DirectoryError::Api {
            status: status.as_u16(),
            reason,
        })
    }

    /// Fetches every page of a listing, handing each page's entries to `callback`.
    ///
    /// Stops at the first page that carries no entry field, or when a page
    /// has no `nextPageToken`. `query` is sent with every page.
    #[instrument(skip(self, query, callback))]
    pub async fn get_paginated<T, F>(
        &self,
        url: &str,
        query: &[(&str, String)],
        mut callback: F,
    ) -> DirectoryResult<()>
    where
        T: DeserializeOwned,
        F: FnMut(Vec<T>) -> DirectoryResult<()>,
    {
        let mut page_token: Option<String> = None;
        let mut page_number = 0u32;

        loop {
            let mut page_query = query.to_vec();
            if let Some(token) = page_token.take() {
                page_query.push(("pageToken", token));
            }

            page_number += 1;
            debug!(page = page_number, "Fetching page: {}", url);
            let page: ListPage<T> = self.get(url, &page_query).await?;

            let Some(items) = page.items else {
                debug!(page = page_number, "Page has no entries, stopping");
                return Ok(());
            };

            callback(items)?;

            match page.next_page_token {
                Some(next) => page_token = Some(next),
                None => return Ok(()),
            }
        }
    }
}
