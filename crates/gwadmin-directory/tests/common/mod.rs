//! Common test utilities for gwadmin-directory integration tests.

#![allow(dead_code)]

use gwadmin_directory::{
    DeleteGate, DirectoryClient, DirectoryConfig, DirectoryCredentials, ServiceAccountKey,
};
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Path prefix of the Directory API on the mock server.
pub const API_PREFIX: &str = "/admin/directory/v1";

/// Bearer token the mock token endpoint hands out.
pub const MOCK_TOKEN: &str = "mock-access-token";

/// Percent-encodes a group or user key the way the client does.
pub fn key(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Builds a Directory API path on the mock server.
pub fn api_path(segments: &[&str]) -> String {
    let mut p = API_PREFIX.to_string();
    for segment in segments {
        p.push('/');
        p.push_str(&key(segment));
    }
    p
}

/// Test data factory for a member entry.
pub fn create_member(email: &str) -> Value {
    json!({
        "kind": "admin#directory#member",
        "email": email,
        "role": "MEMBER",
        "type": "USER",
        "status": "ACTIVE"
    })
}

/// Test data factory for a group entry.
pub fn create_group(email: &str) -> Value {
    json!({
        "kind": "admin#directory#group",
        "email": email,
        "name": email.split('@').next().unwrap_or_default()
    })
}

/// Test data factory for a user resource.
pub fn create_user(email: &str, suspended: bool) -> Value {
    json!({
        "kind": "admin#directory#user",
        "primaryEmail": email,
        "suspended": suspended,
        "orgUnitPath": "/"
    })
}

/// Wraps entries in a listing page under `field`.
pub fn create_page(field: &str, items: Vec<Value>, next_page_token: Option<&str>) -> Value {
    let mut page = json!({ field: items });
    if let Some(token) = next_page_token {
        page["nextPageToken"] = json!(token);
    }
    page
}

/// Creates a Google API error body.
pub fn create_api_error(code: u16, message: &str) -> Value {
    json!({
        "error": {
            "code": code,
            "message": message,
            "errors": [{"message": message, "domain": "global", "reason": "failed"}]
        }
    })
}

/// Generates `count` member emails.
pub fn generate_members(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| format!("member{i}@example.com"))
        .collect()
}

/// Routes client logs to the test output.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("gwadmin_directory=debug")
        .try_init();
}

/// Mock Directory API server.
pub struct MockDirectoryServer {
    pub server: MockServer,
}

impl MockDirectoryServer {
    pub async fn new() -> Self {
        init_test_logging();
        let server = MockServer::start().await;
        Self { server }
    }

    pub fn url(&self) -> String {
        self.server.uri()
    }

    pub fn endpoint(&self) -> String {
        format!("{}{}", self.url(), API_PREFIX)
    }

    /// Config pointing at the mock server.
    pub fn config(&self) -> DirectoryConfig {
        self.config_with_gate(DeleteGate::Suspended)
    }

    pub fn config_with_gate(&self, gate: DeleteGate) -> DirectoryConfig {
        DirectoryConfig::builder()
            .endpoint(self.endpoint())
            .token_uri(format!("{}/token", self.url()))
            .delegate("admin@example.com")
            .domain("example.com")
            .page_size(2)
            .delete_gate(gate)
            .build()
            .unwrap()
    }

    /// Client authorized with a static token.
    pub fn client(&self) -> DirectoryClient {
        DirectoryClient::new(
            self.config(),
            DirectoryCredentials::AccessToken(MOCK_TOKEN.to_string().into()),
        )
        .unwrap()
    }

    pub fn client_with_gate(&self, gate: DeleteGate) -> DirectoryClient {
        DirectoryClient::new(
            self.config_with_gate(gate),
            DirectoryCredentials::AccessToken(MOCK_TOKEN.to_string().into()),
        )
        .unwrap()
    }

    /// Service account key whose token endpoint is the mock server.
    pub fn service_account_key(&self) -> ServiceAccountKey {
        let key = json!({
            "type": "service_account",
            "client_email": "sync@directory-sync.iam.gserviceaccount.com",
            "private_key_id": "test-key",
            "private_key": include_str!("../fixtures/test_key.pem"),
            "token_uri": format!("{}/token", self.url())
        });
        ServiceAccountKey::from_json(&key.to_string()).unwrap()
    }

    /// Sets up the token endpoint.
    pub async fn mock_token_endpoint(&self, expires_in: u64) {
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": MOCK_TOKEN,
                "token_type": "Bearer",
                "expires_in": expires_in
            })))
            .mount(&self.server)
            .await;
    }

    /// Serves `members` for `group` split into pages of `page_size`.
    pub async fn mock_group_members(&self, group: &str, members: &[String], page_size: usize) {
        let pages: Vec<Vec<Value>> = members
            .chunks(page_size)
            .map(|chunk| chunk.iter().map(|m| create_member(m)).collect())
            .collect();
        self.mock_pages(&api_path(&["groups", group, "members"]), "members", pages)
            .await;
    }

    /// Serves `groups` for the groups listing split into pages of `page_size`.
    pub async fn mock_user_groups(&self, groups: &[String], page_size: usize) {
        let pages: Vec<Vec<Value>> = groups
            .chunks(page_size)
            .map(|chunk| chunk.iter().map(|g| create_group(g)).collect())
            .collect();
        self.mock_pages(&api_path(&["groups"]), "groups", pages).await;
    }

    /// Mounts one mock per page; page `i > 0` is matched by `pageToken=page{i}`.
    async fn mock_pages(&self, list_path: &str, field: &str, pages: Vec<Vec<Value>>) {
        if pages.is_empty() {
            Mock::given(method("GET"))
                .and(path(list_path))
                .respond_with(
                    ResponseTemplate::new(200)
                        .set_body_json(json!({"kind": "admin#directory#list", "etag": "\"e\""})),
                )
                .mount(&self.server)
                .await;
            return;
        }

        let total_pages = pages.len();
        for (i, items) in pages.into_iter().enumerate() {
            let next = (i + 1 < total_pages).then(|| format!("page{}", i + 1));
            let body = create_page(field, items, next.as_deref());

            let mock = Mock::given(method("GET")).and(path(list_path));
            let mock = if i == 0 {
                mock.and(NoPageToken)
            } else {
                mock.and(query_param("pageToken", format!("page{i}")))
            };

            mock.respond_with(ResponseTemplate::new(200).set_body_json(body))
                .expect(1)
                .mount(&self.server)
                .await;
        }
    }

    /// Serves a user resource.
    pub async fn mock_user(&self, email: &str, suspended: bool) {
        Mock::given(method("GET"))
            .and(path(api_path(&["users", email])))
            .respond_with(ResponseTemplate::new(200).set_body_json(create_user(email, suspended)))
            .mount(&self.server)
            .await;
    }

    /// Expects `times` user updates.
    pub async fn expect_user_updates(&self, email: &str, times: u64) {
        Mock::given(method("PUT"))
            .and(path(api_path(&["users", email])))
            .respond_with(ResponseTemplate::new(200).set_body_json(create_user(email, false)))
            .expect(times)
            .mount(&self.server)
            .await;
    }
}

/// Matches requests without a `pageToken` query parameter.
pub struct NoPageToken;

impl wiremock::Match for NoPageToken {
    fn matches(&self, request: &wiremock::Request) -> bool {
        !request.url.query_pairs().any(|(k, _)| k == "pageToken")
    }
}
