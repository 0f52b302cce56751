//! Common test utilities for gwadmin CLI integration tests.

#![allow(dead_code)]

use std::io::Write;

use gwadmin_cli::config::Settings;
use gwadmin_directory::DirectoryClient;
use serde_json::{json, Value};
use tempfile::NamedTempFile;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const API_PREFIX: &str = "/admin/directory/v1";

pub const SALES: [&str; 2] = ["all@example.com", "sales@example.com"];
pub const ENG: [&str; 2] = ["all@example.com", "eng@example.com"];
pub const CATCH_ALL: [&str; 1] = ["employees@example.com"];

/// Builds a Directory API path on the mock server, keys percent-encoded.
pub fn api_path(segments: &[&str]) -> String {
    let mut p = API_PREFIX.to_string();
    for segment in segments {
        p.push('/');
        p.push_str(&urlencoding::encode(segment));
    }
    p
}

pub fn create_api_error(code: u16, message: &str) -> Value {
    json!({"error": {"code": code, "message": message}})
}

/// Header plus one TSV row per `(email, status, department)`.
pub fn onboarding_tsv(rows: &[(&str, &str, &str)]) -> String {
    let mut content =
        "id\tfirst\tlast\ttitle\tmanager\tlocation\temail\tstart\tstatus\tdepartment\n".to_string();
    for (i, (email, status, department)) in rows.iter().enumerate() {
        content.push_str(&format!(
            "{i}\tFirst\tLast\tTitle\tManager\tHQ\t{email}\t2024-01-08\t{status}\t{department}\n"
        ));
    }
    content
}

/// Writes `content` to a temporary file.
pub fn temp_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

/// Routes CLI and client logs to the test output.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("gwadmin_cli=debug,gwadmin_directory=debug")
        .try_init();
}

/// Mock Directory API server.
pub struct MockDirectory {
    pub server: MockServer,
}

impl MockDirectory {
    pub async fn new() -> Self {
        init_test_logging();
        Self {
            server: MockServer::start().await,
        }
    }

    /// Configuration pointing at the mock server, authorized with a static token.
    pub fn settings(&self) -> Settings {
        let yaml = format!(
            r#"
credentials:
  access_token: mock-access-token
  delegate: admin@example.com
directory:
  domain: example.com
  endpoint: {}{}
  page_size: 100
groups:
  sales: {}
  eng: {}
  catch_all: {}
"#,
            self.server.uri(),
            API_PREFIX,
            SALES.join(","),
            ENG.join(","),
            CATCH_ALL.join(","),
        );
        Settings::from_yaml(&yaml).unwrap()
    }

    pub fn client(&self) -> DirectoryClient {
        self.settings().build_client().unwrap()
    }

    /// Serves the groups `email` currently belongs to, in one page.
    pub async fn mock_user_groups(&self, email: &str, groups: &[&str]) {
        let groups: Vec<Value> = groups.iter().map(|g| json!({"email": g})).collect();
        let body = if groups.is_empty() {
            json!({"kind": "admin#directory#groups"})
        } else {
            json!({"kind": "admin#directory#groups", "groups": groups})
        };

        Mock::given(method("GET"))
            .and(path(api_path(&["groups"])))
            .and(query_param("userKey", email))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Fails the groups listing for `email`.
    pub async fn fail_user_groups(&self, email: &str, status: u16, message: &str) {
        Mock::given(method("GET"))
            .and(path(api_path(&["groups"])))
            .and(query_param("userKey", email))
            .respond_with(ResponseTemplate::new(status).set_body_json(create_api_error(status, message)))
            .mount(&self.server)
            .await;
    }

    /// Expects exactly `times` inserts of `email` into `group`; the pre-check
    /// reports no membership.
    pub async fn expect_insert(&self, group: &str, email: &str, times: u64) {
        Mock::given(method("GET"))
            .and(path(api_path(&["groups", group, "members", email])))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(create_api_error(404, "Resource Not Found: memberKey")),
            )
            .mount(&self.server)
            .await;

        Mock::given(method("POST"))
            .and(path(api_path(&["groups", group, "members"])))
            .and(body_json(json!({"email": email})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"email": email, "role": "MEMBER"})))
            .expect(times)
            .mount(&self.server)
            .await;
    }

    /// Fails the test if any insert is sent.
    pub async fn expect_no_inserts(&self) {
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&self.server)
            .await;
    }

    pub async fn mock_user(&self, email: &str, suspended: bool) {
        Mock::given(method("GET"))
            .and(path(api_path(&["users", email])))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "primaryEmail": email,
                "suspended": suspended
            })))
            .mount(&self.server)
            .await;
    }

    pub async fn expect_user_updates(&self, email: &str, times: u64) {
        Mock::given(method("PUT"))
            .and(path(api_path(&["users", email])))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"primaryEmail": email})))
            .expect(times)
            .mount(&self.server)
            .await;
    }
}
