//! Integration tests for membership mutation.

mod common;

use common::*;
use gwadmin_directory::MembershipChange;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

async fn mock_not_member(mock: &MockDirectoryServer, group: &str, email: &str) {
    Mock::given(method("GET"))
        .and(path(api_path(&["groups", group, "members", email])))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(create_api_error(404, "Resource Not Found: memberKey")),
        )
        .mount(&mock.server)
        .await;
}

#[tokio::test]
async fn test_add_membership_inserts_new_member() {
    let mock = MockDirectoryServer::new().await;
    mock_not_member(&mock, "sales@example.com", "jane@example.com").await;

    Mock::given(method("POST"))
        .and(path(api_path(&["groups", "sales@example.com", "members"])))
        .and(body_json(json!({"email": "jane@example.com"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(create_member("jane@example.com")))
        .expect(1)
        .mount(&mock.server)
        .await;

    let change = mock
        .client()
        .add_membership("sales@example.com", "jane@example.com")
        .await
        .unwrap();

    assert!(change.is_added());
    assert_eq!(
        change.to_string(),
        "jane@example.com was successfully added to sales@example.com"
    );
}

#[tokio::test]
async fn test_add_membership_skips_existing_member() {
    let mock = MockDirectoryServer::new().await;

    Mock::given(method("GET"))
        .and(path(api_path(&[
            "groups",
            "sales@example.com",
            "members",
            "jane@example.com",
        ])))
        .respond_with(ResponseTemplate::new(200).set_body_json(create_member("jane@example.com")))
        .mount(&mock.server)
        .await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock.server)
        .await;

    let change = mock
        .client()
        .add_membership("sales@example.com", "jane@example.com")
        .await
        .unwrap();

    assert_eq!(
        change,
        MembershipChange::AlreadyMember {
            group: "sales@example.com".to_string(),
            email: "jane@example.com".to_string(),
        }
    );
}

#[tokio::test]
async fn test_add_membership_conflict_is_already_member() {
    let mock = MockDirectoryServer::new().await;
    mock_not_member(&mock, "sales@example.com", "jane@example.com").await;

    Mock::given(method("POST"))
        .and(path(api_path(&["groups", "sales@example.com", "members"])))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(create_api_error(409, "Member already exists.")),
        )
        .mount(&mock.server)
        .await;

    let change = mock
        .client()
        .add_membership("sales@example.com", "jane@example.com")
        .await
        .unwrap();

    assert!(!change.is_added());
}

#[tokio::test]
async fn test_add_membership_error_message() {
    let mock = MockDirectoryServer::new().await;
    mock_not_member(&mock, "sales@example.com", "jane@example.com").await;

    Mock::given(method("POST"))
        .and(path(api_path(&["groups", "sales@example.com", "members"])))
        .respond_with(
            ResponseTemplate::new(403)
                .set_body_json(create_api_error(403, "Not Authorized to access this resource/api")),
        )
        .mount(&mock.server)
        .await;

    let err = mock
        .client()
        .add_membership("sales@example.com", "jane@example.com")
        .await
        .unwrap_err();

    let message = err.to_string();
    assert_eq!(
        message,
        "An error has occurred while adding jane@example.com to sales@example.com -- Not Authorized to access this resource/api"
    );
    assert_eq!(err.status(), Some(403));
    let operation = err.operation().unwrap();
    assert_eq!(operation.subject(), "jane@example.com");
    assert_eq!(operation.group(), Some("sales@example.com"));
}

#[tokio::test]
async fn test_add_membership_precheck_failure() {
    let mock = MockDirectoryServer::new().await;

    Mock::given(method("GET"))
        .and(path(api_path(&[
            "groups",
            "sales@example.com",
            "members",
            "jane@example.com",
        ])))
        .respond_with(ResponseTemplate::new(500).set_body_json(create_api_error(500, "Backend Error")))
        .mount(&mock.server)
        .await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock.server)
        .await;

    let err = mock
        .client()
        .add_membership("sales@example.com", "jane@example.com")
        .await
        .unwrap_err();

    assert_eq!(err.operation().map(|op| op.name()), Some("add_membership"));
    assert_eq!(err.status(), Some(500));
}

#[tokio::test]
async fn test_remove_membership() {
    let mock = MockDirectoryServer::new().await;

    Mock::given(method("DELETE"))
        .and(path(api_path(&[
            "groups",
            "eng@example.com",
            "members",
            "sam@example.com",
        ])))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock.server)
        .await;

    mock.client()
        .remove_membership("eng@example.com", "sam@example.com")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_remove_membership_error_message() {
    let mock = MockDirectoryServer::new().await;

    Mock::given(method("DELETE"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(create_api_error(404, "Resource Not Found: memberKey")),
        )
        .mount(&mock.server)
        .await;

    let err = mock
        .client()
        .remove_membership("eng@example.com", "sam@example.com")
        .await
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "An error has occurred while removing sam@example.com from eng@example.com -- Resource Not Found: memberKey"
    );
}
