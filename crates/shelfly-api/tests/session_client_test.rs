#![allow(clippy::unwrap_used)]
// Integration tests for `SessionClient` using wiremock.

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shelfly_api::{Error, SessionClient};

async fn setup() -> (MockServer, SessionClient) {
    let server = MockServer::start().await;
    let client = SessionClient::with_client(&server.uri(), reqwest::Client::new()).unwrap();
    (server, client)
}

fn user_json() -> serde_json::Value {
    json!({"user": {"id": "u1", "username": "reader", "displayName": "Reader One"}})
}

#[tokio::test]
async fn sign_in_success_returns_user() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/session"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json()))
        .mount(&server)
        .await;

    let secret: secrecy::SecretString = "hunter2".to_string().into();
    let session = client.sign_in("reader", &secret).await.unwrap();
    assert_eq!(session.user.username, "reader");
    assert_eq!(session.user.display_name.as_deref(), Some("Reader One"));
}

#[tokio::test]
async fn sign_in_rejection_is_authentication_error() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/session"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let secret: secrecy::SecretString = "wrong".to_string().into();
    let result = client.sign_in("reader", &secret).await;
    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication error, got: {result:?}"
    );
}

#[tokio::test]
async fn current_user_present() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/session"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json()))
        .mount(&server)
        .await;

    let user = client.current_user().await.unwrap();
    assert_eq!(user.unwrap().id, "u1");
}

#[tokio::test]
async fn current_user_absent_is_none_not_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/session"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    assert!(client.current_user().await.unwrap().is_none());
}

#[tokio::test]
async fn sign_out_tolerates_missing_session() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/session"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    client.sign_out().await.unwrap();
}
