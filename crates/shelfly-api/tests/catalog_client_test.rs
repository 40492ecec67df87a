#![allow(clippy::unwrap_used)]
// Integration tests for `CatalogClient` using wiremock.

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shelfly_api::types::BookPayload;
use shelfly_api::{CatalogClient, Error};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, CatalogClient) {
    let server = MockServer::start().await;
    let base = format!("{}/books", server.uri());
    let client = CatalogClient::with_client(&base, reqwest::Client::new()).unwrap();
    (server, client)
}

fn dune() -> serde_json::Value {
    json!({
        "id": "1",
        "title": "Dune",
        "author": "Herbert",
        "genre": "Sci-Fi",
        "publishedYear": 1965,
        "status": "Available",
        "createdAt": "2024-03-15T10:00:00Z"
    })
}

fn draft_payload() -> BookPayload {
    BookPayload {
        title: "Dune".into(),
        author: "Herbert".into(),
        genre: "Sci-Fi".into(),
        published_year: 1965,
        status: "Available".into(),
    }
}

// ── List ────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_books_parses_camel_case_fields() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/books"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([dune()])))
        .mount(&server)
        .await;

    let books = client.list_books().await.unwrap();

    assert_eq!(books.len(), 1);
    assert_eq!(books[0].id, "1");
    assert_eq!(books[0].title, "Dune");
    assert_eq!(books[0].published_year, 1965);
    assert_eq!(books[0].status, "Available");
}

#[tokio::test]
async fn list_books_preserves_server_order() {
    let (server, client) = setup().await;

    let mut second = dune();
    second["id"] = json!("2");
    second["title"] = json!("Hyperion");

    Mock::given(method("GET"))
        .and(path("/books"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([second, dune()])))
        .mount(&server)
        .await;

    let books = client.list_books().await.unwrap();
    assert_eq!(books[0].id, "2");
    assert_eq!(books[1].id, "1");
}

#[tokio::test]
async fn list_books_non_2xx_is_api_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/books"))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_json(json!({"message": "database unavailable"})),
        )
        .mount(&server)
        .await;

    let err = client.list_books().await.unwrap_err();
    match err {
        Error::Api {
            status, message, ..
        } => {
            assert_eq!(status, 500);
            assert_eq!(message, "database unavailable");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn list_books_malformed_body_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/books"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client.list_books().await.unwrap_err();
    assert!(
        matches!(err, Error::Deserialization { .. }),
        "expected Deserialization error, got: {err:?}"
    );
}

// ── Create ──────────────────────────────────────────────────────────

#[tokio::test]
async fn create_book_posts_payload_and_returns_server_record() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/books"))
        .and(body_json(json!({
            "title": "Dune",
            "author": "Herbert",
            "genre": "Sci-Fi",
            "publishedYear": 1965,
            "status": "Available"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(dune()))
        .mount(&server)
        .await;

    let created = client.create_book(&draft_payload()).await.unwrap();

    // id and createdAt come from the server, not the payload
    assert_eq!(created.id, "1");
    assert_eq!(
        created.created_at.to_rfc3339(),
        "2024-03-15T10:00:00+00:00"
    );
}

#[tokio::test]
async fn create_book_rejection_carries_code() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/books"))
        .respond_with(
            ResponseTemplate::new(422)
                .set_body_json(json!({"message": "title required", "code": "missing-field"})),
        )
        .mount(&server)
        .await;

    let err = client.create_book(&draft_payload()).await.unwrap_err();
    assert_eq!(err.api_error_code(), Some("missing-field"));
}

// ── Update ──────────────────────────────────────────────────────────

#[tokio::test]
async fn update_book_puts_to_item_url() {
    let (server, client) = setup().await;

    let mut updated = dune();
    updated["status"] = json!("Issued");

    Mock::given(method("PUT"))
        .and(path("/books/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(updated))
        .mount(&server)
        .await;

    let mut payload = draft_payload();
    payload.status = "Issued".into();
    let book = client.update_book("1", &payload).await.unwrap();
    assert_eq!(book.status, "Issued");
}

#[tokio::test]
async fn update_unknown_id_is_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/books/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client
        .update_book("missing", &draft_payload())
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

// ── Delete ──────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_book_hits_item_url() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/books/1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client.delete_book("1").await.unwrap();
}

#[tokio::test]
async fn delete_401_maps_to_session_expired() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/books/1"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = client.delete_book("1").await.unwrap_err();
    assert!(err.is_auth_expired());
}
