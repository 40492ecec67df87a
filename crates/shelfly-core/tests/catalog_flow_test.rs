#![allow(clippy::unwrap_used)]
// End-to-end tests for the `Catalog` facade against a wiremock server.
//
// These exercise the submit -> refresh contract: after any mutation the
// store must reflect the server's list, not a locally patched copy.

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shelfly_core::{
    BookDraft, BookId, BookStatus, Catalog, CatalogConfig, CoreError, SessionState,
};

async fn setup() -> (MockServer, Catalog) {
    let server = MockServer::start().await;
    let mut config = CatalogConfig::for_origin(server.uri().parse().unwrap());
    config.books_url = format!("{}/books", server.uri()).parse().unwrap();
    let catalog = Catalog::new(config).unwrap();
    (server, catalog)
}

fn record(id: &str, title: &str) -> serde_json::Value {
    json!({
        "id": id,
        "title": title,
        "author": "Herbert",
        "genre": "Sci-Fi",
        "publishedYear": 1965,
        "status": "Available",
        "createdAt": "2024-03-15T10:00:00Z"
    })
}

fn draft(title: &str) -> BookDraft {
    BookDraft {
        title: title.into(),
        author: "Herbert".into(),
        genre: "Sci-Fi".into(),
        published_year: Some(1965),
        status: Some(BookStatus::Available),
    }
}

async fn mount_list(server: &MockServer, records: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/books"))
        .respond_with(ResponseTemplate::new(200).set_body_json(records))
        .mount(server)
        .await;
}

// ── Refresh ─────────────────────────────────────────────────────────

#[tokio::test]
async fn refresh_replaces_the_store_snapshot() {
    let (server, catalog) = setup().await;
    mount_list(&server, json!([record("1", "Dune"), record("2", "Hyperion")])).await;

    catalog.refresh().await.unwrap();

    let snapshot = catalog.store().snapshot();
    let titles: Vec<&str> = snapshot.iter().map(|b| b.title.as_str()).collect();
    assert_eq!(titles, vec!["Dune", "Hyperion"]);
    assert_eq!(catalog.store().version(), 1);
}

#[tokio::test]
async fn refresh_notifies_subscribers() {
    let (server, catalog) = setup().await;
    mount_list(&server, json!([record("1", "Dune")])).await;

    let mut stream = catalog.books();
    catalog.refresh().await.unwrap();

    let snap = stream.changed().await.unwrap();
    assert_eq!(snap.len(), 1);
}

// ── Create ──────────────────────────────────────────────────────────

#[tokio::test]
async fn create_submits_then_refreshes() {
    let (server, catalog) = setup().await;

    Mock::given(method("POST"))
        .and(path("/books"))
        .respond_with(ResponseTemplate::new(201).set_body_json(record("2", "Hyperion")))
        .expect(1)
        .mount(&server)
        .await;
    mount_list(&server, json!([record("1", "Dune"), record("2", "Hyperion")])).await;

    catalog.create(&draft("Hyperion")).await.unwrap();

    // Store holds the server's post-create list, including the new id.
    assert!(catalog.store().get(&BookId::from("2")).is_some());
    assert_eq!(catalog.store().len(), 2);
}

#[tokio::test]
async fn invalid_draft_never_reaches_the_network() {
    let (server, catalog) = setup().await;

    Mock::given(method("POST"))
        .and(path("/books"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let mut bad = draft("");
    bad.status = None;
    let err = catalog.create(&bad).await.unwrap_err();

    match err {
        CoreError::Validation(_, all) => assert_eq!(all.len(), 2),
        other => panic!("expected Validation error, got: {other}"),
    }
}

// ── Update / delete ─────────────────────────────────────────────────

#[tokio::test]
async fn delete_confirms_against_the_refreshed_list() {
    let (server, catalog) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/books/1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    mount_list(&server, json!([record("2", "Hyperion")])).await;

    catalog.delete(&BookId::from("1")).await.unwrap();

    assert!(catalog.store().get(&BookId::from("1")).is_none());
    assert_eq!(catalog.store().len(), 1);
}

#[tokio::test]
async fn update_missing_book_is_book_not_found() {
    let (server, catalog) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/books/ghost"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = catalog
        .update(&BookId::from("ghost"), &draft("Dune"))
        .await
        .unwrap_err();
    match err {
        CoreError::BookNotFound { id } => assert_eq!(id, "ghost"),
        other => panic!("expected BookNotFound, got: {other}"),
    }
}

#[tokio::test]
async fn expired_session_surfaces_as_signed_out() {
    let (server, catalog) = setup().await;

    Mock::given(method("GET"))
        .and(path("/books"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = catalog.refresh().await.unwrap_err();
    assert!(matches!(err, CoreError::SignedOut));
}

// ── Session resolution ──────────────────────────────────────────────

#[tokio::test]
async fn resolve_session_without_credentials_is_signed_out() {
    let (server, catalog) = setup().await;

    Mock::given(method("GET"))
        .and(path("/session"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let state = catalog.resolve_session().await.unwrap();
    assert_eq!(state, SessionState::SignedOut);
    assert_eq!(catalog.session_snapshot(), SessionState::SignedOut);
}

#[tokio::test]
async fn resolve_session_reports_the_signed_in_user() {
    let (server, catalog) = setup().await;

    Mock::given(method("GET"))
        .and(path("/session"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            json!({"user": {"id": "u1", "username": "reader", "displayName": null}}),
        ))
        .mount(&server)
        .await;

    let state = catalog.resolve_session().await.unwrap();
    let user = state.user().unwrap();
    assert_eq!(user.username, "reader");
    assert_eq!(user.label(), "reader");
    assert!(catalog.session_snapshot().is_signed_in());
}

#[tokio::test]
async fn resolve_session_signs_in_with_configured_credentials() {
    let server = MockServer::start().await;
    let mut config = CatalogConfig::for_origin(server.uri().parse().unwrap());
    config.credentials = Some(shelfly_core::SessionCredentials {
        username: "reader".into(),
        password: "hunter2".to_string().into(),
    });
    let catalog = Catalog::new(config).unwrap();

    Mock::given(method("GET"))
        .and(path("/session"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/session"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            json!({"user": {"id": "u1", "username": "reader", "displayName": "Reader One"}}),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let state = catalog.resolve_session().await.unwrap();
    assert!(state.is_signed_in());
    assert_eq!(state.user().unwrap().label(), "Reader One");
}
