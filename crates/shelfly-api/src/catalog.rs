// Hand-crafted async HTTP client for the book-catalog API.
//
// The base URL *is* the books collection:
//   GET    {base}        -> full list
//   POST   {base}        -> create, returns the server's record
//   PUT    {base}/{id}   -> replace fields, returns the updated record
//   DELETE {base}/{id}   -> remove

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::Error;
use crate::types::{BookPayload, BookRecord};

// ── Error response shape from the catalog API ────────────────────────

#[derive(serde::Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<String>,
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the book-catalog API.
///
/// Fire-once semantics: no retries, no idempotency keys. Callers are
/// expected to re-issue a full `list_books()` after any mutation rather
/// than patching local state.
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: Url,
}

impl CatalogClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from a base URL and transport config.
    pub fn new(base_url: &str, transport: &crate::TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url: Self::normalize_base_url(base_url)?,
        })
    }

    /// Wrap an existing `reqwest::Client` (caller manages cookies/TLS).
    pub fn with_client(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        Ok(Self {
            http,
            base_url: Self::normalize_base_url(base_url)?,
        })
    }

    /// Strip any trailing slash so `{base}/{id}` joins cleanly.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&path);
        Ok(url)
    }

    fn item_url(&self, id: &str) -> Result<Url, Error> {
        let joined = format!("{}/{id}", self.base_url);
        Ok(Url::parse(&joined)?)
    }

    // ── Public API ───────────────────────────────────────────────────

    /// Fetch every book in the catalog, in whatever order the server
    /// returns them. This client makes no ordering promise of its own.
    pub async fn list_books(&self) -> Result<Vec<BookRecord>, Error> {
        let url = self.base_url.clone();
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        handle_response(resp).await
    }

    /// Submit a new book. Returns the server's representation, with
    /// the assigned `id` and `createdAt`.
    pub async fn create_book(&self, payload: &BookPayload) -> Result<BookRecord, Error> {
        let url = self.base_url.clone();
        debug!("POST {url}");

        let resp = self.http.post(url).json(payload).send().await?;
        handle_response(resp).await
    }

    /// Replace the fields of an existing book. Returns the updated
    /// representation.
    pub async fn update_book(&self, id: &str, payload: &BookPayload) -> Result<BookRecord, Error> {
        let url = self.item_url(id)?;
        debug!("PUT {url}");

        let resp = self.http.put(url).json(payload).send().await?;
        handle_response(resp).await
    }

    /// Remove a book by id.
    pub async fn delete_book(&self, id: &str) -> Result<(), Error> {
        let url = self.item_url(id)?;
        debug!("DELETE {url}");

        let resp = self.http.delete(url).send().await?;
        handle_empty(resp).await
    }
}

// ── Response handling ────────────────────────────────────────────────

async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
    let status = resp.status();
    if status.is_success() {
        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body,
            }
        })
    } else {
        Err(parse_error(status, resp).await)
    }
}

async fn handle_empty(resp: reqwest::Response) -> Result<(), Error> {
    let status = resp.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(parse_error(status, resp).await)
    }
}

/// Turn a non-2xx response into a structured [`Error`].
pub(crate) async fn parse_error(status: StatusCode, resp: reqwest::Response) -> Error {
    if status == StatusCode::UNAUTHORIZED {
        return Error::SessionExpired;
    }

    let raw = resp.text().await.unwrap_or_default();

    if let Ok(err) = serde_json::from_str::<ErrorResponse>(&raw) {
        Error::Api {
            status: status.as_u16(),
            message: err.message.unwrap_or_else(|| status.to_string()),
            code: err.code,
        }
    } else {
        Error::Api {
            status: status.as_u16(),
            message: if raw.is_empty() {
                status.to_string()
            } else {
                raw
            },
            code: None,
        }
    }
}
