// ── Catalog facade ──
//
// Full lifecycle management for one catalog deployment: session
// resolution, list refresh, and validated mutations. Every mutation
// follows submit -> full refresh, so the store always mirrors the
// server rather than being patched locally.

use std::sync::Arc;

use chrono::{Datelike, Utc};
use secrecy::SecretString;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::config::{CatalogConfig, TlsVerification};
use crate::error::CoreError;
use crate::model::{BookDraft, BookId, User};
use crate::store::BookStore;
use crate::stream::BookStream;

use shelfly_api::transport::{TlsMode, TransportConfig};
use shelfly_api::{CatalogClient, SessionClient};

// ── SessionState ─────────────────────────────────────────────────

/// Session state observable by consumers.
///
/// Starts as `Unknown` until the first
/// [`resolve_session()`](Catalog::resolve_session) completes; the UI
/// defers routing decisions while unknown.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Unknown,
    SignedOut,
    SignedIn(Arc<User>),
}

impl SessionState {
    pub fn is_signed_in(&self) -> bool {
        matches!(self, Self::SignedIn(_))
    }

    pub fn user(&self) -> Option<&Arc<User>> {
        match self {
            Self::SignedIn(user) => Some(user),
            _ => None,
        }
    }
}

// ── Catalog ──────────────────────────────────────────────────────

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<CatalogInner>`. Both API clients share
/// one `reqwest::Client` with a cookie jar, so the session cookie set
/// on sign-in rides along on every catalog request.
#[derive(Clone)]
pub struct Catalog {
    inner: Arc<CatalogInner>,
}

struct CatalogInner {
    config: CatalogConfig,
    store: Arc<BookStore>,
    session: watch::Sender<SessionState>,
    catalog_client: CatalogClient,
    session_client: SessionClient,
}

impl Catalog {
    /// Create a Catalog from configuration. Does NOT touch the network --
    /// call [`resolve_session()`](Self::resolve_session) and
    /// [`refresh()`](Self::refresh) to populate state.
    pub fn new(config: CatalogConfig) -> Result<Self, CoreError> {
        let transport = build_transport(&config);
        let http = transport.build_client().map_err(CoreError::from)?;

        let catalog_client = CatalogClient::with_client(config.books_url.as_str(), http.clone())?;
        let session_client = SessionClient::with_client(config.auth_url.as_str(), http)?;

        let (session, _) = watch::channel(SessionState::Unknown);

        Ok(Self {
            inner: Arc::new(CatalogInner {
                config,
                store: Arc::new(BookStore::new()),
                session,
                catalog_client,
                session_client,
            }),
        })
    }

    /// Access the catalog configuration.
    pub fn config(&self) -> &CatalogConfig {
        &self.inner.config
    }

    /// Access the underlying BookStore.
    pub fn store(&self) -> &Arc<BookStore> {
        &self.inner.store
    }

    /// Subscribe to the book list.
    pub fn books(&self) -> BookStream {
        self.inner.store.subscribe()
    }

    /// Subscribe to session state changes.
    pub fn session_state(&self) -> watch::Receiver<SessionState> {
        self.inner.session.subscribe()
    }

    /// The session state as of right now.
    pub fn session_snapshot(&self) -> SessionState {
        self.inner.session.borrow().clone()
    }

    // ── Session lifecycle ────────────────────────────────────────

    /// Ask the auth provider who is signed in and update the observable
    /// state.
    ///
    /// When nobody is and the config carries credentials, signs in
    /// automatically. Transport failures leave the state untouched so a
    /// flaky network cannot bounce a signed-in user to the sign-in
    /// screen.
    pub async fn resolve_session(&self) -> Result<SessionState, CoreError> {
        let state = match self.inner.session_client.current_user().await? {
            Some(profile) => {
                let user = Arc::new(User::from(profile));
                info!(username = %user.username, "session present");
                SessionState::SignedIn(user)
            }
            None => {
                if let Some(creds) = &self.inner.config.credentials {
                    debug!("no session, trying configured credentials");
                    let user = self.sign_in(&creds.username, &creds.password).await?;
                    SessionState::SignedIn(user)
                } else {
                    SessionState::SignedOut
                }
            }
        };

        let _ = self.inner.session.send(state.clone());
        Ok(state)
    }

    /// Sign in with explicit credentials.
    pub async fn sign_in(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<Arc<User>, CoreError> {
        let session = self.inner.session_client.sign_in(username, password).await?;
        let user = Arc::new(User::from(session.user));
        info!(username = %user.username, "signed in");

        let _ = self
            .inner
            .session
            .send(SessionState::SignedIn(Arc::clone(&user)));
        Ok(user)
    }

    /// Drop the current session.
    pub async fn sign_out(&self) -> Result<(), CoreError> {
        self.inner.session_client.sign_out().await?;
        info!("signed out");
        let _ = self.inner.session.send(SessionState::SignedOut);
        Ok(())
    }

    // ── Catalog operations ───────────────────────────────────────

    /// Re-fetch the full book list and replace the store snapshot.
    pub async fn refresh(&self) -> Result<(), CoreError> {
        let records = self.inner.catalog_client.list_books().await?;
        let count = records.len();
        self.inner
            .store
            .replace_all(records.into_iter().map(Into::into).collect());
        debug!(count, "book list refreshed");
        Ok(())
    }

    /// Validate and submit a new book, then refresh.
    ///
    /// Validation failures are returned before any network traffic.
    pub async fn create(&self, draft: &BookDraft) -> Result<(), CoreError> {
        let payload = draft
            .to_payload(current_year())
            .map_err(CoreError::validation)?;

        let created = self.inner.catalog_client.create_book(&payload).await?;
        info!(id = %created.id, title = %created.title, "book created");

        self.refresh().await
    }

    /// Validate and submit changes to an existing book, then refresh.
    pub async fn update(&self, id: &BookId, draft: &BookDraft) -> Result<(), CoreError> {
        let payload = draft
            .to_payload(current_year())
            .map_err(CoreError::validation)?;

        let updated = self
            .inner
            .catalog_client
            .update_book(id.as_str(), &payload)
            .await
            .map_err(|e| not_found_as(id, e))?;
        info!(id = %updated.id, "book updated");

        self.refresh().await
    }

    /// Delete a book, then refresh.
    pub async fn delete(&self, id: &BookId) -> Result<(), CoreError> {
        self.inner
            .catalog_client
            .delete_book(id.as_str())
            .await
            .map_err(|e| not_found_as(id, e))?;
        info!(%id, "book deleted");

        self.refresh().await
    }
}

/// UTC year used for publication-year validation.
fn current_year() -> i32 {
    Utc::now().year()
}

/// A 404 on an item URL means the target book is gone, most likely
/// deleted by someone else since the last refresh.
fn not_found_as(id: &BookId, err: shelfly_api::Error) -> CoreError {
    if err.is_not_found() {
        CoreError::BookNotFound { id: id.to_string() }
    } else {
        err.into()
    }
}

fn build_transport(config: &CatalogConfig) -> TransportConfig {
    let tls = match &config.tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => {
            warn!("TLS certificate verification disabled");
            TlsMode::DangerAcceptInvalid
        }
    };

    TransportConfig {
        tls,
        timeout: config.timeout,
        ..TransportConfig::default()
    }
    .with_cookie_jar()
}
