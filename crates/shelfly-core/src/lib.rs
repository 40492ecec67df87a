//! Business logic and reactive data layer between `shelfly-api` and the TUI.
//!
//! This crate owns the domain model, validation rules, and the reactive
//! infrastructure the UI renders from:
//!
//! - **[`Catalog`]** — Central facade managing the session and catalog
//!   lifecycle: [`resolve_session()`](Catalog::resolve_session) checks who is
//!   signed in, [`refresh()`](Catalog::refresh) pulls the full book list, and
//!   the mutation methods ([`create()`](Catalog::create),
//!   [`update()`](Catalog::update), [`delete()`](Catalog::delete)) validate,
//!   submit, then re-fetch so the local view always mirrors the server.
//!
//! - **[`BookStore`]** — Reactive snapshot storage built on
//!   `tokio::sync::watch`. The server's list is the single source of truth;
//!   every refresh replaces the snapshot wholesale and notifies subscribers.
//!
//! - **[`BookStream`]** — Subscription handle vended by the store. Exposes
//!   `current()` / `latest()` / `changed()` for reactive TUI rendering.
//!
//! - **[`filter`]** — Pure derivation functions over snapshots: criteria
//!   matching, distinct genre/status extraction, and the "added today" view.
//!
//! - **Domain model** ([`model`]) — `Book`, `BookDraft` (with field-level
//!   validation), `BookStatus` (open-ended: unknown server strings survive a
//!   round trip), and the opaque [`BookId`].

pub mod catalog;
pub mod config;
pub mod error;
pub mod filter;
pub mod model;
pub mod store;
pub mod stream;

// ── Primary re-exports ──────────────────────────────────────────────
pub use catalog::{Catalog, SessionState};
pub use config::{CatalogConfig, SessionCredentials, TlsVerification};
pub use error::CoreError;
pub use filter::FilterCriteria;
pub use store::BookStore;
pub use stream::BookStream;

// Re-export model types at the crate root for ergonomics.
pub use model::{Book, BookDraft, BookId, BookStatus, DraftField, FieldError, User};
