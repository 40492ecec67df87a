//! All possible UI actions. Actions are the sole mechanism for state mutation.

use std::fmt;
use std::sync::Arc;

use shelfly_core::{Book, BookDraft, BookId, BookStatus, SessionState};

use crate::screen::ScreenId;

/// Notification severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

/// A toast notification.
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
}

impl Notification {
    pub fn success(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Success,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Error,
        }
    }

    pub fn info(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Info,
        }
    }
}

/// Pending confirmation action.
#[derive(Debug, Clone)]
pub enum ConfirmAction {
    DeleteBook { id: BookId, title: String },
    SignOut,
}

impl fmt::Display for ConfirmAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeleteBook { title, .. } => {
                write!(f, "Delete \"{title}\"? This cannot be undone.")
            }
            Self::SignOut => write!(f, "Sign out?"),
        }
    }
}

/// Every state transition in the TUI is expressed as an Action.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ──────────────────────────────────────────────────
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Navigation ────────────────────────────────────────────────
    SwitchScreen(ScreenId),
    GoBack,

    // ── Data events (from shelfly-core streams) ───────────────────
    BooksUpdated(Arc<Vec<Arc<Book>>>),
    SessionChanged(SessionState),

    // ── Catalog operations ────────────────────────────────────────
    Refresh,
    SubmitCreate(BookDraft),
    SubmitUpdate(BookId, BookDraft),
    RequestDelete { id: BookId, title: String },
    MutationDone,

    // ── Book form ─────────────────────────────────────────────────
    /// Open the add/edit form. `Some(book)` pre-populates for edit.
    OpenForm(Option<Arc<Book>>),
    CloseForm,

    // ── Confirm dialog ────────────────────────────────────────────
    ConfirmYes,
    ConfirmNo,

    // ── Search & filters ──────────────────────────────────────────
    OpenSearch,
    CloseSearch,
    SearchInput(String),
    SearchSubmit,
    GenreFilter(Option<String>),
    StatusFilter(Option<BookStatus>),
    ClearFilters,

    // ── Session ───────────────────────────────────────────────────
    SignInSubmit { username: String, password: String },
    SignInFailed(String),
    RequestSignOut,

    // ── Help / notifications ──────────────────────────────────────
    ToggleHelp,
    Notify(Notification),
    DismissNotification,
}
