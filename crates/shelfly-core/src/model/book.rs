// ── Book domain types ──

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use shelfly_api::types::{BookPayload, BookRecord};

// ── BookId ───────────────────────────────────────────────────────────

/// Opaque book identifier assigned by the server.
///
/// Treated as a string everywhere: never parsed, never ordered, only
/// compared for equality and echoed back into item URLs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(String);

impl BookId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for BookId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for BookId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ── BookStatus ───────────────────────────────────────────────────────

/// Circulation status of a book.
///
/// Open-ended on purpose: the server is free to introduce new status
/// strings, and they must survive a list -> edit -> update round trip
/// byte-for-byte. Only `Available` and `Issued` get dedicated styling
/// in the UI.
#[derive(Debug, Clone, PartialEq, Eq, Hash, strum::Display)]
pub enum BookStatus {
    Available,
    Issued,
    #[strum(default, to_string = "{0}")]
    Other(String),
}

impl BookStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Available => "Available",
            Self::Issued => "Issued",
            Self::Other(s) => s,
        }
    }

    /// The two statuses every catalog understands, offered by the form
    /// regardless of what the current list contains.
    pub const WELL_KNOWN: [BookStatus; 2] = [BookStatus::Available, BookStatus::Issued];
}

impl From<&str> for BookStatus {
    fn from(s: &str) -> Self {
        match s {
            "Available" => Self::Available,
            "Issued" => Self::Issued,
            other => Self::Other(other.to_owned()),
        }
    }
}

impl From<String> for BookStatus {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl Serialize for BookStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for BookStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from(s))
    }
}

// ── Book ─────────────────────────────────────────────────────────────

/// A catalog entry as the server knows it.
///
/// `id` and `created_at` are server-assigned and read-only; everything
/// else is user-editable through a [`BookDraft`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub published_year: i32,
    pub status: BookStatus,
    pub created_at: DateTime<Utc>,
}

impl Book {
    /// Calendar date (UTC) this entry was added to the catalog.
    pub fn added_date(&self) -> NaiveDate {
        self.created_at.date_naive()
    }
}

impl From<BookRecord> for Book {
    fn from(record: BookRecord) -> Self {
        Self {
            id: BookId::from(record.id),
            title: record.title,
            author: record.author,
            genre: record.genre,
            published_year: record.published_year,
            status: BookStatus::from(record.status),
            created_at: record.created_at,
        }
    }
}

// ── BookDraft ────────────────────────────────────────────────────────

/// Which draft field a validation error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum DraftField {
    #[strum(to_string = "Title")]
    Title,
    #[strum(to_string = "Author")]
    Author,
    #[strum(to_string = "Genre")]
    Genre,
    #[strum(to_string = "Published Year")]
    PublishedYear,
    #[strum(to_string = "Status")]
    Status,
}

/// A field-level validation failure, suitable for inline display next
/// to the offending form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: DraftField,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// User-editable book fields, as collected by the add/edit form.
///
/// String fields hold whatever was typed (possibly empty); the year and
/// status stay `None` until the user supplies them. [`validate`]
/// (BookDraft::validate) decides whether the draft can be submitted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookDraft {
    pub title: String,
    pub author: String,
    pub genre: String,
    pub published_year: Option<i32>,
    pub status: Option<BookStatus>,
}

impl BookDraft {
    /// Pre-populate a draft from an existing book, for edit mode.
    pub fn from_book(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author.clone(),
            genre: book.genre.clone(),
            published_year: Some(book.published_year),
            status: Some(book.status.clone()),
        }
    }

    /// Check every field, collecting all failures rather than stopping
    /// at the first so the form can annotate each field at once.
    ///
    /// A draft that passes here is guaranteed convertible via
    /// [`to_payload`](Self::to_payload).
    pub fn validate(&self, current_year: i32) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();

        let required_text = [
            (DraftField::Title, &self.title),
            (DraftField::Author, &self.author),
            (DraftField::Genre, &self.genre),
        ];
        for (field, value) in required_text {
            if value.trim().is_empty() {
                errors.push(FieldError {
                    field,
                    message: "is required".into(),
                });
            }
        }

        match self.published_year {
            None => errors.push(FieldError {
                field: DraftField::PublishedYear,
                message: "is required".into(),
            }),
            Some(year) if year > current_year => errors.push(FieldError {
                field: DraftField::PublishedYear,
                message: format!("cannot be later than {current_year}"),
            }),
            Some(_) => {}
        }

        if self.status.is_none() {
            errors.push(FieldError {
                field: DraftField::Status,
                message: "is required".into(),
            });
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Convert a validated draft into the wire payload.
    ///
    /// Runs [`validate`](Self::validate) first; callers get either a
    /// complete payload or the full error list, never a partial payload.
    pub fn to_payload(&self, current_year: i32) -> Result<BookPayload, Vec<FieldError>> {
        self.validate(current_year)?;
        // validate() guarantees both Options are populated.
        let published_year = self.published_year.unwrap_or_default();
        let status = self.status.clone().unwrap_or(BookStatus::Available);
        Ok(BookPayload {
            title: self.title.trim().to_owned(),
            author: self.author.trim().to_owned(),
            genre: self.genre.trim().to_owned(),
            published_year,
            status: status.as_str().to_owned(),
        })
    }
}
