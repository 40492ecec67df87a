// Wire types for the catalog and session APIs.
//
// Field names follow the server's camelCase JSON. `shelfly-core`
// converts these into its own domain types; nothing above this crate
// should touch the wire shapes directly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A book as returned by the catalog API.
///
/// `id` and `createdAt` are assigned by the server at creation time.
/// `status` is a free string on the wire -- the server does not enforce
/// the Available/Issued vocabulary, so anything may come back.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRecord {
    pub id: String,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub published_year: i32,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// The payload submitted on create and update. No `id`, no `createdAt`
/// -- both are the server's business.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookPayload {
    pub title: String,
    pub author: String,
    pub genre: String,
    pub published_year: i32,
    pub status: String,
}

/// The signed-in user as reported by the session endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Response of a successful sign-in.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user: UserProfile,
}
