// ── Domain model ──
//
// Canonical types the rest of the workspace works with. Wire shapes
// from `shelfly-api` are converted at the boundary and never leak past
// this module.

mod book;
mod user;

pub use book::{Book, BookDraft, BookId, BookStatus, DraftField, FieldError};
pub use user::User;
