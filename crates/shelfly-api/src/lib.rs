// shelfly-api: Async Rust client for the shelfly book-catalog service
// (catalog CRUD + session presence).

pub mod catalog;
pub mod error;
pub mod session;
pub mod transport;
pub mod types;

pub use catalog::CatalogClient;
pub use error::Error;
pub use session::SessionClient;
pub use transport::{TlsMode, TransportConfig};
pub use types::{BookPayload, BookRecord, Session, UserProfile};
