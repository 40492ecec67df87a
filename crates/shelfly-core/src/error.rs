// ── Core error types ──
//
// User-facing errors from shelfly-core. These are NOT API-specific --
// consumers never see HTTP status codes or JSON parse failures directly.
// The `From<shelfly_api::Error>` impl translates transport-layer errors
// into domain-appropriate variants.

use thiserror::Error;

use crate::model::FieldError;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach catalog at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Signed out -- sign in to continue")]
    SignedOut,

    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Book not found: {id}")]
    BookNotFound { id: String },

    #[error("{0}")]
    Validation(FieldError, Vec<FieldError>),

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("Catalog error: {message}")]
    Api {
        message: String,
        /// The API-specific error code, when the server sends one.
        code: Option<String>,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Wrap draft validation failures, keeping the first error as the
    /// headline and the rest for field-level display.
    pub fn validation(errors: Vec<FieldError>) -> Self {
        let first = errors.first().cloned().unwrap_or(FieldError {
            field: crate::model::DraftField::Title,
            message: "invalid draft".into(),
        });
        Self::Validation(first, errors)
    }

    /// All field-level failures, when this is a validation error.
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            Self::Validation(_, all) => all,
            _ => &[],
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<shelfly_api::Error> for CoreError {
    fn from(err: shelfly_api::Error) -> Self {
        match err {
            shelfly_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            shelfly_api::Error::SessionExpired => CoreError::SignedOut,
            shelfly_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout { timeout_secs: 0 }
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map(|u| u.to_string())
                            .unwrap_or_else(|| "<unknown>".into()),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        code: None,
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            shelfly_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            shelfly_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            shelfly_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            shelfly_api::Error::Api {
                message,
                code,
                status,
            } => CoreError::Api {
                message,
                code,
                status: Some(status),
            },
            shelfly_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{DraftField, FieldError};

    #[test]
    fn session_expiry_maps_to_signed_out() {
        let err: CoreError = shelfly_api::Error::SessionExpired.into();
        assert!(matches!(err, CoreError::SignedOut));
    }

    #[test]
    fn api_errors_keep_status_and_code() {
        let err: CoreError = shelfly_api::Error::Api {
            message: "boom".into(),
            code: Some("oops".into()),
            status: 500,
        }
        .into();
        match err {
            CoreError::Api { status, code, .. } => {
                assert_eq!(status, Some(500));
                assert_eq!(code.as_deref(), Some("oops"));
            }
            other => panic!("expected Api error, got: {other}"),
        }
    }

    #[test]
    fn validation_headlines_the_first_error() {
        let errors = vec![
            FieldError {
                field: DraftField::Title,
                message: "is required".into(),
            },
            FieldError {
                field: DraftField::Status,
                message: "is required".into(),
            },
        ];
        let err = CoreError::validation(errors);
        assert_eq!(err.to_string(), "Title: is required");
        assert_eq!(err.field_errors().len(), 2);
    }
}
