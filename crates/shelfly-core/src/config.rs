// ── Runtime connection configuration ──
//
// These types describe *how* to reach the catalog and auth provider.
// They carry credential data and connection tuning, but never touch
// disk. The TUI constructs a `CatalogConfig` and hands it in.

use secrecy::SecretString;
use url::Url;

/// Pre-supplied sign-in credentials.
///
/// When present, [`Catalog::resolve_session`](crate::Catalog::resolve_session)
/// signs in automatically instead of landing on the sign-in screen.
#[derive(Debug, Clone)]
pub struct SessionCredentials {
    pub username: String,
    pub password: SecretString,
}

/// TLS verification strategy.
#[derive(Debug, Clone, Default)]
pub enum TlsVerification {
    /// System CA store (strict). Default: the catalog is a public
    /// HTTPS service, not a self-signed local appliance.
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (self-signed certs on dev servers).
    DangerAcceptInvalid,
}

impl PartialEq for TlsVerification {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::SystemDefaults, Self::SystemDefaults) => true,
            (Self::CustomCa(a), Self::CustomCa(b)) => a == b,
            (Self::DangerAcceptInvalid, Self::DangerAcceptInvalid) => true,
            _ => false,
        }
    }
}

impl Eq for TlsVerification {}

/// Configuration for connecting to a single catalog deployment.
///
/// Built by the TUI from config file + CLI flags; core never reads
/// config files itself.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Books collection URL. The base *is* the collection:
    /// `GET {books_url}` lists, `PUT {books_url}/{id}` updates.
    pub books_url: Url,
    /// Auth provider base URL; the session endpoint lives under it.
    pub auth_url: Url,
    /// Optional pre-supplied credentials for automatic sign-in.
    pub credentials: Option<SessionCredentials>,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Request timeout.
    pub timeout: std::time::Duration,
}

impl CatalogConfig {
    /// Minimal config for a deployment where catalog and auth share
    /// one origin.
    pub fn for_origin(origin: Url) -> Self {
        Self {
            books_url: origin.clone(),
            auth_url: origin,
            credentials: None,
            tls: TlsVerification::default(),
            timeout: std::time::Duration::from_secs(30),
        }
    }
}
