//! Shared configuration for the shelfly TUI.
//!
//! TOML profiles, credential resolution (keyring + env + plaintext),
//! and translation to `shelfly_core::CatalogConfig`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shelfly_core::{CatalogConfig, SessionCredentials, TlsVerification};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("unknown profile '{profile}'")]
    UnknownProfile { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named catalog profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// Look up a profile by explicit name, falling back to the
    /// configured default.
    pub fn profile<'a>(
        &'a self,
        name: Option<&'a str>,
    ) -> Result<(&'a str, &'a Profile), ConfigError> {
        let name = name
            .or(self.default_profile.as_deref())
            .unwrap_or("default");
        self.profiles
            .get(name)
            .map(|p| (name, p))
            .ok_or_else(|| ConfigError::UnknownProfile {
                profile: name.into(),
            })
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default)]
    pub insecure: bool,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            insecure: false,
        }
    }
}

fn default_timeout() -> u64 {
    30
}

/// A named catalog profile.
#[derive(Debug, Deserialize, Serialize)]
pub struct Profile {
    /// Books collection URL (e.g., "https://api.example.com/books").
    pub catalog: String,

    /// Auth provider base URL. Defaults to the catalog's origin.
    pub auth: Option<String>,

    /// Username for automatic sign-in.
    pub username: Option<String>,

    /// Password (plaintext — prefer keyring or env var).
    pub password: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout (seconds).
    pub timeout: Option<u64>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "shelfly", "shelfly").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("shelfly");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load a Config from an explicit path (tests, `--config` overrides).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("SHELFLY_").split("_"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(&path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve sign-in credentials for a profile, if any are configured.
///
/// Password chain: `SHELFLY_PASSWORD` env var, then the system keyring
/// (service "shelfly", user "{profile}/password"), then plaintext in
/// the config file. A profile without a username yields `None` — the
/// TUI falls back to its interactive sign-in screen.
pub fn resolve_credentials(
    profile: &Profile,
    profile_name: &str,
) -> Option<SessionCredentials> {
    let username = profile
        .username
        .clone()
        .or_else(|| std::env::var("SHELFLY_USERNAME").ok())?;

    let password = if let Ok(pw) = std::env::var("SHELFLY_PASSWORD") {
        SecretString::from(pw)
    } else if let Some(pw) = keyring_password(profile_name) {
        pw
    } else if let Some(ref pw) = profile.password {
        SecretString::from(pw.clone())
    } else {
        return None;
    };

    Some(SessionCredentials { username, password })
}

fn keyring_password(profile_name: &str) -> Option<SecretString> {
    let entry = keyring::Entry::new("shelfly", &format!("{profile_name}/password")).ok()?;
    entry.get_password().ok().map(SecretString::from)
}

/// Store a password in the system keyring for a profile.
pub fn store_password(profile_name: &str, password: &str) -> Result<(), ConfigError> {
    keyring::Entry::new("shelfly", &format!("{profile_name}/password"))
        .and_then(|e| e.set_password(password))
        .map_err(|e| ConfigError::Validation {
            field: "keyring".into(),
            reason: e.to_string(),
        })
}

// ── Translation to runtime config ───────────────────────────────────

/// Build a `CatalogConfig` from a profile.
pub fn profile_to_catalog_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<CatalogConfig, ConfigError> {
    let books_url: url::Url = profile.catalog.parse().map_err(|_| ConfigError::Validation {
        field: "catalog".into(),
        reason: format!("invalid URL: {}", profile.catalog),
    })?;

    let auth_url = match &profile.auth {
        Some(raw) => raw.parse().map_err(|_| ConfigError::Validation {
            field: "auth".into(),
            reason: format!("invalid URL: {raw}"),
        })?,
        None => origin_of(&books_url),
    };

    let tls = if profile.insecure.unwrap_or(defaults.insecure) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    let timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));

    Ok(CatalogConfig {
        books_url,
        auth_url,
        credentials: resolve_credentials(profile, profile_name),
        tls,
        timeout,
    })
}

/// Strip the path from a URL, keeping scheme, host, and port.
fn origin_of(url: &url::Url) -> url::Url {
    let mut origin = url.clone();
    origin.set_path("");
    origin.set_query(None);
    origin.set_fragment(None);
    origin
}
