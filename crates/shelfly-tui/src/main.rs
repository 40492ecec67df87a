//! Shelfly — terminal client for a book-catalog service.

mod action;
mod app;
mod component;
mod data_bridge;
mod event;
mod form;
mod screen;
mod screens;
mod theme;
mod tui;

use std::path::{Path, PathBuf};

use clap::Parser;
use color_eyre::eyre::{Result, eyre};
use secrecy::SecretString;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use url::Url;

use shelfly_core::{Catalog, CatalogConfig, SessionCredentials};

use crate::app::App;

#[derive(Parser)]
#[command(
    name = "shelfly",
    about = "Terminal client for a book-catalog service",
    version
)]
struct Cli {
    /// Books collection URL (e.g., https://api.example.com/books).
    /// Overrides the config file.
    #[arg(short, long, env = "SHELFLY_URL")]
    url: Option<Url>,

    /// Auth provider base URL. Defaults to the catalog's origin.
    #[arg(long, env = "SHELFLY_AUTH_URL")]
    auth_url: Option<Url>,

    /// Username for automatic sign-in (password from SHELFLY_PASSWORD).
    #[arg(short = 'U', long, env = "SHELFLY_USERNAME")]
    username: Option<String>,

    /// Config profile to use.
    #[arg(short, long)]
    profile: Option<String>,

    /// Log file path. Logging never goes to the terminal.
    #[arg(long, default_value = "/tmp/shelfly.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// File-only tracing: stdout belongs to the TUI.
fn setup_tracing(log_file: &Path, verbose: u8) -> Result<WorkerGuard> {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("shelfly={level},shelfly_core={level}")));

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)?;
    let (writer, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();

    Ok(guard)
}

/// Build the runtime catalog config: CLI flags win, the config file
/// profile is the fallback.
fn build_catalog(cli: &Cli) -> Result<Catalog> {
    let config = if let Some(url) = &cli.url {
        let mut config = CatalogConfig::for_origin(url.clone());
        if let Some(auth_url) = &cli.auth_url {
            config.auth_url = auth_url.clone();
        }
        if let Some(username) = &cli.username {
            if let Ok(password) = std::env::var("SHELFLY_PASSWORD") {
                config.credentials = Some(SessionCredentials {
                    username: username.clone(),
                    password: SecretString::from(password),
                });
            }
        }
        config
    } else {
        let file = shelfly_config::load_config_or_default();
        let (name, profile) = file.profile(cli.profile.as_deref()).map_err(|err| {
            eyre!("{err}\nPass --url or add a profile to {}", shelfly_config::config_path().display())
        })?;
        shelfly_config::profile_to_catalog_config(profile, name, &file.defaults)?
    };

    info!(books_url = %config.books_url, "starting");
    Ok(Catalog::new(config)?)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    crate::tui::install_hooks()?;
    let _guard = setup_tracing(&cli.log_file, cli.verbose)?;

    let catalog = build_catalog(&cli)?;
    App::new(catalog).run().await
}
