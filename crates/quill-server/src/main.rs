//! quill-server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens an
//! in-process SQLite store, and serves the JSON API over HTTP.
//!
//! Authentication is expected to sit in front of this process; whatever
//! verifies the caller asserts their user id in the `x-quill-user` header
//! (see `quill_api::identity`).

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use anyhow::Context as _;
use clap::Parser;
use quill_api::{ApiConfig, AppState};
use quill_store_sqlite::SqliteStore;
use serde::Deserialize;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Quill publishing server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

/// Runtime server configuration, deserialised from `config.toml` plus
/// `QUILL_*` environment overrides. Every field has a sensible default so
/// the server starts with no config file at all.
#[derive(Debug, Clone, Deserialize)]
struct ServerConfig {
  #[serde(default = "default_host")]
  host: String,
  #[serde(default = "default_port")]
  port: u16,
  #[serde(default = "default_db_path")]
  db_path: PathBuf,
  /// Posts per feed page.
  #[serde(default = "default_page_size")]
  page_size: u32,
  /// TTL of the global-timeline page cache, in seconds; 0 disables it.
  #[serde(default = "default_feed_cache_ttl")]
  feed_cache_ttl_secs: u64,
  /// Comment denylist; empty disables the policy.
  #[serde(default)]
  forbidden_words: Vec<String>,
}

fn default_host() -> String { "127.0.0.1".to_owned() }
fn default_port() -> u16 { 8080 }
fn default_db_path() -> PathBuf { PathBuf::from("quill.db") }
fn default_page_size() -> u32 { 10 }
fn default_feed_cache_ttl() -> u64 { 20 }

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("QUILL"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Expand `~` in the database path.
  let db_path = expand_tilde(&server_cfg.db_path);

  // Open SQLite store.
  let store = SqliteStore::open(&db_path)
    .await
    .with_context(|| format!("failed to open store at {db_path:?}"))?;

  // Build application state.
  let api_cfg = ApiConfig {
    page_size:       server_cfg.page_size,
    feed_cache_ttl:  Duration::from_secs(server_cfg.feed_cache_ttl_secs),
    forbidden_words: server_cfg.forbidden_words.clone(),
  };
  let app = quill_api::router(AppState::new(store, &api_cfg))
    .layer(TraceLayer::new_for_http());

  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
