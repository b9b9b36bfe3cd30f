//! HTTP entry point for addrbook: configuration, application assembly, and
//! shutdown handling. The binary in `main.rs` is a thin CLI over this.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use addrbook_api::Clock;
use addrbook_core::store::ContactStore;
use axum::Router;
use config::{Config, ConfigBuilder, ConfigError, builder::DefaultState};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

/// Path prefix under which the contacts API is mounted.
pub const API_PREFIX: &str = "/api";

/// Prefix for environment-variable overrides, e.g. `ADDRBOOK_PORT=9000`.
pub const ENV_PREFIX: &str = "ADDRBOOK";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_DATABASE: &str = "addrbook.db";

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and the
/// environment.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ServerConfig {
  pub host:          String,
  pub port:          u16,
  pub database_path: PathBuf,
}

impl ServerConfig {
  /// Read `path` (if it exists), then `ADDRBOOK_*` environment variables.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    Self::from_sources(
      Config::builder()
        .add_source(config::File::from(path.to_path_buf()).required(false))
        .add_source(config::Environment::with_prefix(ENV_PREFIX)),
    )
  }

  /// Fill in defaults for anything `builder` leaves unset and deserialise.
  pub fn from_sources(
    builder: ConfigBuilder<DefaultState>,
  ) -> Result<Self, ConfigError> {
    let mut cfg: ServerConfig = builder
      .set_default("host", DEFAULT_HOST)?
      .set_default("port", i64::from(DEFAULT_PORT))?
      .set_default("database_path", DEFAULT_DATABASE)?
      .build()?
      .try_deserialize()?;
    cfg.database_path = expand_tilde(&cfg.database_path);
    Ok(cfg)
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
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

// ─── Application ──────────────────────────────────────────────────────────────

/// The full application: the contacts API under [`API_PREFIX`], with
/// request tracing.
pub fn app<S>(store: Arc<S>, clock: Arc<dyn Clock>) -> Router
where
  S: ContactStore + 'static,
{
  Router::new()
    .nest(API_PREFIX, addrbook_api::api_router(store, clock))
    .layer(TraceLayer::new_for_http())
}

/// Resolves on Ctrl-C or, on Unix, SIGTERM.
pub async fn shutdown_signal() {
  let ctrl_c = async {
    if let Err(e) = tokio::signal::ctrl_c().await {
      tracing::warn!("failed to listen for Ctrl-C: {e}");
      std::future::pending::<()>().await;
    }
  };

  #[cfg(unix)]
  let sigterm = async {
    use tokio::signal::unix::{SignalKind, signal};
    match signal(SignalKind::terminate()) {
      Ok(mut s) => {
        s.recv().await;
      }
      Err(e) => {
        tracing::warn!("failed to listen for SIGTERM: {e}");
        std::future::pending::<()>().await;
      }
    }
  };

  #[cfg(not(unix))]
  let sigterm = std::future::pending::<()>();

  tokio::select! {
    () = ctrl_c  => {}
    () = sigterm => {}
  }
  tracing::info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
  use super::*;

  use addrbook_api::FixedClock;
  use addrbook_store_sqlite::SqliteStore;
  use axum::{
    body::Body,
    http::{Request, StatusCode},
  };
  use chrono::NaiveDate;
  use config::{File, FileFormat};
  use tower::ServiceExt as _;

  fn from_toml(toml: &str) -> ServerConfig {
    ServerConfig::from_sources(
      Config::builder().add_source(File::from_str(toml, FileFormat::Toml)),
    )
    .unwrap()
  }

  #[test]
  fn defaults_fill_missing_keys() {
    let cfg = from_toml("");
    assert_eq!(cfg.host, DEFAULT_HOST);
    assert_eq!(cfg.port, DEFAULT_PORT);
    assert_eq!(cfg.database_path, PathBuf::from(DEFAULT_DATABASE));
    assert_eq!(cfg.address(), "0.0.0.0:8000");
  }

  #[test]
  fn file_values_override_defaults() {
    let cfg = from_toml(
      "host = \"127.0.0.1\"\nport = 9000\ndatabase_path = \"/var/lib/addrbook.db\"\n",
    );
    assert_eq!(cfg.address(), "127.0.0.1:9000");
    assert_eq!(cfg.database_path, PathBuf::from("/var/lib/addrbook.db"));
  }

  #[test]
  fn invalid_port_is_rejected() {
    let result = ServerConfig::from_sources(
      Config::builder().add_source(File::from_str("port = \"eighty\"", FileFormat::Toml)),
    );
    assert!(result.is_err());
  }

  #[test]
  fn expand_tilde_leaves_plain_paths() {
    assert_eq!(expand_tilde(Path::new("/tmp/a.db")), PathBuf::from("/tmp/a.db"));
    assert_eq!(expand_tilde(Path::new("a.db")), PathBuf::from("a.db"));
  }

  #[tokio::test]
  async fn api_is_mounted_under_prefix() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
    let app = app(Arc::new(store), Arc::new(FixedClock(today)));

    let req = Request::builder().uri("/api/contacts/").body(Body::empty()).unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let req = Request::builder().uri("/contacts/").body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }
}
