//! addrbook server binary.
//!
//! Reads `config.toml` (or the path given with `--config`), opens the SQLite
//! store, and serves the contacts API over HTTP.
//!
//! # Schema management
//!
//! ```
//! cargo run -p addrbook-server -- migrate
//! cargo run -p addrbook-server -- rollback --to 1
//! ```

use std::{path::PathBuf, sync::Arc};

use addrbook_api::SystemClock;
use addrbook_server::{ServerConfig, app, shutdown_signal};
use addrbook_store_sqlite::SqliteStore;
use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "addrbook contact API server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
  /// Apply pending migrations and serve HTTP (the default).
  Serve,
  /// Apply pending migrations and exit.
  Migrate,
  /// Revert migrations down to the given schema version and exit.
  Rollback {
    /// Target schema version; 0 removes the contacts table.
    #[arg(long)]
    to: i64,
  },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let server_cfg = ServerConfig::load(&cli.config)
    .with_context(|| format!("failed to load configuration from {:?}", cli.config))?;
  let db_path = &server_cfg.database_path;

  match cli.command.unwrap_or(Command::Serve) {
    Command::Serve => serve(&server_cfg).await,
    Command::Migrate => {
      let store = SqliteStore::open_unmigrated(db_path)
        .await
        .with_context(|| format!("failed to open database at {db_path:?}"))?;
      let version = store.migrate().await.context("migration failed")?;
      tracing::info!(version, "schema is up to date");
      Ok(())
    }
    Command::Rollback { to } => {
      let store = SqliteStore::open_unmigrated(db_path)
        .await
        .with_context(|| format!("failed to open database at {db_path:?}"))?;
      let version = store.rollback(to).await.context("rollback failed")?;
      tracing::info!(version, "schema rolled back");
      Ok(())
    }
  }
}

async fn serve(server_cfg: &ServerConfig) -> anyhow::Result<()> {
  let db_path = &server_cfg.database_path;
  let store = SqliteStore::open(db_path)
    .await
    .with_context(|| format!("failed to open store at {db_path:?}"))?;

  let app = app(Arc::new(store), Arc::new(SystemClock));
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

  Ok(())
}
