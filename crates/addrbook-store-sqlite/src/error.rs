//! Error type for `addrbook-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  /// The database was written by a newer build that knows more migrations.
  #[error("database schema version {found} is newer than the latest known version {latest}")]
  UnknownSchemaVersion { found: i64, latest: i64 },

  #[error("cannot roll back from schema version {current} to {target}")]
  InvalidRollbackTarget { current: i64, target: i64 },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
