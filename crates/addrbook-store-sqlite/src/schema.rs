//! Versioned schema migrations for the addrbook SQLite store.
//!
//! The applied version is kept in `PRAGMA user_version`. Migration `n` moves
//! the schema from version `n - 1` to `n`; its `down` script reverses it.

/// One step of schema history.
#[derive(Debug, Clone, Copy)]
pub struct Migration {
  pub version:     i64,
  pub description: &'static str,
  pub up:          &'static str,
  pub down:        &'static str,
}

/// Every migration, oldest first. Versions are contiguous from 1.
pub const MIGRATIONS: &[Migration] = &[
  Migration {
    version:     1,
    description: "create contact table",
    up:          "
CREATE TABLE contact (
    id             INTEGER PRIMARY KEY,
    name           TEXT NOT NULL,
    surename       TEXT NOT NULL,
    email          TEXT NOT NULL,
    phone_number   TEXT NOT NULL,
    date_of_birth  TEXT NOT NULL,   -- ISO 8601 calendar date, YYYY-MM-DD
    description    TEXT
);
",
    down:        "DROP TABLE contact;",
  },
  Migration {
    version:     2,
    description: "rename contact table to contacts",
    up:          "ALTER TABLE contact RENAME TO contacts;",
    down:        "ALTER TABLE contacts RENAME TO contact;",
  },
];

/// The schema version this build reads and writes.
pub const LATEST_VERSION: i64 = MIGRATIONS.len() as i64;

/// Migrations needed to go from `current` up to [`LATEST_VERSION`].
pub fn pending(current: i64) -> impl Iterator<Item = &'static Migration> {
  MIGRATIONS.iter().filter(move |m| m.version > current)
}

/// Migrations to undo, newest first, to go from `current` down to `target`.
pub fn to_revert(
  current: i64,
  target: i64,
) -> impl Iterator<Item = &'static Migration> {
  MIGRATIONS
    .iter()
    .rev()
    .filter(move |m| m.version <= current && m.version > target)
}
