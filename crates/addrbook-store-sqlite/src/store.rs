//! [`SqliteStore`], the SQLite implementation of [`ContactStore`].

use std::path::Path;

use addrbook_core::{
  Contact, ContactFilter, ContactPatch, NewContact,
  store::{BIRTHDAY_WINDOW_DAYS, ContactStore},
};
use chrono::{Days, NaiveDate};
use rusqlite::OptionalExtension as _;

use crate::{
  Error, Result,
  encode::{CONTACT_COLUMNS, contact_from_row, encode_date},
  schema::{self, LATEST_VERSION},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// An addrbook contact store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted. Each
/// operation borrows the connection for one `call` closure only.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and apply pending migrations.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    conn
      .call(|conn| {
        conn.pragma_update(None, "journal_mode", "WAL")?;
        Ok(())
      })
      .await?;
    let store = Self { conn };
    store.migrate().await?;
    Ok(store)
  }

  /// Open an in-memory store for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.migrate().await?;
    Ok(store)
  }

  /// Open a store at `path` without touching its schema.
  ///
  /// Used by the migration commands, which manage the schema themselves.
  pub async fn open_unmigrated(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    Ok(Self { conn })
  }

  // ── Migrations ────────────────────────────────────────────────────────────

  /// The schema version recorded in `PRAGMA user_version`.
  pub async fn schema_version(&self) -> Result<i64> {
    let version: i64 = self
      .conn
      .call(|conn| Ok(conn.query_row("PRAGMA user_version", [], |r| r.get(0))?))
      .await?;
    Ok(version)
  }

  /// Apply every pending migration. Returns the resulting schema version.
  pub async fn migrate(&self) -> Result<i64> {
    let current = self.schema_version().await?;
    if current > LATEST_VERSION {
      return Err(Error::UnknownSchemaVersion {
        found:  current,
        latest: LATEST_VERSION,
      });
    }

    for m in schema::pending(current) {
      tracing::info!(version = m.version, "applying migration: {}", m.description);
      self.run_migration_script(m.up, m.version).await?;
    }
    Ok(LATEST_VERSION)
  }

  /// Revert migrations until the schema is at `target`. Version 0 means no
  /// tables at all.
  pub async fn rollback(&self, target: i64) -> Result<i64> {
    let current = self.schema_version().await?;
    if target < 0 || target > current || current > LATEST_VERSION {
      return Err(Error::InvalidRollbackTarget { current, target });
    }

    for m in schema::to_revert(current, target) {
      tracing::info!(version = m.version, "reverting migration: {}", m.description);
      self.run_migration_script(m.down, m.version - 1).await?;
    }
    Ok(target)
  }

  /// Run `sql` and record `resulting_version` in one transaction.
  async fn run_migration_script(
    &self,
    sql: &'static str,
    resulting_version: i64,
  ) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute_batch(sql)?;
        tx.pragma_update(None, "user_version", resulting_version)?;
        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run `sql` (a `SELECT` over [`CONTACT_COLUMNS`]) and collect every row.
  async fn select_contacts(
    &self,
    sql: String,
    params: Vec<String>,
  ) -> Result<Vec<Contact>> {
    let contacts = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params), contact_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(contacts)
  }
}

fn select_by_id(
  conn: &rusqlite::Connection,
  id: i64,
) -> rusqlite::Result<Option<Contact>> {
  conn
    .query_row(
      &format!("SELECT {CONTACT_COLUMNS} FROM contacts WHERE id = ?1"),
      rusqlite::params![id],
      contact_from_row,
    )
    .optional()
}

// ─── ContactStore impl ───────────────────────────────────────────────────────

impl ContactStore for SqliteStore {
  type Error = Error;

  async fn list_all(&self) -> Result<Vec<Contact>> {
    self
      .select_contacts(
        format!("SELECT {CONTACT_COLUMNS} FROM contacts ORDER BY id"),
        Vec::new(),
      )
      .await
  }

  async fn get_by_id(&self, id: i64) -> Result<Option<Contact>> {
    let contact = self.conn.call(move |conn| Ok(select_by_id(conn, id)?)).await?;
    Ok(contact)
  }

  async fn create(&self, input: NewContact) -> Result<Contact> {
    let dob = encode_date(input.date_of_birth);
    let row = input.clone();

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO contacts (
             name, surename, email, phone_number, date_of_birth, description
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![
            row.name,
            row.surename,
            row.email,
            row.phone_number,
            dob,
            row.description,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    tracing::debug!(id, "created contact");
    Ok(input.with_id(id))
  }

  async fn update(&self, id: i64, patch: ContactPatch) -> Result<Option<Contact>> {
    let updated = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let Some(mut contact) = select_by_id(&tx, id)? else {
          return Ok(None);
        };

        if patch.is_empty() {
          return Ok(Some(contact));
        }

        patch.apply_to(&mut contact);
        tx.execute(
          "UPDATE contacts
           SET name = ?1, surename = ?2, email = ?3, phone_number = ?4,
               date_of_birth = ?5, description = ?6
           WHERE id = ?7",
          rusqlite::params![
            contact.name,
            contact.surename,
            contact.email,
            contact.phone_number,
            encode_date(contact.date_of_birth),
            contact.description,
            id,
          ],
        )?;
        tx.commit()?;
        Ok(Some(contact))
      })
      .await?;

    if updated.is_some() {
      tracing::debug!(id, "updated contact");
    }
    Ok(updated)
  }

  async fn delete(&self, id: i64) -> Result<Option<Contact>> {
    let removed = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let Some(contact) = select_by_id(&tx, id)? else {
          return Ok(None);
        };
        tx.execute("DELETE FROM contacts WHERE id = ?1", rusqlite::params![id])?;
        tx.commit()?;
        Ok(Some(contact))
      })
      .await?;

    if removed.is_some() {
      tracing::debug!(id, "deleted contact");
    }
    Ok(removed)
  }

  async fn search(&self, filter: &ContactFilter) -> Result<Vec<Contact>> {
    if filter.is_empty() {
      return self.list_all().await;
    }

    // Column names come from a fixed list; only values are bound.
    let conditions = filter.conditions();
    let preds: Vec<String> = conditions
      .iter()
      .enumerate()
      .map(|(i, (column, _))| format!("{column} = ?{}", i + 1))
      .collect();
    let where_clause = format!("WHERE {}", preds.join(" AND "));
    let params = conditions.iter().map(|(_, v)| (*v).to_owned()).collect();

    self
      .select_contacts(
        format!("SELECT {CONTACT_COLUMNS} FROM contacts {where_clause} ORDER BY id"),
        params,
      )
      .await
  }

  async fn upcoming_birthdays(&self, today: NaiveDate) -> Result<Vec<Contact>> {
    let until = today
      .checked_add_days(Days::new(BIRTHDAY_WINDOW_DAYS))
      .unwrap_or(NaiveDate::MAX);

    self
      .select_contacts(
        format!(
          "SELECT {CONTACT_COLUMNS} FROM contacts
           WHERE date_of_birth BETWEEN ?1 AND ?2
           ORDER BY id"
        ),
        vec![encode_date(today), encode_date(until)],
      )
      .await
  }
}
