//! Encoding and decoding helpers between [`Contact`] and `contacts` rows.
//!
//! Dates are stored as `YYYY-MM-DD` text so that SQL string comparison
//! matches calendar order.

use addrbook_core::Contact;
use chrono::NaiveDate;
use rusqlite::{Row, types::Type};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Column list shared by every `SELECT`, in the order [`contact_from_row`]
/// reads them.
pub const CONTACT_COLUMNS: &str =
  "id, name, surename, email, phone_number, date_of_birth, description";

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate, chrono::ParseError> {
  NaiveDate::parse_from_str(s, DATE_FORMAT)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Build a [`Contact`] from a row selected with [`CONTACT_COLUMNS`].
pub fn contact_from_row(row: &Row<'_>) -> rusqlite::Result<Contact> {
  let dob: String = row.get(5)?;
  let date_of_birth = decode_date(&dob).map_err(|e| {
    rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e))
  })?;

  Ok(Contact {
    id: row.get(0)?,
    name: row.get(1)?,
    surename: row.get(2)?,
    email: row.get(3)?,
    phone_number: row.get(4)?,
    date_of_birth,
    description: row.get(6)?,
  })
}
