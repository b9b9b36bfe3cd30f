//! The contact entity and its input shapes.
//!
//! A contact is stored as a single row. Three shapes exist: the stored
//! [`Contact`] (with its store-assigned `id`), the [`NewContact`] creation
//! payload, and the [`ContactPatch`] partial-update payload.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

// ─── Contact ─────────────────────────────────────────────────────────────────

/// A stored address-book entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
  /// Assigned by the store on creation; never changes afterwards.
  pub id:            i64,
  pub name:          String,
  /// Surname. The misspelling is part of the wire format and column name.
  pub surename:      String,
  pub email:         String,
  pub phone_number:  String,
  pub date_of_birth: NaiveDate,
  pub description:   Option<String>,
}

// ─── NewContact ──────────────────────────────────────────────────────────────

/// Input to [`crate::store::ContactStore::create`]. The `id` is always chosen
/// by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewContact {
  pub name:          String,
  pub surename:      String,
  pub email:         String,
  pub phone_number:  String,
  pub date_of_birth: NaiveDate,
  #[serde(default)]
  pub description:   Option<String>,
}

impl NewContact {
  /// Attach a store-assigned id, producing the stored record.
  pub fn with_id(self, id: i64) -> Contact {
    Contact {
      id,
      name: self.name,
      surename: self.surename,
      email: self.email,
      phone_number: self.phone_number,
      date_of_birth: self.date_of_birth,
      description: self.description,
    }
  }
}

// ─── ContactPatch ────────────────────────────────────────────────────────────

/// A partial update. Only the fields that are `Some` are written.
///
/// `description` is nullable in storage, so it carries two levels of
/// optionality: `None` leaves it untouched, `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ContactPatch {
  #[serde(default)]
  pub name:          Option<String>,
  #[serde(default)]
  pub surename:      Option<String>,
  #[serde(default)]
  pub email:         Option<String>,
  #[serde(default)]
  pub phone_number:  Option<String>,
  #[serde(default)]
  pub date_of_birth: Option<NaiveDate>,
  #[serde(default, deserialize_with = "present")]
  pub description:   Option<Option<String>>,
}

impl ContactPatch {
  /// `true` if applying this patch would change nothing.
  pub fn is_empty(&self) -> bool {
    self.name.is_none()
      && self.surename.is_none()
      && self.email.is_none()
      && self.phone_number.is_none()
      && self.date_of_birth.is_none()
      && self.description.is_none()
  }

  /// Write every supplied field onto `contact`, leaving the rest unchanged.
  pub fn apply_to(self, contact: &mut Contact) {
    if let Some(name) = self.name {
      contact.name = name;
    }
    if let Some(surename) = self.surename {
      contact.surename = surename;
    }
    if let Some(email) = self.email {
      contact.email = email;
    }
    if let Some(phone_number) = self.phone_number {
      contact.phone_number = phone_number;
    }
    if let Some(date_of_birth) = self.date_of_birth {
      contact.date_of_birth = date_of_birth;
    }
    if let Some(description) = self.description {
      contact.description = description;
    }
  }
}

/// Distinguishes an explicit `null` from an absent key: any value that
/// reaches this function was present in the input.
fn present<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
where
  D: Deserializer<'de>,
  T: Deserialize<'de>,
{
  Option::<T>::deserialize(de).map(Some)
}

// ─── ContactFilter ───────────────────────────────────────────────────────────

/// Exact-match filters for [`crate::store::ContactStore::search`].
///
/// Every present field must equal the stored value byte-for-byte; present
/// fields combine with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFilter {
  pub name:     Option<String>,
  pub surename: Option<String>,
  pub email:    Option<String>,
}

impl ContactFilter {
  pub fn is_empty(&self) -> bool {
    self.name.is_none() && self.surename.is_none() && self.email.is_none()
  }

  /// Column/value pairs for the filters that are set, in a stable order.
  pub fn conditions(&self) -> Vec<(&'static str, &str)> {
    [
      ("name", self.name.as_deref()),
      ("surename", self.surename.as_deref()),
      ("email", self.email.as_deref()),
    ]
    .into_iter()
    .filter_map(|(column, value)| value.map(|v| (column, v)))
    .collect()
  }
}
