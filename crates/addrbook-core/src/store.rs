//! The `ContactStore` trait.
//!
//! Implemented by storage backends (e.g. `addrbook-store-sqlite`). The HTTP
//! layer depends on this abstraction, not on any concrete backend.

use std::future::Future;

use chrono::NaiveDate;

use crate::contact::{Contact, ContactFilter, ContactPatch, NewContact};

/// Number of days after `today` still counted as "upcoming" by
/// [`ContactStore::upcoming_birthdays`].
pub const BIRTHDAY_WINDOW_DAYS: u64 = 7;

/// Abstraction over an addrbook contact store backend.
///
/// Every method is a single logical operation against the store. "Not found"
/// is reported as `None` rather than an error so callers decide how to
/// surface it.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait ContactStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// All contacts in the store's natural (ascending `id`) order.
  fn list_all(
    &self,
  ) -> impl Future<Output = Result<Vec<Contact>, Self::Error>> + Send + '_;

  /// Retrieve a contact by id. Returns `None` if not found.
  fn get_by_id(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Contact>, Self::Error>> + Send + '_;

  /// Insert a new contact and return it with its store-assigned id.
  fn create(
    &self,
    input: NewContact,
  ) -> impl Future<Output = Result<Contact, Self::Error>> + Send + '_;

  /// Apply `patch` to the contact with `id` and return the updated record.
  /// Returns `None` (and writes nothing) if the contact does not exist.
  fn update(
    &self,
    id: i64,
    patch: ContactPatch,
  ) -> impl Future<Output = Result<Option<Contact>, Self::Error>> + Send + '_;

  /// Permanently remove the contact with `id`, returning the removed record.
  /// Returns `None` if the contact does not exist.
  fn delete(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Contact>, Self::Error>> + Send + '_;

  /// Contacts whose fields exactly equal every filter that is set. An empty
  /// filter matches everything.
  fn search<'a>(
    &'a self,
    filter: &'a ContactFilter,
  ) -> impl Future<Output = Result<Vec<Contact>, Self::Error>> + Send + 'a;

  /// Contacts with `today <= date_of_birth <= today + 7 days`.
  ///
  /// This compares whole calendar dates; the year is not normalised, so a
  /// contact born in an earlier year never matches.
  fn upcoming_birthdays(
    &self,
    today: NaiveDate,
  ) -> impl Future<Output = Result<Vec<Contact>, Self::Error>> + Send + '_;
}
