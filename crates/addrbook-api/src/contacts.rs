//! Handlers for `/contacts` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/contacts/` | Every contact |
//! | `POST`   | `/contacts/` | Body: [`NewContact`]; returns the stored contact |
//! | `GET`    | `/contacts/find/:id` | 404 if not found |
//! | `PATCH`  | `/contacts/:id` | Body: [`ContactPatch`]; 404 if not found |
//! | `DELETE` | `/contacts/:id` | 404 if not found |
//! | `GET`    | `/contacts/search` | Optional exact-match `name`, `surename`, `email` |
//! | `GET`    | `/contacts/upcoming-birthdays` | Born within `[today, today + 7 days]` |

use addrbook_core::{
  Contact, ContactFilter, ContactPatch, NewContact, store::ContactStore,
};
use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::{
  ApiState,
  error::ApiError,
  extract::{ApiJson, ApiPath, ApiQuery},
};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /contacts/`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
) -> Result<Json<Vec<Contact>>, ApiError>
where
  S: ContactStore,
{
  let contacts = state.store.list_all().await.map_err(ApiError::store)?;
  Ok(Json(contacts))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /contacts/find/:id`
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  ApiPath(id): ApiPath<i64>,
) -> Result<Json<Contact>, ApiError>
where
  S: ContactStore,
{
  let contact = state
    .store
    .get_by_id(id)
    .await
    .map_err(ApiError::store)?
    .ok_or(ApiError::NotFound)?;
  Ok(Json(contact))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /contacts/`: returns the stored contact, including its new id.
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  ApiJson(body): ApiJson<NewContact>,
) -> Result<Json<Contact>, ApiError>
where
  S: ContactStore,
{
  let contact = state.store.create(body).await.map_err(ApiError::store)?;
  tracing::info!(id = contact.id, "contact created");
  Ok(Json(contact))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PATCH /contacts/:id`: only the keys present in the body are written.
pub async fn update<S>(
  State(state): State<ApiState<S>>,
  ApiPath(id): ApiPath<i64>,
  ApiJson(patch): ApiJson<ContactPatch>,
) -> Result<Json<Contact>, ApiError>
where
  S: ContactStore,
{
  let contact = state
    .store
    .update(id, patch)
    .await
    .map_err(ApiError::store)?
    .ok_or(ApiError::NotFound)?;
  Ok(Json(contact))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct Message {
  pub message: String,
}

/// `DELETE /contacts/:id`, body: `{"message":"Contact deleted"}`.
pub async fn delete<S>(
  State(state): State<ApiState<S>>,
  ApiPath(id): ApiPath<i64>,
) -> Result<Json<Message>, ApiError>
where
  S: ContactStore,
{
  state
    .store
    .delete(id)
    .await
    .map_err(ApiError::store)?
    .ok_or(ApiError::NotFound)?;
  tracing::info!(id, "contact deleted");
  Ok(Json(Message { message: "Contact deleted".to_owned() }))
}

// ─── Search ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct SearchParams {
  pub name:     Option<String>,
  pub surename: Option<String>,
  pub email:    Option<String>,
}

impl From<SearchParams> for ContactFilter {
  /// Empty values (`?name=`) are treated as absent.
  fn from(p: SearchParams) -> Self {
    let set = |v: Option<String>| v.filter(|s| !s.is_empty());
    ContactFilter {
      name:     set(p.name),
      surename: set(p.surename),
      email:    set(p.email),
    }
  }
}

/// `GET /contacts/search[?name=...][&surename=...][&email=...]`
pub async fn search<S>(
  State(state): State<ApiState<S>>,
  ApiQuery(params): ApiQuery<SearchParams>,
) -> Result<Json<Vec<Contact>>, ApiError>
where
  S: ContactStore,
{
  let filter = ContactFilter::from(params);
  let contacts = state.store.search(&filter).await.map_err(ApiError::store)?;
  Ok(Json(contacts))
}

// ─── Upcoming birthdays ───────────────────────────────────────────────────────

/// `GET /contacts/upcoming-birthdays`
pub async fn upcoming_birthdays<S>(
  State(state): State<ApiState<S>>,
) -> Result<Json<Vec<Contact>>, ApiError>
where
  S: ContactStore,
{
  let today = state.clock.today();
  let contacts = state
    .store
    .upcoming_birthdays(today)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(contacts))
}
