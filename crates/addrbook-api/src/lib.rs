//! JSON REST API for addrbook.
//!
//! Exposes an axum [`Router`] backed by any [`addrbook_core::ContactStore`].
//! Transport and logging middleware are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", addrbook_api::api_router(store.clone(), Arc::new(SystemClock)))
//! ```

pub mod clock;
pub mod contacts;
pub mod error;
pub mod extract;

use std::sync::Arc;

use addrbook_core::store::ContactStore;
use axum::{
  Router,
  routing::{get, patch},
};

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::ApiError;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all handlers.
pub struct ApiState<S> {
  pub store: Arc<S>,
  pub clock: Arc<dyn Clock>,
}

impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self {
      store: Arc::clone(&self.store),
      clock: Arc::clone(&self.clock),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the contacts router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>, clock: Arc<dyn Clock>) -> Router<()>
where
  S: ContactStore + 'static,
{
  Router::new()
    .route(
      "/contacts/",
      get(contacts::list::<S>).post(contacts::create::<S>),
    )
    .route(
      "/contacts",
      get(contacts::list::<S>).post(contacts::create::<S>),
    )
    .route("/contacts/find/{id}", get(contacts::get_one::<S>))
    .route("/contacts/search", get(contacts::search::<S>))
    .route(
      "/contacts/upcoming-birthdays",
      get(contacts::upcoming_birthdays::<S>),
    )
    .route(
      "/contacts/{id}",
      patch(contacts::update::<S>).delete(contacts::delete::<S>),
    )
    .with_state(ApiState { store, clock })
}

// ─── Integration tests ────────────────────────────────────────────────────────
