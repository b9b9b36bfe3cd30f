//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every error body has the shape `{"detail": "<message>"}`.

use axum::{
  Json,
  extract::rejection::{JsonRejection, PathRejection, QueryRejection},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Body text for every 500 response.
pub const INTERNAL_ERROR_DETAIL: &str = "Internal Server Error";

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("Contact not found")]
  NotFound,

  /// The request did not match the expected shape; raised before any store
  /// access.
  #[error("{0}")]
  Validation(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  pub fn store(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    ApiError::Store(Box::new(e))
  }
}

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self {
    ApiError::Validation(rejection.body_text())
  }
}

impl From<PathRejection> for ApiError {
  fn from(rejection: PathRejection) -> Self {
    ApiError::Validation(rejection.body_text())
  }
}

impl From<QueryRejection> for ApiError {
  fn from(rejection: QueryRejection) -> Self {
    ApiError::Validation(rejection.body_text())
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, detail) = match &self {
      ApiError::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
      ApiError::Validation(m) => (StatusCode::UNPROCESSABLE_ENTITY, m.clone()),
      ApiError::Store(e) => {
        // Store internals stay in the log.
        tracing::error!(error = %e, "store operation failed");
        (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_DETAIL.to_owned())
      }
    };
    (status, Json(json!({ "detail": detail }))).into_response()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  use serde_json::Value;

  async fn body_of(err: ApiError) -> (StatusCode, Value) {
    let resp = err.into_response();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
  }

  #[tokio::test]
  async fn store_error_detail_is_generic() {
    let inner = std::io::Error::other("no such table: contacts");
    let (status, body) = body_of(ApiError::store(inner)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "detail": "Internal Server Error" }));
  }

  #[tokio::test]
  async fn not_found_and_validation_keep_their_message() {
    let (status, body) = body_of(ApiError::NotFound).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "detail": "Contact not found" }));

    let (status, body) =
      body_of(ApiError::Validation("missing field `email`".into())).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body, json!({ "detail": "missing field `email`" }));
  }
}
