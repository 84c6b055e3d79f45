//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("forbidden: {0}")]
  Forbidden(String),

  #[error("internal error: {0}")]
  Internal(String),

  /// The store could not be queried; distinct from an empty result.
  #[error("storage unavailable: {0}")]
  Unavailable(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  pub fn unavailable<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Unavailable(Box::new(e))
  }
}

impl From<armis_core::Error> for ApiError {
  fn from(e: armis_core::Error) -> Self {
    use armis_core::Error as E;
    match e {
      E::NotFound(svc) => Self::NotFound(format!("personnel record {svc} not found")),
      E::Forbidden(svc) => Self::Forbidden(format!("not permitted to view {svc}")),
      E::InvalidServiceNumber(raw) => {
        Self::BadRequest(format!("invalid service number {raw:?}"))
      }
      E::StorageUnavailable(source) => Self::Unavailable(source),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Forbidden(m) => (StatusCode::FORBIDDEN, m.clone()),
      ApiError::Internal(m) => (StatusCode::INTERNAL_SERVER_ERROR, m.clone()),
      ApiError::Unavailable(e) => {
        tracing::error!(error = %e, "personnel store unavailable");
        (StatusCode::SERVICE_UNAVAILABLE, "storage unavailable".to_owned())
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
