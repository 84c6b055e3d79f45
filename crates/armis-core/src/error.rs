//! Error types for `armis-core`.

use thiserror::Error;

use crate::record::ServiceNumber;

#[derive(Debug, Error)]
pub enum Error {
  /// No personnel record exists for the service number. Distinct from a
  /// record whose history sections are simply empty.
  #[error("personnel record not found: {0}")]
  NotFound(ServiceNumber),

  #[error("viewer may not see personnel record {0}")]
  Forbidden(ServiceNumber),

  #[error("invalid service number: {0:?}")]
  InvalidServiceNumber(String),

  /// The personnel store could not be queried.
  #[error("storage unavailable: {0}")]
  StorageUnavailable(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Wrap a backend error as [`Error::StorageUnavailable`].
  pub fn storage<E>(source: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::StorageUnavailable(Box::new(source))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
