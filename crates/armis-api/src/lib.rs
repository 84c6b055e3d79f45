//! JSON REST API for ARMIS personnel dossiers.
//!
//! Exposes an axum [`Router`] backed by any
//! [`armis_core::store::PersonnelStore`]. Handlers expect an
//! [`armis_core::context::Viewer`] request extension; authenticating the
//! caller and inserting it is the mounting server's job.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", armis_api::api_router(store.clone()))
//! ```

pub mod error;
pub mod etag;
pub mod personnel;
pub mod ranks;

use std::sync::Arc;

use armis_core::store::PersonnelStore;
use axum::{Router, routing::get};

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: PersonnelStore + 'static,
{
  Router::new()
    // Personnel
    .route("/personnel", get(personnel::search::<S>))
    .route("/personnel/{svc}", get(personnel::profile::<S>))
    .route("/personnel/{svc}/courses", get(personnel::courses::<S>))
    .route("/personnel/{svc}/operations", get(personnel::operations::<S>))
    .route("/personnel/{svc}/medals", get(personnel::medals::<S>))
    .route("/personnel/{svc}/dossier", get(personnel::dossier::<S>))
    .route("/me", get(personnel::me::<S>))
    // Lookups
    .route("/ranks/{name}", get(ranks::resolve::<S>))
    .with_state(store)
}

#[cfg(test)]
mod tests;
