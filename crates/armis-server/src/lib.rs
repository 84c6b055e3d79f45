//! HTTP server for ARMIS personnel dossiers.
//!
//! Wraps the [`armis_api`] router in Basic authentication and request
//! tracing, and adds an unauthenticated health check.
//!
//! | Path | Auth |
//! |------|------|
//! | `/health` | none |
//! | `/api/...` | Basic, see [`auth`] |

pub mod auth;
pub mod error;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use armis_core::store::PersonnelStore;
use axum::{Json, Router, middleware, routing::get};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;

use auth::{Account, AuthConfig, require_viewer};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `ARMIS_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
  #[serde(default)]
  pub accounts:   Vec<Account>,
}

impl ServerConfig {
  pub fn auth(&self) -> AuthConfig {
    AuthConfig { accounts: self.accounts.clone() }
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state the router is built from.
#[derive(Clone)]
pub struct AppState<S: PersonnelStore> {
  pub store: Arc<S>,
  pub auth:  Arc<AuthConfig>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full server [`Router`].
pub fn router<S>(state: AppState<S>) -> Router
where
  S: PersonnelStore + 'static,
{
  let api = armis_api::api_router(state.store)
    .layer(middleware::from_fn_with_state(state.auth, require_viewer));

  Router::new()
    .route("/health", get(health))
    .nest("/api", api)
    .layer(TraceLayer::new_for_http())
}

async fn health() -> Json<Value> {
  Json(json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") }))
}
