//! `GET /ranks/{name}`: rank abbreviation lookup.
//!
//! Unknown ranks are not an error; the name comes back as its own
//! abbreviation.

use std::sync::Arc;

use armis_core::{record::RankInfo, store::PersonnelStore};
use axum::{
  Json,
  extract::{Path, State},
};

use crate::error::ApiError;

/// `GET /ranks/{name}`
pub async fn resolve<S>(
  State(store): State<Arc<S>>,
  Path(name): Path<String>,
) -> Result<Json<RankInfo>, ApiError>
where
  S: PersonnelStore,
{
  let name = name.trim();
  if name.is_empty() {
    return Err(ApiError::BadRequest("rank name must not be blank".into()));
  }
  let rank = store.resolve_rank(name).await.map_err(ApiError::unavailable)?;
  Ok(Json(rank))
}
