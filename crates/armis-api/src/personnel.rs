//! Handlers for `/personnel` and `/me` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/personnel` | Admin only. `?q=&category=&unit=&limit=&offset=` |
//! | `GET`  | `/personnel/{svc}` | Core profile |
//! | `GET`  | `/personnel/{svc}/courses` | Newest first |
//! | `GET`  | `/personnel/{svc}/operations` | Newest first |
//! | `GET`  | `/personnel/{svc}/medals` | Newest first |
//! | `GET`  | `/personnel/{svc}/dossier` | ETag / `If-None-Match` aware |
//! | `GET`  | `/me` | Dossier of the authenticated viewer |
//!
//! Every per-person route answers 400 for a blank service number, 403 before
//! touching the store when the viewer may not see the record, and 404 when no
//! profile exists.

use std::sync::Arc;

use armis_core::{
  context::{RequestContext, Viewer},
  dossier::{Dossier, Section, load_dossier},
  record::{
    Category, CourseAttendance, MedalAward, OperationParticipation, PersonRecord,
    ServiceNumber,
  },
  store::{PersonSummary, PersonnelQuery, PersonnelStore},
};
use axum::{
  Extension, Json,
  body::Body,
  extract::{Path, Query, State},
  http::{HeaderMap, StatusCode, header},
  response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::{error::ApiError, etag};

fn authorize(viewer: &Viewer, svc: &ServiceNumber) -> Result<(), ApiError> {
  if viewer.may_view(svc) {
    Ok(())
  } else {
    Err(armis_core::Error::Forbidden(svc.clone()).into())
  }
}

async fn require_profile<S>(store: &S, svc: &ServiceNumber) -> Result<PersonRecord, ApiError>
where
  S: PersonnelStore,
{
  store
    .load_profile(svc)
    .await
    .map_err(ApiError::unavailable)?
    .ok_or_else(|| armis_core::Error::NotFound(svc.clone()).into())
}

// ─── Search ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SearchParams {
  pub q:        Option<String>,
  pub category: Option<String>,
  pub unit:     Option<String>,
  pub limit:    Option<usize>,
  pub offset:   Option<usize>,
}

impl From<SearchParams> for PersonnelQuery {
  fn from(p: SearchParams) -> Self {
    Self {
      text:     p.q.filter(|q| !q.trim().is_empty()),
      category: p.category.as_deref().map(Category::parse),
      unit:     p.unit.filter(|u| !u.trim().is_empty()),
      limit:    p.limit,
      offset:   p.offset,
    }
  }
}

/// `GET /personnel`
pub async fn search<S>(
  State(store): State<Arc<S>>,
  Extension(viewer): Extension<Viewer>,
  Query(params): Query<SearchParams>,
) -> Result<Json<Vec<PersonSummary>>, ApiError>
where
  S: PersonnelStore,
{
  if !viewer.admin {
    return Err(ApiError::Forbidden("listing personnel requires an administrator".into()));
  }
  let query = PersonnelQuery::from(params);
  let rows = store.search(&query).await.map_err(ApiError::unavailable)?;
  Ok(Json(rows))
}

// ─── Profile and history ──────────────────────────────────────────────────────

/// `GET /personnel/{svc}`
pub async fn profile<S>(
  State(store): State<Arc<S>>,
  Extension(viewer): Extension<Viewer>,
  Path(raw): Path<String>,
) -> Result<Json<PersonRecord>, ApiError>
where
  S: PersonnelStore,
{
  let svc = ServiceNumber::parse(&raw)?;
  authorize(&viewer, &svc)?;
  Ok(Json(require_profile(store.as_ref(), &svc).await?))
}

/// `GET /personnel/{svc}/courses`
pub async fn courses<S>(
  State(store): State<Arc<S>>,
  Extension(viewer): Extension<Viewer>,
  Path(raw): Path<String>,
) -> Result<Json<Vec<CourseAttendance>>, ApiError>
where
  S: PersonnelStore,
{
  let svc = ServiceNumber::parse(&raw)?;
  authorize(&viewer, &svc)?;
  require_profile(store.as_ref(), &svc).await?;
  let rows = store.load_courses(&svc).await.map_err(ApiError::unavailable)?;
  Ok(Json(rows))
}

/// `GET /personnel/{svc}/operations`
pub async fn operations<S>(
  State(store): State<Arc<S>>,
  Extension(viewer): Extension<Viewer>,
  Path(raw): Path<String>,
) -> Result<Json<Vec<OperationParticipation>>, ApiError>
where
  S: PersonnelStore,
{
  let svc = ServiceNumber::parse(&raw)?;
  authorize(&viewer, &svc)?;
  require_profile(store.as_ref(), &svc).await?;
  let rows = store
    .load_operations(&svc)
    .await
    .map_err(ApiError::unavailable)?;
  Ok(Json(rows))
}

/// `GET /personnel/{svc}/medals`
pub async fn medals<S>(
  State(store): State<Arc<S>>,
  Extension(viewer): Extension<Viewer>,
  Path(raw): Path<String>,
) -> Result<Json<Vec<MedalAward>>, ApiError>
where
  S: PersonnelStore,
{
  let svc = ServiceNumber::parse(&raw)?;
  authorize(&viewer, &svc)?;
  require_profile(store.as_ref(), &svc).await?;
  let rows = store.load_medals(&svc).await.map_err(ApiError::unavailable)?;
  Ok(Json(rows))
}

// ─── Dossier ──────────────────────────────────────────────────────────────────

/// Wire form of a dossier: the aggregate plus its section flags.
#[derive(Debug, Serialize)]
pub struct DossierBody<'a> {
  #[serde(flatten)]
  pub dossier:  &'a Dossier,
  pub sections: Vec<Section>,
}

/// `GET /personnel/{svc}/dossier`
pub async fn dossier<S>(
  State(store): State<Arc<S>>,
  Extension(viewer): Extension<Viewer>,
  Path(raw): Path<String>,
  headers: HeaderMap,
) -> Result<Response, ApiError>
where
  S: PersonnelStore,
{
  let svc = ServiceNumber::parse(&raw)?;
  let ctx = RequestContext::for_viewer(&viewer, svc);
  let dossier = load_dossier(store.as_ref(), &ctx).await?;
  dossier_response(&dossier, &headers)
}

/// `GET /me`
pub async fn me<S>(
  State(store): State<Arc<S>>,
  Extension(viewer): Extension<Viewer>,
  headers: HeaderMap,
) -> Result<Response, ApiError>
where
  S: PersonnelStore,
{
  let Some(svc) = viewer.service_number.clone() else {
    return Err(ApiError::NotFound(format!(
      "account {} has no personnel record",
      viewer.username
    )));
  };
  let ctx = RequestContext::for_viewer(&viewer, svc);
  let dossier = load_dossier(store.as_ref(), &ctx).await?;
  dossier_response(&dossier, &headers)
}

fn dossier_response(dossier: &Dossier, headers: &HeaderMap) -> Result<Response, ApiError> {
  let body = serde_json::to_vec(&DossierBody { dossier, sections: dossier.sections() })
    .map_err(|e| ApiError::Internal(e.to_string()))?;
  let tag = etag::etag_for(&body);

  if etag::if_none_match(headers, &tag) {
    return Ok((StatusCode::NOT_MODIFIED, [(header::ETAG, tag)]).into_response());
  }

  Response::builder()
    .status(StatusCode::OK)
    .header(header::CONTENT_TYPE, "application/json")
    .header(header::ETAG, &tag)
    .body(Body::from(body))
    .map_err(|e| ApiError::Internal(e.to_string()))
}
