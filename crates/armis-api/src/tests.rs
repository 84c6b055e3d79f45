//! Router tests against a seeded in-memory SQLite store.

use std::sync::Arc;

use armis_core::{context::Viewer, record::ServiceNumber};
use armis_store_sqlite::{
  SqliteStore,
  seed::{
    AwardRow, DeploymentRow, Fixture, MedalRow, OperationRow, PersonRow, RankRow,
  },
};
use axum::{
  Extension, Router,
  body::{Body, to_bytes},
  http::{Request, StatusCode, header},
};
use serde_json::Value;
use tower::ServiceExt;

use crate::api_router;

fn svc(s: &str) -> ServiceNumber { ServiceNumber::parse(s).unwrap() }

fn fixture() -> Fixture {
  let mwamba = PersonRow {
    service_number: "123".into(),
    first_name: "John Peter".into(),
    last_name: "Mwamba".into(),
    date_of_birth: Some("1985-04-20".into()),
    rank: "Major".into(),
    category: "Officer".into(),
    unit: Some("1 Inf Bn".into()),
    ..PersonRow::default()
  };
  let banda = PersonRow {
    service_number: "456".into(),
    first_name: "Grace".into(),
    last_name: "Banda".into(),
    date_of_birth: Some("0000-00-00".into()),
    rank: "Sergeant".into(),
    category: "NCO".into(),
    unit: Some("2 Engr".into()),
    ..PersonRow::default()
  };

  Fixture {
    ranks: vec![
      RankRow { name: "Major".into(), abbreviation: "Maj".into() },
      RankRow { name: "Sergeant".into(), abbreviation: "Sgt".into() },
    ],
    operations: vec![OperationRow {
      operation_id:   "OP1".into(),
      name:           Some("Op Safe Haven".into()),
      operation_type: None,
      location:       None,
    }],
    medals: vec![MedalRow {
      medal_id:    "M1".into(),
      name:        Some("Long Service".into()),
      description: None,
    }],
    people: vec![mwamba, banda],
    deployments: vec![DeploymentRow {
      service_number: "123".into(),
      operation_id:   "OP1".into(),
      start_date:     Some("2012-01-01".into()),
      end_date:       None,
    }],
    awards: vec![AwardRow {
      service_number: "123".into(),
      medal_id:       "M1".into(),
      description:    None,
      issue_date:     Some("2020-05-05".into()),
      authority:      None,
      comment:        None,
    }],
    ..Fixture::default()
  }
}

async fn seeded() -> Arc<SqliteStore> {
  let store = SqliteStore::open_in_memory().await.unwrap();
  store.import(fixture()).await.unwrap();
  Arc::new(store)
}

fn admin() -> Viewer {
  Viewer { username: "hq".into(), service_number: None, admin: true }
}

fn member(s: &str) -> Viewer {
  Viewer { username: "member".into(), service_number: Some(svc(s)), admin: false }
}

fn app(store: Arc<SqliteStore>, viewer: Viewer) -> Router {
  api_router(store).layer(Extension(viewer))
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
  let resp = app
    .oneshot(Request::get(uri).body(Body::empty()).unwrap())
    .await
    .unwrap();
  let status = resp.status();
  let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  let json = if bytes.is_empty() {
    Value::Null
  } else {
    serde_json::from_slice(&bytes).unwrap()
  };
  (status, json)
}

// ─── Dossier ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn dossier_for_officer() {
  let (status, body) = get(app(seeded().await, admin()), "/personnel/123/dossier").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["heading"], "Maj J P Mwamba (123)");
  assert_eq!(body["bio"]["initials_dotted"], "J.P.");
  assert!(body["age"].is_u64());
  assert_eq!(body["operations"].as_array().unwrap().len(), 1);
  assert_eq!(body["courses"].as_array().unwrap().len(), 0);

  let sections = body["sections"].as_array().unwrap();
  let courses = sections.iter().find(|s| s["kind"] == "courses").unwrap();
  assert_eq!(courses["present"], false);
  let medals = sections.iter().find(|s| s["kind"] == "medals").unwrap();
  assert_eq!(medals["present"], true);
}

#[tokio::test]
async fn dossier_for_nco_with_unreadable_dob() {
  let (status, body) = get(app(seeded().await, member("456")), "/personnel/456/dossier").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["heading"], "Sgt Banda G (456)");
  assert!(body["age"].is_null());
}

#[tokio::test]
async fn dossier_forbidden_for_other_member() {
  let (status, body) = get(app(seeded().await, member("456")), "/personnel/123/dossier").await;
  assert_eq!(status, StatusCode::FORBIDDEN);
  assert!(body["error"].as_str().unwrap().contains("123"));
}

#[tokio::test]
async fn dossier_not_found() {
  let (status, _) = get(app(seeded().await, admin()), "/personnel/999/dossier").await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn dossier_etag_round_trip() {
  let router = app(seeded().await, admin());

  let first = router
    .clone()
    .oneshot(Request::get("/personnel/123/dossier").body(Body::empty()).unwrap())
    .await
    .unwrap();
  assert_eq!(first.status(), StatusCode::OK);
  let tag = first
    .headers()
    .get(header::ETAG)
    .unwrap()
    .to_str()
    .unwrap()
    .to_owned();

  let second = router
    .oneshot(
      Request::get("/personnel/123/dossier")
        .header(header::IF_NONE_MATCH, &tag)
        .body(Body::empty())
        .unwrap(),
    )
    .await
    .unwrap();
  assert_eq!(second.status(), StatusCode::NOT_MODIFIED);
  assert_eq!(second.headers().get(header::ETAG).unwrap(), tag.as_str());
}

#[tokio::test]
async fn blank_service_number_is_json_bad_request() {
  let store = seeded().await;

  for uri in ["/personnel/%20/dossier", "/personnel/%20", "/personnel/%20%20/medals"] {
    let resp = app(store.clone(), admin())
      .oneshot(Request::get(uri).body(Body::empty()).unwrap())
      .await
      .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{uri}");
    assert_eq!(
      resp.headers().get(header::CONTENT_TYPE).unwrap(),
      "application/json",
      "{uri}"
    );
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(
      body["error"].as_str().unwrap().contains("invalid service number"),
      "{uri}"
    );
  }
}

#[tokio::test]
async fn me_returns_own_dossier() {
  let (status, body) = get(app(seeded().await, member("123")), "/me").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["bio"]["service_number"], "123");
}

#[tokio::test]
async fn me_without_record_is_not_found() {
  let (status, _) = get(app(seeded().await, admin()), "/me").await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

// ─── Profile and history ──────────────────────────────────────────────────────

#[tokio::test]
async fn profile_and_history() {
  let store = seeded().await;

  let (status, body) = get(app(store.clone(), member("123")), "/personnel/123").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["last_name"], "Mwamba");

  let (status, body) = get(app(store.clone(), member("123")), "/personnel/123/medals").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body[0]["medal_name"], "Long Service");

  let (status, body) = get(app(store, member("123")), "/personnel/123/courses").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body, serde_json::json!([]));
}

#[tokio::test]
async fn history_of_unknown_person_is_not_found() {
  let (status, _) = get(app(seeded().await, admin()), "/personnel/999/operations").await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

// ─── Search and ranks ─────────────────────────────────────────────────────────

#[tokio::test]
async fn search_requires_admin() {
  let (status, _) = get(app(seeded().await, member("123")), "/personnel").await;
  assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn search_filters_by_category() {
  let (status, body) = get(app(seeded().await, admin()), "/personnel?category=nco").await;
  assert_eq!(status, StatusCode::OK);
  let rows = body.as_array().unwrap();
  assert_eq!(rows.len(), 1);
  assert_eq!(rows[0]["heading"], "Sgt Banda G (456)");
}

#[tokio::test]
async fn search_text_is_not_a_wildcard() {
  let store = seeded().await;

  let (status, body) = get(app(store.clone(), admin()), "/personnel?q=_").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body, serde_json::json!([]));

  let (_, body) = get(app(store, admin()), "/personnel?q=%25").await;
  assert_eq!(body, serde_json::json!([]));
}

#[tokio::test]
async fn rank_lookup_and_fallback() {
  let store = seeded().await;

  let (status, body) = get(app(store.clone(), member("123")), "/ranks/major").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["abbreviation"], "Maj");

  let (_, body) = get(app(store, member("123")), "/ranks/Air%20Marshal").await;
  assert_eq!(body["abbreviation"], "Air Marshal");
}

// ─── Storage failure ──────────────────────────────────────────────────────────

#[tokio::test]
async fn closed_store_is_unavailable_not_empty() {
  let store = seeded().await;
  let handle = SqliteStore::clone(&store);
  handle.close().await.unwrap();

  let (status, body) = get(app(store.clone(), admin()), "/personnel/123/dossier").await;
  assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
  assert_eq!(body["error"], "storage unavailable");

  let (status, _) = get(app(store, admin()), "/personnel/123/courses").await;
  assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}
