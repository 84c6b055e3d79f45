//! The `PersonnelStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `armis-store-sqlite`).
//! Higher layers (`armis-api`, `armis-server`) depend on this abstraction, not
//! on any concrete backend.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::record::{
  Category, CourseAttendance, MedalAward, OperationParticipation, PersonRecord,
  RankInfo, ServiceNumber,
};

// ─── Query type ──────────────────────────────────────────────────────────────

/// Parameters for [`PersonnelStore::search`].
#[derive(Debug, Clone, Default)]
pub struct PersonnelQuery {
  /// Substring matched against service number, first name and last name.
  pub text:     Option<String>,
  pub category: Option<Category>,
  /// Exact unit name.
  pub unit:     Option<String>,
  pub limit:    Option<usize>,
  pub offset:   Option<usize>,
}

/// One row of a personnel listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonSummary {
  pub service_number: ServiceNumber,
  /// Escaped display heading, as built by [`crate::name::heading`].
  pub heading:        String,
  pub rank:           String,
  pub category:       Category,
  pub unit:           Option<String>,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Read-only access to personnel records.
///
/// Collection loads return an empty vector when a person has no history; that
/// is a valid state, not an error. Errors mean the store could not be asked.
/// Collections are ordered newest first with ties in insertion order.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait PersonnelStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// The core profile. Returns `None` if no record has this service number.
  fn load_profile<'a>(
    &'a self,
    service_number: &'a ServiceNumber,
  ) -> impl Future<Output = Result<Option<PersonRecord>, Self::Error>> + Send + 'a;

  /// Courses attended, newest start date first.
  fn load_courses<'a>(
    &'a self,
    service_number: &'a ServiceNumber,
  ) -> impl Future<Output = Result<Vec<CourseAttendance>, Self::Error>> + Send + 'a;

  /// Operations taken part in, newest start date first.
  fn load_operations<'a>(
    &'a self,
    service_number: &'a ServiceNumber,
  ) -> impl Future<Output = Result<Vec<OperationParticipation>, Self::Error>>
  + Send
  + 'a;

  /// Medals awarded, newest issue date first.
  fn load_medals<'a>(
    &'a self,
    service_number: &'a ServiceNumber,
  ) -> impl Future<Output = Result<Vec<MedalAward>, Self::Error>> + Send + 'a;

  /// Look up the abbreviation for `rank_name`, echoing the name back as its
  /// own abbreviation when the lookup has no row for it.
  fn resolve_rank<'a>(
    &'a self,
    rank_name: &'a str,
  ) -> impl Future<Output = Result<RankInfo, Self::Error>> + Send + 'a;

  /// List personnel matching `query`, ordered by last name then service
  /// number.
  fn search<'a>(
    &'a self,
    query: &'a PersonnelQuery,
  ) -> impl Future<Output = Result<Vec<PersonSummary>, Self::Error>> + Send + 'a;
}
