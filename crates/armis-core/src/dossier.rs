//! Dossier assembly: loader output plus formatters, grouped into sections.
//!
//! [`assemble`] is pure and never touches storage. [`load_dossier`] is the
//! request-level entry point: it checks access, runs the loader queries
//! concurrently, joins them and then assembles. It either returns a complete
//! [`Dossier`] or a specific [`Error`]; there is no partial result.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator};

use crate::{
  Error, Result,
  age::Age,
  context::RequestContext,
  name::{HeadingParts, InitialsStyle, heading, initials},
  record::{
    Category, Contact, CourseAttendance, MedalAward, OperationParticipation,
    PersonRecord, RankInfo, ServiceNumber,
  },
  store::PersonnelStore,
};

// ─── Sections ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bio {
  pub service_number:  ServiceNumber,
  pub first_name:      String,
  pub last_name:       String,
  /// Space-joined, e.g. `J P`.
  pub initials:        String,
  /// Period-joined, e.g. `J.P.`.
  pub initials_dotted: String,
  pub gender:          Option<String>,
  pub date_of_birth:   Option<NaiveDate>,
  pub age:             Age,
  pub province:        Option<String>,
  pub contact:         Contact,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
  pub rank:             String,
  pub rank_abbrev:      String,
  pub category:         Category,
  pub unit:             Option<String>,
  pub enlistment_date:  Option<NaiveDate>,
  pub intake:           Option<String>,
  /// Whole years since enlistment, by the same rules as [`Age`].
  pub years_of_service: Age,
}

/// The named sections of a dossier, in display order.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
  Bio,
  Service,
  Operations,
  Courses,
  Medals,
}

/// Whether a section has anything to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
  pub kind:    SectionKind,
  pub present: bool,
}

// ─── Dossier ─────────────────────────────────────────────────────────────────

/// The display-ready aggregate of a person's records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dossier {
  /// Escaped heading with space-joined initials, e.g. `Maj J P Mwamba (123)`.
  pub heading:    String,
  pub age:        Age,
  pub bio:        Bio,
  pub service:    Service,
  pub operations: Vec<OperationParticipation>,
  pub courses:    Vec<CourseAttendance>,
  pub medals:     Vec<MedalAward>,
}

impl Dossier {
  /// Every section in display order, each flagged with whether it has
  /// content. Bio and service are always present.
  pub fn sections(&self) -> Vec<Section> {
    SectionKind::iter()
      .map(|kind| Section { kind, present: self.has(kind) })
      .collect()
  }

  pub fn has(&self, kind: SectionKind) -> bool {
    match kind {
      SectionKind::Bio | SectionKind::Service => true,
      SectionKind::Operations => !self.operations.is_empty(),
      SectionKind::Courses => !self.courses.is_empty(),
      SectionKind::Medals => !self.medals.is_empty(),
    }
  }
}

/// Compose loader output into a [`Dossier`]. Pure; ages are computed against
/// `today`.
pub fn assemble(
  profile: PersonRecord,
  courses: Vec<CourseAttendance>,
  operations: Vec<OperationParticipation>,
  medals: Vec<MedalAward>,
  rank: RankInfo,
  today: NaiveDate,
) -> Dossier {
  let heading = heading(
    &HeadingParts {
      rank_abbrev:    &rank.abbreviation,
      given:          &profile.first_name,
      family:         &profile.last_name,
      service_number: profile.service_number.as_str(),
      category:       &profile.category,
    },
    InitialsStyle::Spaced,
  );
  let age = Age::on(profile.date_of_birth, today);

  let bio = Bio {
    initials: initials(&profile.first_name, InitialsStyle::Spaced),
    initials_dotted: initials(&profile.first_name, InitialsStyle::Dotted),
    service_number: profile.service_number,
    first_name: profile.first_name,
    last_name: profile.last_name,
    gender: profile.gender,
    date_of_birth: profile.date_of_birth,
    age,
    province: profile.province,
    contact: profile.contact,
  };

  let service = Service {
    rank:             profile.rank,
    rank_abbrev:      rank.abbreviation,
    category:         profile.category,
    unit:             profile.unit,
    enlistment_date:  profile.enlistment_date,
    intake:           profile.intake,
    years_of_service: Age::on(profile.enlistment_date, today),
  };

  Dossier { heading, age, bio, service, operations, courses, medals }
}

/// Load and assemble the dossier named by `ctx.target`.
///
/// The profile and the three history queries run concurrently and are joined
/// before the rank lookup and assembly.
pub async fn load_dossier<S>(store: &S, ctx: &RequestContext) -> Result<Dossier>
where
  S: PersonnelStore,
{
  if !ctx.may_view {
    return Err(Error::Forbidden(ctx.target.clone()));
  }

  let svc = &ctx.target;
  tracing::debug!(service_number = %svc, "loading dossier");

  let (profile, courses, operations, medals) = tokio::try_join!(
    store.load_profile(svc),
    store.load_courses(svc),
    store.load_operations(svc),
    store.load_medals(svc),
  )
  .map_err(Error::storage)?;

  let profile = profile.ok_or_else(|| Error::NotFound(svc.clone()))?;
  let rank = store
    .resolve_rank(&profile.rank)
    .await
    .map_err(Error::storage)?;

  Ok(assemble(profile, courses, operations, medals, rank, ctx.today))
}
