//! JSON fixtures for populating a store.
//!
//! A [`Fixture`] mirrors the table layout: catalogue rows (ranks, courses,
//! institutions, operations, medals), people, and their history rows. Dates
//! stay as text so a fixture can reproduce legacy data exactly. Load one with
//! [`crate::SqliteStore::import`].

use serde::Deserialize;

use crate::Result;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Fixture {
  pub ranks:        Vec<RankRow>,
  pub courses:      Vec<CourseRow>,
  pub institutions: Vec<InstitutionRow>,
  pub operations:   Vec<OperationRow>,
  pub medals:       Vec<MedalRow>,
  pub people:       Vec<PersonRow>,
  pub attendance:   Vec<AttendanceRow>,
  pub deployments:  Vec<DeploymentRow>,
  pub awards:       Vec<AwardRow>,
}

impl Fixture {
  pub fn from_json(input: &str) -> Result<Self> { Ok(serde_json::from_str(input)?) }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RankRow {
  pub name:         String,
  pub abbreviation: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CourseRow {
  pub course_id: String,
  pub name:      Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InstitutionRow {
  pub institution_id: String,
  pub name:           Option<String>,
  pub location:       Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OperationRow {
  pub operation_id:   String,
  pub name:           Option<String>,
  pub operation_type: Option<String>,
  pub location:       Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MedalRow {
  pub medal_id:    String,
  pub name:        Option<String>,
  pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PersonRow {
  pub service_number:  String,
  pub first_name:      String,
  pub last_name:       String,
  pub gender:          Option<String>,
  pub date_of_birth:   Option<String>,
  pub rank:            String,
  pub category:        String,
  pub unit:            Option<String>,
  pub province:        Option<String>,
  pub email:           Option<String>,
  pub phone:           Option<String>,
  pub address:         Option<String>,
  pub enlistment_date: Option<String>,
  pub intake:          Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AttendanceRow {
  pub service_number: String,
  pub course_id:      String,
  #[serde(default)]
  pub institution_id: String,
  pub start_date:     Option<String>,
  pub end_date:       Option<String>,
  pub result:         Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeploymentRow {
  pub service_number: String,
  pub operation_id:   String,
  pub start_date:     Option<String>,
  pub end_date:       Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AwardRow {
  pub service_number: String,
  pub medal_id:       String,
  pub description:    Option<String>,
  pub issue_date:     Option<String>,
  pub authority:      Option<String>,
  pub comment:        Option<String>,
}
