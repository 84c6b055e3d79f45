//! Decoding helpers between SQLite rows and the typed records of
//! [`armis_core::record`].
//!
//! Rows are first read into `Raw*` structs of plain strings inside the
//! connection closure, then validated here on the async side. Blank strings
//! decode as `None`; unreadable dates decode as `None` with a warning.

use armis_core::{
  age::parse_date,
  name::{HeadingParts, InitialsStyle, heading},
  record::{
    Category, Contact, CourseAttendance, MedalAward, OperationParticipation,
    PersonRecord, ServiceNumber,
  },
  store::PersonSummary,
};
use chrono::NaiveDate;

use crate::Result;

// ─── Scalars ─────────────────────────────────────────────────────────────────

/// Read a stored date leniently. `column` only labels the warning.
pub fn decode_date(column: &str, raw: Option<String>) -> Option<NaiveDate> {
  let raw = non_blank(raw)?;
  let parsed = parse_date(&raw);
  if parsed.is_none() {
    tracing::warn!(column, value = %raw, "unreadable stored date treated as absent");
  }
  parsed
}

/// Trim and drop blank strings.
pub fn non_blank(raw: Option<String>) -> Option<String> {
  raw
    .map(|s| s.trim().to_owned())
    .filter(|s| !s.is_empty())
}

/// `%text%` for a `LIKE … ESCAPE '\\'` match, with the wildcards `%` and `_`
/// (and the escape character itself) in `text` matched literally.
pub fn like_pattern(text: &str) -> String {
  let mut pattern = String::with_capacity(text.len() + 2);
  pattern.push('%');
  for c in text.chars() {
    if matches!(c, '%' | '_' | '\\') {
      pattern.push('\\');
    }
    pattern.push(c);
  }
  pattern.push('%');
  pattern
}

// ─── Person ──────────────────────────────────────────────────────────────────

pub const PERSON_COLUMNS: &str = "service_number, first_name, last_name, gender,
  date_of_birth, rank_name, category, unit, province, email, phone, address,
  enlistment_date, intake";

/// Raw strings read directly from a `personnel` row, in [`PERSON_COLUMNS`]
/// order.
pub struct RawPerson {
  pub service_number:  String,
  pub first_name:      String,
  pub last_name:       String,
  pub gender:          Option<String>,
  pub date_of_birth:   Option<String>,
  pub rank_name:       String,
  pub category:        String,
  pub unit:            Option<String>,
  pub province:        Option<String>,
  pub email:           Option<String>,
  pub phone:           Option<String>,
  pub address:         Option<String>,
  pub enlistment_date: Option<String>,
  pub intake:          Option<String>,
}

impl RawPerson {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      service_number:  row.get(0)?,
      first_name:      row.get(1)?,
      last_name:       row.get(2)?,
      gender:          row.get(3)?,
      date_of_birth:   row.get(4)?,
      rank_name:       row.get(5)?,
      category:        row.get(6)?,
      unit:            row.get(7)?,
      province:        row.get(8)?,
      email:           row.get(9)?,
      phone:           row.get(10)?,
      address:         row.get(11)?,
      enlistment_date: row.get(12)?,
      intake:          row.get(13)?,
    })
  }

  pub fn into_record(self) -> Result<PersonRecord> {
    Ok(PersonRecord {
      service_number:  ServiceNumber::parse(&self.service_number)?,
      first_name:      self.first_name.trim().to_owned(),
      last_name:       self.last_name.trim().to_owned(),
      gender:          non_blank(self.gender),
      date_of_birth:   decode_date("date_of_birth", self.date_of_birth),
      rank:            self.rank_name.trim().to_owned(),
      category:        Category::parse(&self.category),
      unit:            non_blank(self.unit),
      province:        non_blank(self.province),
      contact:         Contact {
        email:   non_blank(self.email),
        phone:   non_blank(self.phone),
        address: non_blank(self.address),
      },
      enlistment_date: decode_date("enlistment_date", self.enlistment_date),
      intake:          non_blank(self.intake),
    })
  }
}

/// A `personnel` row joined with its rank abbreviation, for listings.
pub struct RawSummary {
  pub service_number: String,
  pub first_name:     String,
  pub last_name:      String,
  pub rank_name:      String,
  pub abbreviation:   Option<String>,
  pub category:       String,
  pub unit:           Option<String>,
}

impl RawSummary {
  pub fn into_summary(self) -> Result<PersonSummary> {
    let service_number = ServiceNumber::parse(&self.service_number)?;
    let category = Category::parse(&self.category);
    let rank = self.rank_name.trim().to_owned();
    let abbreviation = non_blank(self.abbreviation).unwrap_or_else(|| rank.clone());

    let heading = heading(
      &HeadingParts {
        rank_abbrev:    &abbreviation,
        given:          &self.first_name,
        family:         &self.last_name,
        service_number: service_number.as_str(),
        category:       &category,
      },
      InitialsStyle::Spaced,
    );

    Ok(PersonSummary {
      service_number,
      heading,
      rank,
      category,
      unit: non_blank(self.unit),
    })
  }
}

// ─── History rows ────────────────────────────────────────────────────────────

pub struct RawCourse {
  pub course_id:        String,
  pub course_name:      Option<String>,
  pub institution_id:   String,
  pub institution_name: Option<String>,
  pub location:         Option<String>,
  pub start_date:       Option<String>,
  pub end_date:         Option<String>,
  pub result:           Option<String>,
}

impl RawCourse {
  pub fn into_attendance(self) -> CourseAttendance {
    CourseAttendance {
      course_id:        self.course_id,
      course_name:      non_blank(self.course_name),
      institution_id:   self.institution_id,
      institution_name: non_blank(self.institution_name),
      location:         non_blank(self.location),
      start_date:       decode_date("course_attendance.start_date", self.start_date),
      end_date:         decode_date("course_attendance.end_date", self.end_date),
      result:           non_blank(self.result),
    }
  }
}

pub struct RawOperation {
  pub operation_id:   String,
  pub operation_name: Option<String>,
  pub operation_type: Option<String>,
  pub location:       Option<String>,
  pub start_date:     Option<String>,
  pub end_date:       Option<String>,
}

impl RawOperation {
  pub fn into_participation(self) -> OperationParticipation {
    OperationParticipation {
      operation_id:   self.operation_id,
      operation_name: non_blank(self.operation_name),
      operation_type: non_blank(self.operation_type),
      location:       non_blank(self.location),
      start_date:     decode_date("operation_participation.start_date", self.start_date),
      end_date:       decode_date("operation_participation.end_date", self.end_date),
    }
  }
}

pub struct RawMedal {
  pub medal_id:    String,
  pub medal_name:  Option<String>,
  pub description: Option<String>,
  pub issue_date:  Option<String>,
  pub authority:   Option<String>,
  pub comment:     Option<String>,
}

impl RawMedal {
  pub fn into_award(self) -> MedalAward {
    MedalAward {
      medal_id:    self.medal_id,
      medal_name:  non_blank(self.medal_name),
      description: non_blank(self.description),
      issue_date:  decode_date("medal_awards.issue_date", self.issue_date),
      authority:   non_blank(self.authority),
      comment:     non_blank(self.comment),
    }
  }
}
