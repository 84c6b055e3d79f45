//! [`SqliteStore`]: the SQLite implementation of [`PersonnelStore`].

use std::path::Path;

use armis_core::{
  record::{
    CourseAttendance, MedalAward, OperationParticipation, PersonRecord, RankInfo,
    ServiceNumber, sort_newest_first,
  },
  store::{PersonSummary, PersonnelQuery, PersonnelStore},
};
use rusqlite::OptionalExtension as _;

use crate::{
  Result,
  encode::{
    PERSON_COLUMNS, RawCourse, RawMedal, RawOperation, RawPerson, RawSummary,
    like_pattern, non_blank,
  },
  schema::SCHEMA,
  seed::Fixture,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A personnel store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Close the underlying connection. Every clone of this store fails with a
  /// database error afterwards.
  pub async fn close(self) -> Result<()> {
    self.conn.close().await?;
    Ok(())
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Insert every row of `fixture` in a single transaction.
  ///
  /// Catalogue rows (ranks, courses, institutions, operations, medals) replace
  /// existing rows with the same key. People and history rows are plain
  /// inserts, so importing the same person twice fails and rolls back.
  pub async fn import(&self, fixture: Fixture) -> Result<()> {
    let people = fixture.people.len();
    let history =
      fixture.attendance.len() + fixture.deployments.len() + fixture.awards.len();

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        for r in &fixture.ranks {
          tx.execute(
            "INSERT OR REPLACE INTO ranks (rank_name, abbreviation) VALUES (?1, ?2)",
            rusqlite::params![r.name, r.abbreviation],
          )?;
        }
        for c in &fixture.courses {
          tx.execute(
            "INSERT OR REPLACE INTO courses (course_id, name) VALUES (?1, ?2)",
            rusqlite::params![c.course_id, c.name],
          )?;
        }
        for i in &fixture.institutions {
          tx.execute(
            "INSERT OR REPLACE INTO institutions (institution_id, name, location)
             VALUES (?1, ?2, ?3)",
            rusqlite::params![i.institution_id, i.name, i.location],
          )?;
        }
        for o in &fixture.operations {
          tx.execute(
            "INSERT OR REPLACE INTO operations (operation_id, name, operation_type, location)
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![o.operation_id, o.name, o.operation_type, o.location],
          )?;
        }
        for m in &fixture.medals {
          tx.execute(
            "INSERT OR REPLACE INTO medals (medal_id, name, description) VALUES (?1, ?2, ?3)",
            rusqlite::params![m.medal_id, m.name, m.description],
          )?;
        }

        for p in &fixture.people {
          tx.execute(
            &format!(
              "INSERT INTO personnel ({PERSON_COLUMNS})
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)"
            ),
            rusqlite::params![
              p.service_number.trim(),
              p.first_name,
              p.last_name,
              p.gender,
              p.date_of_birth,
              p.rank,
              p.category,
              p.unit,
              p.province,
              p.email,
              p.phone,
              p.address,
              p.enlistment_date,
              p.intake,
            ],
          )?;
        }

        for a in &fixture.attendance {
          tx.execute(
            "INSERT INTO course_attendance
               (service_number, course_id, institution_id, start_date, end_date, result)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
              a.service_number.trim(),
              a.course_id,
              a.institution_id,
              a.start_date,
              a.end_date,
              a.result,
            ],
          )?;
        }
        for d in &fixture.deployments {
          tx.execute(
            "INSERT INTO operation_participation
               (service_number, operation_id, start_date, end_date)
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![
              d.service_number.trim(),
              d.operation_id,
              d.start_date,
              d.end_date,
            ],
          )?;
        }
        for a in &fixture.awards {
          tx.execute(
            "INSERT INTO medal_awards
               (service_number, medal_id, description, issue_date, authority, comment)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
              a.service_number.trim(),
              a.medal_id,
              a.description,
              a.issue_date,
              a.authority,
              a.comment,
            ],
          )?;
        }

        tx.commit()?;
        Ok(())
      })
      .await?;

    tracing::info!(people, history, "imported fixture");
    Ok(())
  }
}

// ─── PersonnelStore impl ─────────────────────────────────────────────────────

impl PersonnelStore for SqliteStore {
  type Error = crate::Error;

  async fn load_profile(
    &self,
    service_number: &ServiceNumber,
  ) -> Result<Option<PersonRecord>> {
    let svc = service_number.as_str().to_owned();

    let raw: Option<RawPerson> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {PERSON_COLUMNS} FROM personnel WHERE service_number = ?1"
              ),
              rusqlite::params![svc],
              RawPerson::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    tracing::debug!(%service_number, found = raw.is_some(), "loaded profile");
    raw.map(RawPerson::into_record).transpose()
  }

  async fn load_courses(
    &self,
    service_number: &ServiceNumber,
  ) -> Result<Vec<CourseAttendance>> {
    let svc = service_number.as_str().to_owned();

    let raws: Vec<RawCourse> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT
             a.course_id, c.name, a.institution_id, i.name, i.location,
             a.start_date, a.end_date, a.result
           FROM course_attendance a
           LEFT JOIN courses      c ON c.course_id      = a.course_id
           LEFT JOIN institutions i ON i.institution_id = a.institution_id
           WHERE a.service_number = ?1
           ORDER BY a.attendance_id",
        )?;

        let rows = stmt
          .query_map(rusqlite::params![svc], |row| {
            Ok(RawCourse {
              course_id:        row.get(0)?,
              course_name:      row.get(1)?,
              institution_id:   row.get(2)?,
              institution_name: row.get(3)?,
              location:         row.get(4)?,
              start_date:       row.get(5)?,
              end_date:         row.get(6)?,
              result:           row.get(7)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
      })
      .await?;

    let mut courses: Vec<CourseAttendance> =
      raws.into_iter().map(RawCourse::into_attendance).collect();
    sort_newest_first(&mut courses);

    tracing::debug!(%service_number, count = courses.len(), "loaded courses");
    Ok(courses)
  }

  async fn load_operations(
    &self,
    service_number: &ServiceNumber,
  ) -> Result<Vec<OperationParticipation>> {
    let svc = service_number.as_str().to_owned();

    let raws: Vec<RawOperation> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT
             p.operation_id, o.name, o.operation_type, o.location,
             p.start_date, p.end_date
           FROM operation_participation p
           LEFT JOIN operations o ON o.operation_id = p.operation_id
           WHERE p.service_number = ?1
           ORDER BY p.participation_id",
        )?;

        let rows = stmt
          .query_map(rusqlite::params![svc], |row| {
            Ok(RawOperation {
              operation_id:   row.get(0)?,
              operation_name: row.get(1)?,
              operation_type: row.get(2)?,
              location:       row.get(3)?,
              start_date:     row.get(4)?,
              end_date:       row.get(5)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
      })
      .await?;

    let mut operations: Vec<OperationParticipation> =
      raws.into_iter().map(RawOperation::into_participation).collect();
    sort_newest_first(&mut operations);

    tracing::debug!(%service_number, count = operations.len(), "loaded operations");
    Ok(operations)
  }

  async fn load_medals(&self, service_number: &ServiceNumber) -> Result<Vec<MedalAward>> {
    let svc = service_number.as_str().to_owned();

    let raws: Vec<RawMedal> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT
             a.medal_id, m.name, COALESCE(a.description, m.description),
             a.issue_date, a.authority, a.comment
           FROM medal_awards a
           LEFT JOIN medals m ON m.medal_id = a.medal_id
           WHERE a.service_number = ?1
           ORDER BY a.award_id",
        )?;

        let rows = stmt
          .query_map(rusqlite::params![svc], |row| {
            Ok(RawMedal {
              medal_id:    row.get(0)?,
              medal_name:  row.get(1)?,
              description: row.get(2)?,
              issue_date:  row.get(3)?,
              authority:   row.get(4)?,
              comment:     row.get(5)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
      })
      .await?;

    let mut medals: Vec<MedalAward> = raws.into_iter().map(RawMedal::into_award).collect();
    sort_newest_first(&mut medals);

    tracing::debug!(%service_number, count = medals.len(), "loaded medals");
    Ok(medals)
  }

  async fn resolve_rank(&self, rank_name: &str) -> Result<RankInfo> {
    let name = rank_name.trim().to_owned();

    let abbreviation: Option<String> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT abbreviation FROM ranks WHERE rank_name = ?1 COLLATE NOCASE",
              rusqlite::params![name],
              |row| row.get(0),
            )
            .optional()?,
        )
      })
      .await?;

    Ok(match non_blank(abbreviation) {
      Some(abbreviation) => RankInfo { name: rank_name.to_owned(), abbreviation },
      None => RankInfo::fallback(rank_name),
    })
  }

  async fn search(&self, query: &PersonnelQuery) -> Result<Vec<PersonSummary>> {
    // Text and unit filter in SQL; category is matched after decoding so
    // every stored spelling of a category is found.
    let text_pattern = query
      .text
      .as_deref()
      .map(str::trim)
      .filter(|t| !t.is_empty())
      .map(like_pattern);
    let unit   = non_blank(query.unit.clone());
    let limit  = query.limit.unwrap_or(100);
    let offset = query.offset.unwrap_or(0);

    // Paging runs in SQL unless the category filter has to run first.
    let category = query.category.clone();
    let (sql_limit, sql_offset) = match category {
      None => (
        i64::try_from(limit).unwrap_or(i64::MAX),
        i64::try_from(offset).unwrap_or(i64::MAX),
      ),
      Some(_) => (-1, 0),
    };

    let raws: Vec<RawSummary> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT
             p.service_number, p.first_name, p.last_name,
             p.rank_name, r.abbreviation, p.category, p.unit
           FROM personnel p
           LEFT JOIN ranks r ON r.rank_name = p.rank_name COLLATE NOCASE
           WHERE (?1 IS NULL
                  OR p.service_number LIKE ?1 ESCAPE '\\'
                  OR p.first_name     LIKE ?1 ESCAPE '\\'
                  OR p.last_name      LIKE ?1 ESCAPE '\\')
             AND (?2 IS NULL OR p.unit = ?2)
           ORDER BY p.last_name COLLATE NOCASE, p.service_number
           LIMIT ?3 OFFSET ?4",
        )?;

        let rows = stmt
          .query_map(
            rusqlite::params![text_pattern, unit, sql_limit, sql_offset],
            |row| {
              Ok(RawSummary {
                service_number: row.get(0)?,
                first_name:     row.get(1)?,
                last_name:      row.get(2)?,
                rank_name:      row.get(3)?,
                abbreviation:   row.get(4)?,
                category:       row.get(5)?,
                unit:           row.get(6)?,
              })
            },
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
      })
      .await?;

    let mut summaries = Vec::new();
    for raw in raws {
      let summary = raw.into_summary()?;
      if category.as_ref().is_none_or(|c| c.matches(&summary.category)) {
        summaries.push(summary);
      }
    }

    Ok(match category {
      None => summaries,
      Some(_) => summaries.into_iter().skip(offset).take(limit).collect(),
    })
  }
}
