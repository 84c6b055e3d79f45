//! SQL schema for the ARMIS SQLite store.
//!
//! Executed once at connection startup. Dates are stored as text; rows that
//! predate validation may hold forms the loader cannot read, which decode as
//! absent rather than failing the whole query.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS ranks (
    rank_name    TEXT PRIMARY KEY,
    abbreviation TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS personnel (
    service_number  TEXT PRIMARY KEY,
    first_name      TEXT NOT NULL DEFAULT '',
    last_name       TEXT NOT NULL DEFAULT '',
    gender          TEXT,
    date_of_birth   TEXT,
    rank_name       TEXT NOT NULL DEFAULT '',
    category        TEXT NOT NULL DEFAULT '',   -- 'officer' | 'officer cadet' | 'nco' | 'civilian' | ...
    unit            TEXT,
    province        TEXT,
    email           TEXT,
    phone           TEXT,
    address         TEXT,
    enlistment_date TEXT,
    intake          TEXT
);

-- Catalogue tables. History rows reference them loosely (LEFT JOIN) so a
-- missing catalogue entry never hides a history row.
CREATE TABLE IF NOT EXISTS courses (
    course_id TEXT PRIMARY KEY,
    name      TEXT
);

CREATE TABLE IF NOT EXISTS institutions (
    institution_id TEXT PRIMARY KEY,
    name           TEXT,
    location       TEXT
);

CREATE TABLE IF NOT EXISTS operations (
    operation_id   TEXT PRIMARY KEY,
    name           TEXT,
    operation_type TEXT,
    location       TEXT
);

CREATE TABLE IF NOT EXISTS medals (
    medal_id    TEXT PRIMARY KEY,
    name        TEXT,
    description TEXT
);

-- History tables. The integer key records insertion order, which breaks
-- ties between rows with equal dates.
CREATE TABLE IF NOT EXISTS course_attendance (
    attendance_id  INTEGER PRIMARY KEY AUTOINCREMENT,
    service_number TEXT NOT NULL REFERENCES personnel(service_number),
    course_id      TEXT NOT NULL,
    institution_id TEXT NOT NULL DEFAULT '',
    start_date     TEXT,
    end_date       TEXT,
    result         TEXT
);

CREATE TABLE IF NOT EXISTS operation_participation (
    participation_id INTEGER PRIMARY KEY AUTOINCREMENT,
    service_number   TEXT NOT NULL REFERENCES personnel(service_number),
    operation_id     TEXT NOT NULL,
    start_date       TEXT,
    end_date         TEXT
);

CREATE TABLE IF NOT EXISTS medal_awards (
    award_id       INTEGER PRIMARY KEY AUTOINCREMENT,
    service_number TEXT NOT NULL REFERENCES personnel(service_number),
    medal_id       TEXT NOT NULL,
    description    TEXT,             -- overrides medals.description when set
    issue_date     TEXT,
    authority      TEXT,
    comment        TEXT
);

CREATE INDEX IF NOT EXISTS course_attendance_svc_idx       ON course_attendance(service_number);
CREATE INDEX IF NOT EXISTS operation_participation_svc_idx ON operation_participation(service_number);
CREATE INDEX IF NOT EXISTS medal_awards_svc_idx            ON medal_awards(service_number);
CREATE INDEX IF NOT EXISTS personnel_name_idx              ON personnel(last_name, service_number);

PRAGMA user_version = 1;
";
