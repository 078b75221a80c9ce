//! Study record ledger access.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Result};

use crate::domain::StudyRecord;

/// A record joined with its word for the history view
#[derive(Debug, Clone)]
pub struct StudyRecordView {
  pub word: String,
  pub meaning: String,
  pub recorded_at: String,
}

/// Append a record with the server clock
pub fn insert_study_record(conn: &Connection, user_id: i64, word_id: i64) -> Result<i64> {
  insert_study_record_at(conn, user_id, word_id, Utc::now())
}

/// Append a record with an explicit timestamp (tests and backfills)
pub fn insert_study_record_at(
  conn: &Connection,
  user_id: i64,
  word_id: i64,
  at: DateTime<Utc>,
) -> Result<i64> {
  conn.execute(
    "INSERT INTO study_records (user_id, word_id, recorded_at) VALUES (?1, ?2, ?3)",
    params![user_id, word_id, at.to_rfc3339()],
  )?;
  Ok(conn.last_insert_rowid())
}

/// All records for a user, most-recent-first.
///
/// This is the ordering the achievement evaluator's streak scan
/// depends on.
pub fn study_records_for_user(conn: &Connection, user_id: i64) -> Result<Vec<StudyRecord>> {
  let mut stmt = conn.prepare(
    r#"
    SELECT id, user_id, word_id, recorded_at
    FROM study_records
    WHERE user_id = ?1
    ORDER BY recorded_at DESC, id DESC
    "#,
  )?;

  let records = stmt
    .query_map(params![user_id], |row| {
      let recorded_at_str: String = row.get(3)?;
      Ok(StudyRecord {
        id: row.get(0)?,
        user_id: row.get(1)?,
        word_id: row.get(2)?,
        recorded_at: DateTime::parse_from_rfc3339(&recorded_at_str)
          .map(|dt| dt.with_timezone(&Utc))
          .unwrap_or_else(|_| Utc::now()),
      })
    })?
    .collect::<Result<Vec<_>>>()?;

  Ok(records)
}

/// Records joined with word text, most-recent-first, for display
pub fn study_records_with_words(conn: &Connection, user_id: i64) -> Result<Vec<StudyRecordView>> {
  let mut stmt = conn.prepare(
    r#"
    SELECT w.word, w.meaning, r.recorded_at
    FROM study_records r
    JOIN words w ON r.word_id = w.id
    WHERE r.user_id = ?1
    ORDER BY r.recorded_at DESC, r.id DESC
    "#,
  )?;

  let records = stmt
    .query_map(params![user_id], |row| {
      Ok(StudyRecordView {
        word: row.get(0)?,
        meaning: row.get(1)?,
        recorded_at: row.get(2)?,
      })
    })?
    .collect::<Result<Vec<_>>>()?;

  Ok(records)
}

pub fn count_records_for_user(conn: &Connection, user_id: i64) -> Result<i64> {
  conn.query_row(
    "SELECT COUNT(*) FROM study_records WHERE user_id = ?1",
    params![user_id],
    |row| row.get(0),
  )
}
