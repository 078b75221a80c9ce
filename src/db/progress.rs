//! Per-(user, group) "words to learn" pool storage.
//!
//! Invariant: immediately after creation or reset the pool equals the
//! full current membership of the group. Removal and reset silently
//! ignore words that are no longer group members.

use rusqlite::{params, Connection, OptionalExtension, Result};

use crate::domain::Word;

/// Find the progress row for (user, group), if any
pub fn find(conn: &Connection, user_id: i64, group_id: i64) -> Result<Option<i64>> {
  conn
    .query_row(
      "SELECT id FROM study_progress WHERE user_id = ?1 AND group_id = ?2",
      params![user_id, group_id],
      |row| row.get(0),
    )
    .optional()
}

/// Get or create the progress row for (user, group).
///
/// On creation the pool is populated with every word currently in the
/// group. Runs in a single transaction; the UNIQUE(user_id, group_id)
/// constraint backstops concurrent creation.
pub fn get_or_create(conn: &Connection, user_id: i64, group_id: i64) -> Result<i64> {
  let tx = conn.unchecked_transaction()?;

  let created = tx.execute(
    "INSERT OR IGNORE INTO study_progress (user_id, group_id) VALUES (?1, ?2)",
    params![user_id, group_id],
  )?;
  let progress_id: i64 = tx.query_row(
    "SELECT id FROM study_progress WHERE user_id = ?1 AND group_id = ?2",
    params![user_id, group_id],
    |row| row.get(0),
  )?;

  if created > 0 {
    tx.execute(
      "INSERT INTO progress_words (progress_id, word_id)
         SELECT ?1, id FROM words WHERE group_id = ?2",
      params![progress_id, group_id],
    )?;
  }

  tx.commit()?;
  Ok(progress_id)
}

/// Words remaining in the pool
pub fn pool_words(conn: &Connection, progress_id: i64) -> Result<Vec<Word>> {
  let mut stmt = conn.prepare(
    r#"
    SELECT w.id, w.word, w.meaning, w.group_id
    FROM progress_words p
    JOIN words w ON p.word_id = w.id
    WHERE p.progress_id = ?1
    ORDER BY w.id
    "#,
  )?;

  let words = stmt
    .query_map(params![progress_id], |row| {
      Ok(Word {
        id: row.get(0)?,
        text: row.get(1)?,
        meaning: row.get(2)?,
        group_id: row.get(3)?,
      })
    })?
    .collect::<Result<Vec<_>>>()?;

  Ok(words)
}

/// Clear the pool and repopulate it with the group's current words
pub fn reset_pool(conn: &Connection, progress_id: i64, group_id: i64) -> Result<()> {
  let tx = conn.unchecked_transaction()?;
  tx.execute(
    "DELETE FROM progress_words WHERE progress_id = ?1",
    params![progress_id],
  )?;
  tx.execute(
    "INSERT INTO progress_words (progress_id, word_id)
       SELECT ?1, id FROM words WHERE group_id = ?2",
    params![progress_id, group_id],
  )?;
  tx.commit()
}

/// Pop a single word from the pool. No-op if the word is not a member.
pub fn remove_word(conn: &Connection, progress_id: i64, word_id: i64) -> Result<()> {
  conn.execute(
    "DELETE FROM progress_words WHERE progress_id = ?1 AND word_id = ?2",
    params![progress_id, word_id],
  )?;
  Ok(())
}
