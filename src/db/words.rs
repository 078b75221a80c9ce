//! Word group and word storage.

use rusqlite::{params, Connection, OptionalExtension, Result};

use crate::domain::{Word, WordGroup};

/// Look up a group by name, creating it if absent. Returns the group id.
pub fn get_or_create_group(conn: &Connection, name: &str) -> Result<i64> {
  conn.execute(
    "INSERT OR IGNORE INTO word_groups (name) VALUES (?1)",
    params![name],
  )?;
  conn.query_row(
    "SELECT id FROM word_groups WHERE name = ?1",
    params![name],
    |row| row.get(0),
  )
}

pub fn get_group(conn: &Connection, group_id: i64) -> Result<Option<WordGroup>> {
  conn
    .query_row(
      "SELECT id, name FROM word_groups WHERE id = ?1",
      params![group_id],
      |row| {
        Ok(WordGroup {
          id: row.get(0)?,
          name: row.get(1)?,
        })
      },
    )
    .optional()
}

pub fn list_groups(conn: &Connection) -> Result<Vec<WordGroup>> {
  let mut stmt = conn.prepare("SELECT id, name FROM word_groups ORDER BY name")?;
  let groups = stmt
    .query_map([], |row| {
      Ok(WordGroup {
        id: row.get(0)?,
        name: row.get(1)?,
      })
    })?
    .collect::<Result<Vec<_>>>()?;
  Ok(groups)
}

/// Delete a group, its words and any progress pools built on it.
///
/// Study records survive: the history ledger is append-only.
pub fn delete_group(conn: &Connection, group_id: i64) -> Result<()> {
  let tx = conn.unchecked_transaction()?;
  tx.execute(
    "DELETE FROM progress_words WHERE progress_id IN
       (SELECT id FROM study_progress WHERE group_id = ?1)",
    params![group_id],
  )?;
  tx.execute(
    "DELETE FROM study_progress WHERE group_id = ?1",
    params![group_id],
  )?;
  tx.execute("DELETE FROM words WHERE group_id = ?1", params![group_id])?;
  tx.execute("DELETE FROM word_groups WHERE id = ?1", params![group_id])?;
  tx.commit()
}

pub fn insert_word(conn: &Connection, text: &str, meaning: &str, group_id: i64) -> Result<i64> {
  conn.execute(
    "INSERT INTO words (word, meaning, group_id) VALUES (?1, ?2, ?3)",
    params![text, meaning, group_id],
  )?;
  Ok(conn.last_insert_rowid())
}

pub fn get_word(conn: &Connection, word_id: i64) -> Result<Option<Word>> {
  conn
    .query_row(
      "SELECT id, word, meaning, group_id FROM words WHERE id = ?1",
      params![word_id],
      row_to_word,
    )
    .optional()
}

pub fn words_in_group(conn: &Connection, group_id: i64) -> Result<Vec<Word>> {
  let mut stmt =
    conn.prepare("SELECT id, word, meaning, group_id FROM words WHERE group_id = ?1 ORDER BY id")?;
  let words = stmt
    .query_map(params![group_id], row_to_word)?
    .collect::<Result<Vec<_>>>()?;
  Ok(words)
}

pub fn count_words(conn: &Connection) -> Result<i64> {
  conn.query_row("SELECT COUNT(*) FROM words", [], |row| row.get(0))
}

fn row_to_word(row: &rusqlite::Row) -> Result<Word> {
  Ok(Word {
    id: row.get(0)?,
    text: row.get(1)?,
    meaning: row.get(2)?,
    group_id: row.get(3)?,
  })
}
