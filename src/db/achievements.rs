//! Achievement catalog and grant storage.
//!
//! Grants are insert-if-absent against a singleton catalog row per
//! name, so re-evaluation never duplicates a grant and concurrent
//! evaluations race harmlessly into the uniqueness constraints.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Result};

use crate::domain::EarnedAchievement;

/// Grant an achievement to a user if not already granted.
///
/// Returns true when this call created the grant.
pub fn grant(conn: &Connection, user_id: i64, name: &str, description: &str) -> Result<bool> {
  let tx = conn.unchecked_transaction()?;

  tx.execute(
    "INSERT OR IGNORE INTO achievements (name, description) VALUES (?1, ?2)",
    params![name, description],
  )?;
  let achievement_id: i64 = tx.query_row(
    "SELECT id FROM achievements WHERE name = ?1",
    params![name],
    |row| row.get(0),
  )?;

  let inserted = tx.execute(
    "INSERT OR IGNORE INTO user_achievements (user_id, achievement_id, achieved_at)
       VALUES (?1, ?2, ?3)",
    params![user_id, achievement_id, Utc::now().to_rfc3339()],
  )?;

  tx.commit()?;
  Ok(inserted > 0)
}

pub fn has_achievement(conn: &Connection, user_id: i64, name: &str) -> Result<bool> {
  let count: i64 = conn.query_row(
    r#"
    SELECT COUNT(*)
    FROM user_achievements ua
    JOIN achievements a ON ua.achievement_id = a.id
    WHERE ua.user_id = ?1 AND a.name = ?2
    "#,
    params![user_id, name],
    |row| row.get(0),
  )?;
  Ok(count > 0)
}

/// All achievements earned by a user, newest grant first
pub fn achievements_for_user(conn: &Connection, user_id: i64) -> Result<Vec<EarnedAchievement>> {
  let mut stmt = conn.prepare(
    r#"
    SELECT a.name, a.description, ua.achieved_at
    FROM user_achievements ua
    JOIN achievements a ON ua.achievement_id = a.id
    WHERE ua.user_id = ?1
    ORDER BY ua.achieved_at DESC, ua.id DESC
    "#,
  )?;

  let earned = stmt
    .query_map(params![user_id], |row| {
      let achieved_at_str: String = row.get(2)?;
      Ok(EarnedAchievement {
        name: row.get(0)?,
        description: row.get(1)?,
        achieved_at: DateTime::parse_from_rfc3339(&achieved_at_str)
          .map(|dt| dt.with_timezone(&Utc))
          .unwrap_or_else(|_| Utc::now()),
      })
    })?
    .collect::<Result<Vec<_>>>()?;

  Ok(earned)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::testing::TestEnv;

  #[test]
  fn test_grant_is_idempotent() {
    let env = TestEnv::new().unwrap();
    let conn = env.conn();
    let user_id = env.create_user(&conn, "alice", false);

    assert!(grant(&conn, user_id, "Word Master", "Study 500 words").unwrap());
    assert!(!grant(&conn, user_id, "Word Master", "Study 500 words").unwrap());

    assert!(has_achievement(&conn, user_id, "Word Master").unwrap());
    assert_eq!(achievements_for_user(&conn, user_id).unwrap().len(), 1);

    // The catalog keeps a single row per name
    let catalog_rows: i64 = conn
      .query_row(
        "SELECT COUNT(*) FROM achievements WHERE name = 'Word Master'",
        [],
        |row| row.get(0),
      )
      .unwrap();
    assert_eq!(catalog_rows, 1);
  }

  #[test]
  fn test_grants_are_per_user() {
    let env = TestEnv::new().unwrap();
    let conn = env.conn();
    let alice = env.create_user(&conn, "alice", false);
    let bob = env.create_user(&conn, "bob", false);

    assert!(grant(&conn, alice, "A Journey Begins", "Study your first word").unwrap());
    assert!(grant(&conn, bob, "A Journey Begins", "Study your first word").unwrap());

    assert!(has_achievement(&conn, alice, "A Journey Begins").unwrap());
    assert!(has_achievement(&conn, bob, "A Journey Begins").unwrap());
  }
}
