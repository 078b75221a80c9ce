//! Test utilities for database setup.
//!
//! Reuses the authoritative schema initialization so test code never
//! duplicates the schema.

use chrono::Utc;
use rusqlite::{params, Connection};
use std::sync::MutexGuard;
use tempfile::TempDir;

use crate::db::{self, DbPool};

/// Test environment backed by a real database file in a temporary
/// directory, cleaned up on drop.
pub struct TestEnv {
    /// Temporary directory (kept alive for database file persistence)
    pub temp: TempDir,
    /// Pool over the initialized database
    pub pool: DbPool,
}

impl TestEnv {
    /// Create a test environment with the full schema applied.
    pub fn new() -> rusqlite::Result<Self> {
        let temp =
            TempDir::new().map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
        let pool = db::init_db(&temp.path().join("test.db"))?;
        Ok(Self { temp, pool })
    }

    /// Lock the pool for direct statement access.
    pub fn conn(&self) -> MutexGuard<'_, Connection> {
        self.pool.lock().unwrap()
    }

    /// Insert a user row directly, skipping password hashing.
    pub fn create_user(&self, conn: &Connection, username: &str, is_admin: bool) -> i64 {
        conn.execute(
            "INSERT INTO users (username, password_hash, is_admin, created_at)
               VALUES (?1, 'x', ?2, ?3)",
            params![username, is_admin as i64, Utc::now().to_rfc3339()],
        )
        .unwrap();
        conn.last_insert_rowid()
    }

    /// Insert a group and its words, returning the group id.
    pub fn create_group(&self, conn: &Connection, name: &str, words: &[(&str, &str)]) -> i64 {
        conn.execute("INSERT INTO word_groups (name) VALUES (?1)", params![name])
            .unwrap();
        let group_id = conn.last_insert_rowid();
        for (word, meaning) in words {
            conn.execute(
                "INSERT INTO words (word, meaning, group_id) VALUES (?1, ?2, ?3)",
                params![word, meaning, group_id],
            )
            .unwrap();
        }
        group_id
    }
}
