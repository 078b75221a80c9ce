//! Auth database operations (users and sessions tables).

use chrono::{Duration, Utc};
use rusqlite::{params, Connection, OptionalExtension, Result};

/// Create a new user, returns the user ID
pub fn create_user(conn: &Connection, username: &str, password_hash: &str) -> Result<i64> {
    let now = Utc::now().to_rfc3339();
    conn.execute(
        "INSERT INTO users (username, password_hash, is_admin, created_at) VALUES (?1, ?2, 0, ?3)",
        params![username, password_hash, now],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Get user by username, returns (user_id, password_hash)
pub fn get_user_by_username(conn: &Connection, username: &str) -> Result<Option<(i64, String)>> {
    conn.query_row(
        "SELECT id, password_hash FROM users WHERE username = ?1",
        params![username],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )
    .optional()
}

/// Check if a username already exists
pub fn username_exists(conn: &Connection, username: &str) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM users WHERE username = ?1",
        params![username],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Check if a user is an admin (by flag or legacy username='admin')
pub fn is_user_admin(conn: &Connection, user_id: i64) -> Result<bool> {
    let is_admin: i64 = conn.query_row(
        r#"SELECT CASE
            WHEN is_admin = 1 THEN 1
            WHEN LOWER(username) = 'admin' THEN 1
            ELSE 0
        END FROM users WHERE id = ?1"#,
        params![user_id],
        |row| row.get(0),
    )?;
    Ok(is_admin == 1)
}

/// Create a new session
pub fn create_session(
    conn: &Connection,
    user_id: i64,
    session_id: &str,
    duration_hours: i64,
) -> Result<()> {
    let now = Utc::now();
    let expires = now + Duration::hours(duration_hours);
    conn.execute(
        "INSERT INTO sessions (id, user_id, created_at, expires_at) VALUES (?1, ?2, ?3, ?4)",
        params![
            session_id,
            user_id,
            now.to_rfc3339(),
            expires.to_rfc3339()
        ],
    )?;
    Ok(())
}

/// Validate session and get user info, returns (user_id, username)
pub fn get_session_user(conn: &Connection, session_id: &str) -> Result<Option<(i64, String)>> {
    let now = Utc::now().to_rfc3339();
    conn.query_row(
        r#"
        SELECT u.id, u.username
        FROM sessions s
        JOIN users u ON s.user_id = u.id
        WHERE s.id = ?1 AND s.expires_at > ?2
        "#,
        params![session_id, now],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )
    .optional()
}

/// Delete a session (logout)
pub fn delete_session(conn: &Connection, session_id: &str) -> Result<()> {
    conn.execute("DELETE FROM sessions WHERE id = ?1", params![session_id])?;
    Ok(())
}

/// Cleanup expired sessions, returns count of deleted sessions
pub fn cleanup_expired_sessions(conn: &Connection) -> Result<usize> {
    let now = Utc::now().to_rfc3339();
    let count = conn.execute("DELETE FROM sessions WHERE expires_at < ?1", params![now])?;
    Ok(count)
}

/// Update user's last login timestamp
pub fn update_last_login(conn: &Connection, user_id: i64) -> Result<()> {
    let now = Utc::now().to_rfc3339();
    conn.execute(
        "UPDATE users SET last_login_at = ?1 WHERE id = ?2",
        params![now, user_id],
    )?;
    Ok(())
}

/// Generate a random 32-character alphanumeric session ID
pub fn generate_session_id() -> String {
    use rand::Rng;
    let mut rng = rand::rng();
    (0..32)
        .map(|_| {
            let idx = rng.random_range(0..36);
            if idx < 10 {
                (b'0' + idx) as char
            } else {
                (b'a' + idx - 10) as char
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestEnv;

    #[test]
    fn test_session_lifecycle() {
        let env = TestEnv::new().unwrap();
        let conn = env.conn();
        let user_id = create_user(&conn, "alice", "hash").unwrap();

        let session_id = generate_session_id();
        create_session(&conn, user_id, &session_id, 24).unwrap();

        let found = get_session_user(&conn, &session_id).unwrap();
        assert_eq!(found, Some((user_id, "alice".to_string())));

        delete_session(&conn, &session_id).unwrap();
        assert!(get_session_user(&conn, &session_id).unwrap().is_none());
    }

    #[test]
    fn test_expired_session_is_invalid() {
        let env = TestEnv::new().unwrap();
        let conn = env.conn();
        let user_id = create_user(&conn, "alice", "hash").unwrap();

        let session_id = generate_session_id();
        // Negative duration produces an already-expired session
        create_session(&conn, user_id, &session_id, -1).unwrap();

        assert!(get_session_user(&conn, &session_id).unwrap().is_none());
        assert_eq!(cleanup_expired_sessions(&conn).unwrap(), 1);
    }

    #[test]
    fn test_username_is_case_insensitive_unique() {
        let env = TestEnv::new().unwrap();
        let conn = env.conn();
        create_user(&conn, "Alice", "hash").unwrap();

        assert!(username_exists(&conn, "alice").unwrap());
        assert!(create_user(&conn, "ALICE", "hash").is_err());
    }

    #[test]
    fn test_admin_flag_and_legacy_admin_name() {
        let env = TestEnv::new().unwrap();
        let conn = env.conn();

        let alice = create_user(&conn, "alice", "hash").unwrap();
        assert!(!is_user_admin(&conn, alice).unwrap());

        let flagged = env.create_user(&conn, "boss", true);
        assert!(is_user_admin(&conn, flagged).unwrap());

        let named = create_user(&conn, "Admin", "hash").unwrap();
        assert!(is_user_admin(&conn, named).unwrap());
    }

    #[test]
    fn test_session_ids_are_distinct() {
        let a = generate_session_id();
        let b = generate_session_id();
        assert_eq!(a.len(), 32);
        assert_ne!(a, b);
    }
}
