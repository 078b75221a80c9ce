//! Study history types.

use chrono::{DateTime, Utc};

/// Append-only event: this user correctly guessed this word at this time.
///
/// Records are never updated or deleted in normal operation; the
/// achievement evaluator scans this ledger.
#[derive(Debug, Clone)]
pub struct StudyRecord {
  pub id: i64,
  pub user_id: i64,
  pub word_id: i64,
  pub recorded_at: DateTime<Utc>,
}

/// An achievement a user has been granted, joined with its catalog entry
#[derive(Debug, Clone)]
pub struct EarnedAchievement {
  pub name: String,
  pub description: String,
  pub achieved_at: DateTime<Utc>,
}
