//! Achievement evaluator.
//!
//! Scans a user's study-record history (most-recent-first) and grants
//! every achievement the user newly qualifies for. The catalog is
//! fixed at compile time. Grants go through the idempotent
//! insert-if-absent in [`crate::db::achievements`], so once granted an
//! achievement is never revoked or duplicated by re-evaluation.
//!
//! Evaluation runs when the user opens their study-record history;
//! achievements may therefore lag behind the triggering guess until
//! that page is visited. That deferral is deliberate, and `evaluate`
//! is safe to call after any correct guess as well.

use chrono::{Duration, NaiveDate, Utc};
use rusqlite::{Connection, Result};

use crate::db;
use crate::domain::StudyRecord;

/// Cumulative volume tiers: (name, threshold, description)
pub const VOLUME_TIERS: [(&str, i64, &str); 5] = [
  ("A Journey Begins", 1, "Study your first word"),
  ("Step by Step", 10, "Study 10 words"),
  ("Little and Often", 100, "Study 100 words"),
  ("Word Master", 500, "Study 500 words"),
  ("Walking Library", 1000, "Study 1000 words"),
];

/// Streak tiers: (name, window in days, description)
pub const STREAK_TIERS: [(&str, i64, &str); 2] = [
  ("30-Day Streak", 30, "Study on 30 days in a row"),
  ("60-Day Streak", 60, "Study on 60 days in a row"),
];

/// Weekly burst: records within the trailing 7-day window
pub const WEEKLY_BURST_NAME: &str = "Weekly Scholar";
pub const WEEKLY_BURST_THRESHOLD: i64 = 50;
pub const WEEKLY_BURST_DESCRIPTION: &str = "Study 50 words within one week";

/// Evaluate all rules for a user and grant anything newly qualified.
///
/// Returns the names of achievements granted by this call.
pub fn evaluate(conn: &Connection, user_id: i64) -> Result<Vec<String>> {
  let records = db::records::study_records_for_user(conn, user_id)?;
  evaluate_at(conn, user_id, &records, Utc::now().date_naive())
}

/// Evaluation against an explicit "today", for deterministic tests
pub fn evaluate_at(
  conn: &Connection,
  user_id: i64,
  records: &[StudyRecord],
  today: NaiveDate,
) -> Result<Vec<String>> {
  let mut granted = Vec::new();

  let total = records.len() as i64;
  for (name, threshold, description) in VOLUME_TIERS {
    if total >= threshold && db::achievements::grant(conn, user_id, name, description)? {
      granted.push(name.to_string());
    }
  }

  for (name, window_days, description) in STREAK_TIERS {
    let run = distinct_day_run(records, today, window_days);
    if run >= window_days as usize
      && db::achievements::grant(conn, user_id, name, description)?
    {
      granted.push(name.to_string());
    }
  }

  if records_in_week(records, today) >= WEEKLY_BURST_THRESHOLD
    && db::achievements::grant(conn, user_id, WEEKLY_BURST_NAME, WEEKLY_BURST_DESCRIPTION)?
  {
    granted.push(WEEKLY_BURST_NAME.to_string());
  }

  if !granted.is_empty() {
    tracing::info!(user_id, granted = ?granted, "granted achievements");
  }

  Ok(granted)
}

/// Count the run of distinct in-window days in a most-recent-first scan.
///
/// Any record outside [today - (window - 1), today] clears the running
/// tally; the scan returns early once the tally covers the window.
/// Lenient semantics: only window membership interrupted by an
/// out-of-window record matters, the accumulated days need not be
/// pairwise adjacent.
fn distinct_day_run(records: &[StudyRecord], today: NaiveDate, window_days: i64) -> usize {
  let start = today - Duration::days(window_days - 1);
  let mut days: Vec<NaiveDate> = Vec::new();

  for record in records {
    let day = record.recorded_at.date_naive();
    if day >= start && day <= today {
      if !days.contains(&day) {
        days.push(day);
        if days.len() >= window_days as usize {
          return days.len();
        }
      }
    } else {
      days.clear();
    }
  }

  days.len()
}

/// Records whose day falls within [today - 7, today], order-independent
fn records_in_week(records: &[StudyRecord], today: NaiveDate) -> i64 {
  let start = today - Duration::days(7);
  records
    .iter()
    .filter(|r| {
      let day = r.recorded_at.date_naive();
      day >= start && day <= today
    })
    .count() as i64
}
