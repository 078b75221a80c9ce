//! Progress selector: decides the next word a user is quizzed on.
//!
//! Authenticated users work through a per-(user, group) pool that
//! guarantees full coverage before repetition; the pool only shrinks
//! on a confirmed correct guess and resets to the full group once
//! exhausted. Guests get a uniformly random word with no tracking.
//!
//! The random source is injected so tests can seed it.

use rand::seq::IndexedRandom;
use rand::Rng;
use rusqlite::{Connection, Result};

use crate::db;
use crate::domain::Word;

/// Pick the next word to present for (user, group).
///
/// Returns None for an empty group; the caller redirects back to
/// group selection. Presentation does not touch the pool.
pub fn next_word<R: Rng + ?Sized>(
  conn: &Connection,
  user_id: Option<i64>,
  group_id: i64,
  rng: &mut R,
) -> Result<Option<Word>> {
  let words = db::words::words_in_group(conn, group_id)?;
  if words.is_empty() {
    return Ok(None);
  }

  // Guest mode: random word from the full group, no progress tracking
  let Some(user_id) = user_id else {
    return Ok(words.choose(rng).cloned());
  };

  let progress_id = db::progress::get_or_create(conn, user_id, group_id)?;
  let mut pool = db::progress::pool_words(conn, progress_id)?;
  if pool.is_empty() {
    // Exhausted: re-sync to the group's current membership
    db::progress::reset_pool(conn, progress_id, group_id)?;
    pool = db::progress::pool_words(conn, progress_id)?;
  }

  Ok(pool.choose(rng).cloned())
}

/// Record a confirmed correct guess.
///
/// Appends a study record and pops the word from the user's pool for
/// its group. Guests leave no trace; a missing progress row or a word
/// already outside the pool is silently ignored.
pub fn record_correct_guess(conn: &Connection, user_id: Option<i64>, word: &Word) -> Result<()> {
  let Some(user_id) = user_id else {
    return Ok(());
  };

  db::records::insert_study_record(conn, user_id, word.id)?;

  if let Some(progress_id) = db::progress::find(conn, user_id, word.group_id)? {
    db::progress::remove_word(conn, progress_id, word.id)?;
  }

  Ok(())
}
