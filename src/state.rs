//! Application state shared by all handlers.

use std::path::PathBuf;

use crate::db::DbPool;

/// Application state passed to all handlers
#[derive(Clone)]
pub struct AppState {
    /// Shared database (users, sessions, words, study history)
    pub db: DbPool,

    /// Scratch directory for synthesized speech audio
    pub tts_dir: PathBuf,
}

impl AppState {
    pub fn new(db: DbPool, tts_dir: PathBuf) -> Self {
        Self { db, tts_dir }
    }

    /// Path of a synthesized audio file inside the scratch directory
    pub fn tts_file_path(&self, filename: &str) -> PathBuf {
        self.tts_dir.join(filename)
    }
}
