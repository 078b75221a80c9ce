//! Speech synthesis via the external `edge-tts` command.
//!
//! Each request writes to a fresh uuid-named file in the scratch
//! directory, so concurrent requests never clobber each other. Stale
//! files are swept opportunistically on each synthesis instead of
//! wiping the directory up front.

use std::io;
use std::path::Path;
use std::time::Duration;

use tokio::process::Command;
use uuid::Uuid;

use crate::config;

/// Synthesize `word` into a new mp3 under `tts_dir`.
///
/// Returns the generated file name (not the full path). The caller
/// serves it back through the play-audio route.
pub async fn synthesize(tts_dir: &Path, word: &str) -> io::Result<String> {
    tokio::fs::create_dir_all(tts_dir).await?;
    cleanup_stale(tts_dir).await;

    let filename = format!("{}.mp3", Uuid::new_v4());
    let output_path = tts_dir.join(&filename);

    let output = Command::new("edge-tts")
        .arg("--voice")
        .arg(config::TTS_VOICE)
        .arg("--text")
        .arg(word)
        .arg("--write-media")
        .arg(&output_path)
        .output()
        .await?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        tracing::error!(word, %stderr, "edge-tts failed");
        return Err(io::Error::other(format!(
            "edge-tts exited with {}",
            output.status
        )));
    }

    tracing::debug!(word, filename, "synthesized audio");
    Ok(filename)
}

/// Remove scratch files past their age limit. Deletion failures are
/// logged and skipped; the sweep never blocks a synthesis request.
async fn cleanup_stale(tts_dir: &Path) {
    let max_age = Duration::from_secs(config::TTS_FILE_MAX_AGE_MINUTES as u64 * 60);

    let mut entries = match tokio::fs::read_dir(tts_dir).await {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!("Failed to read tts directory: {}", e);
            return;
        }
    };

    while let Ok(Some(entry)) = entries.next_entry().await {
        let expired = entry
            .metadata()
            .await
            .ok()
            .and_then(|m| m.modified().ok())
            .and_then(|t| t.elapsed().ok())
            .is_some_and(|age| age > max_age);

        if expired {
            if let Err(e) = tokio::fs::remove_file(entry.path()).await {
                tracing::warn!("Failed to delete stale tts file {:?}: {}", entry.path(), e);
            }
        }
    }
}
