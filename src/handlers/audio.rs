//! Speech synthesis endpoints.

use axum::{
  extract::{Path, State},
  http::{header, StatusCode},
  response::{IntoResponse, Response},
  Json,
};
use serde_json::json;
use std::path::Path as FsPath;

use crate::state::AppState;
use crate::tts::synthesize;

/// GET /tts/{word} - synthesize a word into a fresh scratch file.
///
/// Responds with the file name to fetch back via /play-audio.
pub async fn tts(State(state): State<AppState>, Path(word): Path<String>) -> Response {
  match synthesize(&state.tts_dir, &word).await {
    Ok(filename) => Json(json!({
      "status": "success",
      "filename": filename,
    }))
    .into_response(),
    Err(e) => {
      tracing::error!("Speech synthesis failed for {:?}: {}", word, e);
      (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "status": "error" })),
      )
        .into_response()
    }
  }
}

/// GET /play-audio/{file_path} - stream a generated file as mpeg.
///
/// Only the basename is honored, confining reads to the scratch
/// directory.
pub async fn play_audio(State(state): State<AppState>, Path(file_path): Path<String>) -> Response {
  let Some(filename) = FsPath::new(&file_path)
    .file_name()
    .and_then(|name| name.to_str())
  else {
    return StatusCode::NOT_FOUND.into_response();
  };

  match tokio::fs::read(state.tts_file_path(filename)).await {
    Ok(bytes) => ([(header::CONTENT_TYPE, "audio/mpeg")], bytes).into_response(),
    Err(_) => StatusCode::NOT_FOUND.into_response(),
  }
}
