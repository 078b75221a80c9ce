//! Admin CSV upload and group deletion.

use askama::Template;
use axum::{
  extract::{Multipart, Path, State},
  http::StatusCode,
  response::{Html, IntoResponse, Redirect, Response},
};

use crate::auth::AuthContext;
use crate::db::{self, LogOnError};
use crate::domain::WordGroup;
use crate::state::AppState;

#[derive(Template)]
#[template(path = "upload_csv.html")]
pub struct UploadCsvTemplate {
  pub message: Option<String>,
  pub error: Option<String>,
  pub groups: Vec<WordGroup>,
}

fn render_upload(conn: &rusqlite::Connection, message: Option<String>, error: Option<String>) -> Response {
  let groups = db::list_groups(conn).log_warn_default("Failed to list groups");
  let template = UploadCsvTemplate {
    message,
    error,
    groups,
  };
  Html(template.render().unwrap_or_default()).into_response()
}

/// GET /upload_csv - upload form plus existing groups
pub async fn upload_csv_page(State(state): State<AppState>, auth: AuthContext) -> Response {
  if !auth.is_admin {
    return StatusCode::FORBIDDEN.into_response();
  }
  let Ok(conn) = db::try_lock(&state.db) else {
    return StatusCode::INTERNAL_SERVER_ERROR.into_response();
  };
  render_upload(&conn, None, None)
}

/// POST /upload_csv - import a word list.
///
/// The filename minus its extension becomes the group name. Malformed
/// rows are skipped and reported; they never abort the import.
pub async fn upload_csv_submit(
  State(state): State<AppState>,
  auth: AuthContext,
  mut multipart: Multipart,
) -> Response {
  if !auth.is_admin {
    return StatusCode::FORBIDDEN.into_response();
  }

  let mut upload: Option<(String, String)> = None;
  while let Ok(Some(field)) = multipart.next_field().await {
    if field.name() == Some("file") {
      let filename = field.file_name().unwrap_or_default().to_string();
      let Ok(bytes) = field.bytes().await else {
        break;
      };
      upload = Some((filename, String::from_utf8_lossy(&bytes).into_owned()));
      break;
    }
  }

  let Ok(conn) = db::try_lock(&state.db) else {
    return StatusCode::INTERNAL_SERVER_ERROR.into_response();
  };

  let Some((filename, content)) = upload else {
    return render_upload(&conn, None, Some("No file was uploaded".to_string()));
  };

  let Some(group_name) = filename.strip_suffix(".csv") else {
    return render_upload(
      &conn,
      None,
      Some("Only .csv files are accepted".to_string()),
    );
  };
  if group_name.is_empty() {
    return render_upload(&conn, None, Some("Invalid file name".to_string()));
  }

  let (rows, skipped) = parse_csv(&content);
  if rows.is_empty() {
    return render_upload(
      &conn,
      None,
      Some("No valid rows found in the file".to_string()),
    );
  }

  let imported = rows.len();
  let result = (|| -> rusqlite::Result<()> {
    let tx = conn.unchecked_transaction()?;
    let group_id = db::get_or_create_group(&conn, group_name)?;
    for (word, meaning) in &rows {
      db::insert_word(&conn, word, meaning, group_id)?;
    }
    tx.commit()
  })();

  match result {
    Ok(()) => {
      tracing::info!(group = group_name, imported, skipped, "imported word list");
      let mut message = format!("Imported {} words into \"{}\"", imported, group_name);
      if skipped > 0 {
        message.push_str(&format!(" ({} malformed rows skipped)", skipped));
      }
      render_upload(&conn, Some(message), None)
    }
    Err(e) => {
      tracing::error!("Failed to import word list: {}", e);
      render_upload(&conn, None, Some("Failed to import the word list".to_string()))
    }
  }
}

/// POST /delete_word_group/{group_id} - cascading delete
pub async fn delete_word_group(
  State(state): State<AppState>,
  auth: AuthContext,
  Path(group_id): Path<i64>,
) -> Response {
  if !auth.is_admin {
    return StatusCode::FORBIDDEN.into_response();
  }

  let Ok(conn) = db::try_lock(&state.db) else {
    return StatusCode::INTERNAL_SERVER_ERROR.into_response();
  };

  match db::get_group(&conn, group_id) {
    Ok(Some(group)) => match db::delete_group(&conn, group_id) {
      Ok(()) => {
        tracing::info!(group = %group.name, "deleted word group");
        Redirect::to("/upload_csv").into_response()
      }
      Err(e) => {
        tracing::error!("Failed to delete group {}: {}", group_id, e);
        StatusCode::INTERNAL_SERVER_ERROR.into_response()
      }
    },
    Ok(None) => StatusCode::NOT_FOUND.into_response(),
    Err(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
  }
}

/// Parse two-column CSV content into (word, meaning) rows.
///
/// Returns the valid rows and the count of skipped lines. A row is
/// valid when both columns are non-empty after trimming; anything
/// past the first comma belongs to the meaning.
fn parse_csv(content: &str) -> (Vec<(String, String)>, usize) {
  let mut rows = Vec::new();
  let mut skipped = 0;

  for line in content.trim_start_matches('\u{feff}').lines() {
    if line.trim().is_empty() {
      continue;
    }
    match line.split_once(',') {
      Some((word, meaning)) if !word.trim().is_empty() && !meaning.trim().is_empty() => {
        rows.push((word.trim().to_string(), meaning.trim().to_string()));
      }
      _ => skipped += 1,
    }
  }

  (rows, skipped)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_csv_two_columns() {
    let (rows, skipped) = parse_csv("apple,苹果\nbanana,香蕉\n");
    assert_eq!(skipped, 0);
    assert_eq!(
      rows,
      vec![
        ("apple".to_string(), "苹果".to_string()),
        ("banana".to_string(), "香蕉".to_string())
      ]
    );
  }

  #[test]
  fn test_parse_csv_skips_malformed_rows() {
    let (rows, skipped) = parse_csv("apple,苹果\nno-comma-here\n,empty word\nbanana,香蕉");
    assert_eq!(rows.len(), 2);
    assert_eq!(skipped, 2);
  }

  #[test]
  fn test_parse_csv_blank_lines_and_bom() {
    let (rows, skipped) = parse_csv("\u{feff}apple,苹果\n\n\n");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].0, "apple");
    assert_eq!(skipped, 0);
  }

  #[test]
  fn test_parse_csv_meaning_keeps_extra_commas() {
    let (rows, _) = parse_csv("bank,a place, or a riverside");
    assert_eq!(rows[0].1, "a place, or a riverside");
  }
}
