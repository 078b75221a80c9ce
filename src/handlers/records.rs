//! Study history and achievements view.

use askama::Template;
use axum::{
  extract::State,
  http::StatusCode,
  response::{Html, IntoResponse, Response},
};

use crate::achievements;
use crate::auth::AuthContext;
use crate::db::{self, LogOnError, StudyRecordView};
use crate::domain::EarnedAchievement;
use crate::state::AppState;

#[derive(Template)]
#[template(path = "study_records.html")]
pub struct StudyRecordsTemplate {
  pub username: String,
  pub total: i64,
  pub records: Vec<StudyRecordView>,
  pub earned: Vec<EarnedAchievement>,
}

/// GET /study-records - the user's history plus earned achievements.
///
/// Evaluation happens here: any achievement the user now qualifies
/// for is granted before the page renders.
pub async fn view_study_records(State(state): State<AppState>, auth: AuthContext) -> Response {
  let Ok(conn) = db::try_lock(&state.db) else {
    return StatusCode::INTERNAL_SERVER_ERROR.into_response();
  };

  achievements::evaluate(&conn, auth.user_id).log_warn("Achievement evaluation failed");

  let records =
    db::study_records_with_words(&conn, auth.user_id).log_warn_default("Failed to load records");
  let total = db::count_records_for_user(&conn, auth.user_id)
    .log_warn_default("Failed to count records");
  let earned = db::achievements_for_user(&conn, auth.user_id)
    .log_warn_default("Failed to load achievements");

  let template = StudyRecordsTemplate {
    username: auth.username,
    total,
    records,
    earned,
  };
  Html(template.render().unwrap_or_default()).into_response()
}
