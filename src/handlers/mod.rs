pub mod audio;
pub mod game;
pub mod records;
pub mod upload;
pub mod words;

use askama::Template;
use axum::{extract::State, response::Html};

use crate::auth::OptionalAuth;
use crate::db::{self, LogOnError};
use crate::state::AppState;

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
  pub username: Option<String>,
  pub group_count: i64,
  pub word_count: i64,
  pub record_count: i64,
  pub achievement_count: i64,
}

/// GET / - landing page with collection and per-user totals
pub async fn index(State(state): State<AppState>, OptionalAuth(auth): OptionalAuth) -> Html<String> {
  let Ok(conn) = db::try_lock(&state.db) else {
    return Html(String::new());
  };

  let group_count = db::list_groups(&conn)
    .log_warn_default("Failed to list groups")
    .len() as i64;
  let word_count = db::count_words(&conn).log_warn_default("Failed to count words");

  let (record_count, achievement_count) = match &auth {
    Some(ctx) => (
      db::count_records_for_user(&conn, ctx.user_id)
        .log_warn_default("Failed to count study records"),
      db::achievements_for_user(&conn, ctx.user_id)
        .log_warn_default("Failed to list achievements")
        .len() as i64,
    ),
    None => (0, 0),
  };

  let template = IndexTemplate {
    username: auth.map(|ctx| ctx.username),
    group_count,
    word_count,
    record_count,
    achievement_count,
  };

  Html(template.render().unwrap_or_default())
}

pub use audio::{play_audio, tts};
pub use game::{game_guess, game_page, start_game_page, start_game_submit};
pub use records::view_study_records;
pub use upload::{delete_word_group, upload_csv_page, upload_csv_submit};
pub use words::display_words;
