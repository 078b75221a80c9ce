//! The guessing game: group selection and guess evaluation.

use askama::Template;
use axum::{
  extract::{Path, State},
  http::StatusCode,
  response::{Html, IntoResponse, Redirect, Response},
  Form,
};
use serde::Deserialize;

use crate::auth::OptionalAuth;
use crate::db::{self, LogOnError};
use crate::domain::{Word, WordGroup};
use crate::feedback::{feedback, is_correct};
use crate::selector;
use crate::state::AppState;

#[derive(Template)]
#[template(path = "start_game.html")]
pub struct StartGameTemplate {
  pub groups: Vec<WordGroup>,
}

/// One guessed letter with its feedback color, for the game template
pub struct FeedbackCell {
  pub letter: String,
  pub class: &'static str,
}

#[derive(Template)]
#[template(path = "game.html")]
pub struct GameTemplate {
  pub group: WordGroup,
  pub word: Word,
  pub cells: Vec<FeedbackCell>,
  pub success_message: Option<String>,
  pub error_message: Option<String>,
  pub last_guess: String,
}

impl GameTemplate {
  /// Letter count shown as the guess hint
  fn word_len(&self) -> usize {
    self.word.text.chars().count()
  }
}

#[derive(Deserialize)]
pub struct GroupChoiceForm {
  pub group_id: i64,
}

#[derive(Deserialize)]
pub struct GuessForm {
  pub word_id: i64,
  pub guess: String,
}

/// GET /start_game - group selection page
pub async fn start_game_page(State(state): State<AppState>) -> Response {
  let Ok(conn) = db::try_lock(&state.db) else {
    return StatusCode::INTERNAL_SERVER_ERROR.into_response();
  };
  let groups = db::list_groups(&conn).log_warn_default("Failed to list groups");
  let template = StartGameTemplate { groups };
  Html(template.render().unwrap_or_default()).into_response()
}

/// POST /start_game - jump into the chosen group
pub async fn start_game_submit(
  State(state): State<AppState>,
  Form(form): Form<GroupChoiceForm>,
) -> Response {
  let Ok(conn) = db::try_lock(&state.db) else {
    return StatusCode::INTERNAL_SERVER_ERROR.into_response();
  };
  match db::get_group(&conn, form.group_id) {
    Ok(Some(group)) => Redirect::to(&format!("/game/{}", group.id)).into_response(),
    Ok(None) => StatusCode::NOT_FOUND.into_response(),
    Err(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
  }
}

fn render_game(
  group: WordGroup,
  word: Word,
  cells: Vec<FeedbackCell>,
  success_message: Option<String>,
  error_message: Option<String>,
  last_guess: String,
) -> Response {
  let template = GameTemplate {
    group,
    word,
    cells,
    success_message,
    error_message,
    last_guess,
  };
  Html(template.render().unwrap_or_default()).into_response()
}

/// GET /game/{group_id} - present the next word
pub async fn game_page(
  State(state): State<AppState>,
  OptionalAuth(auth): OptionalAuth,
  Path(group_id): Path<i64>,
) -> Response {
  let Ok(conn) = db::try_lock(&state.db) else {
    return StatusCode::INTERNAL_SERVER_ERROR.into_response();
  };

  let group = match db::get_group(&conn, group_id) {
    Ok(Some(group)) => group,
    Ok(None) => return StatusCode::NOT_FOUND.into_response(),
    Err(_) => return StatusCode::INTERNAL_SERVER_ERROR.into_response(),
  };

  let user_id = auth.map(|ctx| ctx.user_id);
  match selector::next_word(&conn, user_id, group_id, &mut rand::rng()) {
    Ok(Some(word)) => render_game(group, word, Vec::new(), None, None, String::new()),
    // Empty group: nothing to play, back to selection
    Ok(None) => Redirect::to("/start_game").into_response(),
    Err(e) => {
      tracing::error!("Failed to select next word: {}", e);
      StatusCode::INTERNAL_SERVER_ERROR.into_response()
    }
  }
}

/// POST /game/{group_id} - evaluate a guess.
///
/// A correct guess records the study event and presents the next
/// word; an incorrect one re-renders with per-letter feedback.
pub async fn game_guess(
  State(state): State<AppState>,
  OptionalAuth(auth): OptionalAuth,
  Path(group_id): Path<i64>,
  Form(form): Form<GuessForm>,
) -> Response {
  let Ok(conn) = db::try_lock(&state.db) else {
    return StatusCode::INTERNAL_SERVER_ERROR.into_response();
  };

  let group = match db::get_group(&conn, group_id) {
    Ok(Some(group)) => group,
    Ok(None) => return StatusCode::NOT_FOUND.into_response(),
    Err(_) => return StatusCode::INTERNAL_SERVER_ERROR.into_response(),
  };

  // The guessed word must exist and belong to the group being played
  let word = match db::get_word(&conn, form.word_id) {
    Ok(Some(word)) if word.group_id == group_id => word,
    Ok(_) => return StatusCode::NOT_FOUND.into_response(),
    Err(_) => return StatusCode::INTERNAL_SERVER_ERROR.into_response(),
  };

  let guess = form.guess.trim();
  let user_id = auth.map(|ctx| ctx.user_id);

  if is_correct(&word.text, guess) {
    selector::record_correct_guess(&conn, user_id, &word)
      .log_warn("Failed to record correct guess");

    match selector::next_word(&conn, user_id, group_id, &mut rand::rng()) {
      Ok(Some(next)) => render_game(
        group,
        next,
        Vec::new(),
        Some("Correct! Here is your next word.".to_string()),
        None,
        String::new(),
      ),
      Ok(None) => Redirect::to("/start_game").into_response(),
      Err(e) => {
        tracing::error!("Failed to select next word: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR.into_response()
      }
    }
  } else {
    let marks = feedback(&word.text, guess);
    let mut guessed_chars = guess.chars();
    let cells = marks
      .iter()
      .map(|mark| FeedbackCell {
        letter: guessed_chars.next().unwrap_or(' ').to_string(),
        class: mark.css_class(),
      })
      .collect();

    render_game(
      group,
      word,
      cells,
      None,
      Some("Not quite, try again.".to_string()),
      guess.to_string(),
    )
  }
}
