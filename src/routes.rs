//! Route table.

use axum::{
  routing::{get, post},
  Router,
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::auth;
use crate::handlers;
use crate::state::AppState;

pub fn app(state: AppState) -> Router {
  Router::new()
    .route("/", get(handlers::index))
    .route(
      "/upload_csv",
      get(handlers::upload_csv_page).post(handlers::upload_csv_submit),
    )
    .route("/delete_word_group/{group_id}", post(handlers::delete_word_group))
    .route("/display_words", get(handlers::display_words))
    .route(
      "/start_game",
      get(handlers::start_game_page).post(handlers::start_game_submit),
    )
    .route(
      "/game/{group_id}",
      get(handlers::game_page).post(handlers::game_guess),
    )
    .route("/tts/{word}", get(handlers::tts))
    .route("/play-audio/{file_path}", get(handlers::play_audio))
    .route("/login", get(auth::login_page).post(auth::login_submit))
    .route(
      "/register",
      get(auth::register_page).post(auth::register_submit),
    )
    .route("/logout", post(auth::logout))
    .route("/study-records", get(handlers::view_study_records))
    .nest_service("/static", ServeDir::new("static"))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}
