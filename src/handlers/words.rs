//! Word list display.

use askama::Template;
use axum::{extract::State, response::Html};

use crate::db::{self, LogOnError};
use crate::domain::{Word, WordGroup};
use crate::state::AppState;

/// A group together with its words, for the listing template
pub struct GroupWithWords {
  pub group: WordGroup,
  pub words: Vec<Word>,
}

#[derive(Template)]
#[template(path = "display_words.html")]
pub struct DisplayWordsTemplate {
  pub groups: Vec<GroupWithWords>,
}

/// GET /display_words - every group and its words
pub async fn display_words(State(state): State<AppState>) -> Html<String> {
  let Ok(conn) = db::try_lock(&state.db) else {
    return Html(String::new());
  };

  let groups = db::list_groups(&conn)
    .log_warn_default("Failed to list groups")
    .into_iter()
    .map(|group| {
      let words = db::words_in_group(&conn, group.id)
        .log_warn_default("Failed to load words for group");
      GroupWithWords { group, words }
    })
    .collect();

  let template = DisplayWordsTemplate { groups };
  Html(template.render().unwrap_or_default())
}
