//! HTTP-level tests covering the main flows: registration, CSV
//! upload, word display, the game loop, and the history view.

use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use tempfile::TempDir;

use lexiq::db::DbPool;
use lexiq::routes;
use lexiq::state::AppState;

struct WebEnv {
  server: TestServer,
  pool: DbPool,
  // Held for the lifetime of the test so the files stay around
  _temp: TempDir,
}

fn spawn() -> WebEnv {
  let temp = TempDir::new().unwrap();
  let pool = lexiq::db::init_db(&temp.path().join("test.db")).unwrap();
  let state = AppState::new(pool.clone(), temp.path().join("tts"));

  let server = TestServer::builder()
    .save_cookies()
    .build(routes::app(state))
    .unwrap();

  WebEnv {
    server,
    pool,
    _temp: temp,
  }
}

/// Register (and thereby log in) a user through the HTTP surface.
/// The name "admin" gets administrator rights.
async fn register(server: &TestServer, username: &str) {
  let response = server
    .post("/register")
    .form(&[("username", username), ("password", "hunter2hunter2")])
    .await;
  response.assert_status(StatusCode::SEE_OTHER);
}

async fn upload_fruits_csv(server: &TestServer) {
  let csv = Part::bytes("apple,苹果\nbanana,香蕉\n".as_bytes().to_vec())
    .file_name("fruits.csv")
    .mime_type("text/csv");
  let response = server
    .post("/upload_csv")
    .multipart(MultipartForm::new().add_part("file", csv))
    .await;
  response.assert_status_ok();
  response.assert_text_contains("Imported 2 words into \"fruits\"");
}

fn group_id_by_name(pool: &DbPool, name: &str) -> i64 {
  let conn = pool.lock().unwrap();
  conn
    .query_row(
      "SELECT id FROM word_groups WHERE name = ?1",
      rusqlite::params![name],
      |row| row.get(0),
    )
    .unwrap()
}

fn word_in_group(pool: &DbPool, group_id: i64) -> (i64, String) {
  let conn = pool.lock().unwrap();
  conn
    .query_row(
      "SELECT id, word FROM words WHERE group_id = ?1 ORDER BY id LIMIT 1",
      rusqlite::params![group_id],
      |row| Ok((row.get(0)?, row.get(1)?)),
    )
    .unwrap()
}

#[tokio::test]
async fn test_index_renders() {
  let env = spawn();
  let response = env.server.get("/").await;
  response.assert_status_ok();
  response.assert_text_contains("LexiQ");
}

#[tokio::test]
async fn test_study_records_requires_login() {
  let env = spawn();
  let response = env.server.get("/study-records").await;
  response.assert_status(StatusCode::SEE_OTHER);
  let location = response.header("location");
  assert_eq!(
    location.to_str().unwrap(),
    "/login?next=%2Fstudy-records"
  );
}

#[tokio::test]
async fn test_login_preserves_next_destination() {
  let env = spawn();
  register(&env.server, "alice").await;

  // A fresh login (the register already set a cookie, but the login
  // flow must still honor the preserved destination)
  let response = env
    .server
    .post("/login")
    .form(&[
      ("username", "alice"),
      ("password", "hunter2hunter2"),
      ("next", "/study-records"),
    ])
    .await;
  response.assert_status(StatusCode::SEE_OTHER);
  assert_eq!(
    response.header("location").to_str().unwrap(),
    "/study-records"
  );
}

#[tokio::test]
async fn test_upload_requires_admin() {
  let env = spawn();
  register(&env.server, "alice").await;

  let csv = Part::bytes(b"apple,fruit\n".to_vec())
    .file_name("fruits.csv")
    .mime_type("text/csv");
  let response = env
    .server
    .post("/upload_csv")
    .multipart(MultipartForm::new().add_part("file", csv))
    .await;
  response.assert_status_forbidden();
}

#[tokio::test]
async fn test_admin_csv_upload_creates_group() {
  let env = spawn();
  register(&env.server, "admin").await;
  upload_fruits_csv(&env.server).await;

  let response = env.server.get("/display_words").await;
  response.assert_status_ok();
  response.assert_text_contains("fruits");
  response.assert_text_contains("apple");
  response.assert_text_contains("苹果");
}

#[tokio::test]
async fn test_non_csv_upload_is_rejected() {
  let env = spawn();
  register(&env.server, "admin").await;

  let file = Part::bytes(b"apple,fruit\n".to_vec())
    .file_name("fruits.txt")
    .mime_type("text/plain");
  let response = env
    .server
    .post("/upload_csv")
    .multipart(MultipartForm::new().add_part("file", file))
    .await;
  response.assert_status_ok();
  response.assert_text_contains("Only .csv files are accepted");
}

#[tokio::test]
async fn test_game_round_trip() {
  let env = spawn();
  register(&env.server, "admin").await;
  upload_fruits_csv(&env.server).await;
  let group_id = group_id_by_name(&env.pool, "fruits");

  // Presenting a word shows its meaning, not the word itself
  let response = env.server.get(&format!("/game/{}", group_id)).await;
  response.assert_status_ok();

  let (word_id, word_text) = word_in_group(&env.pool, group_id);

  // Wrong guess re-renders with feedback cells
  let response = env
    .server
    .post(&format!("/game/{}", group_id))
    .form(&[
      ("word_id", word_id.to_string()),
      ("guess", "zzzzz".to_string()),
    ])
    .await;
  response.assert_status_ok();
  response.assert_text_contains("Not quite");
  response.assert_text_contains("cell");

  // Correct guess records a study event and advances
  let response = env
    .server
    .post(&format!("/game/{}", group_id))
    .form(&[("word_id", word_id.to_string()), ("guess", word_text)])
    .await;
  response.assert_status_ok();
  response.assert_text_contains("Correct");

  let records: i64 = {
    let conn = env.pool.lock().unwrap();
    conn
      .query_row("SELECT COUNT(*) FROM study_records", [], |row| row.get(0))
      .unwrap()
  };
  assert_eq!(records, 1);
}

#[tokio::test]
async fn test_game_unknown_ids_are_404() {
  let env = spawn();
  let response = env.server.get("/game/9999").await;
  response.assert_status_not_found();

  register(&env.server, "admin").await;
  upload_fruits_csv(&env.server).await;
  let group_id = group_id_by_name(&env.pool, "fruits");

  let response = env
    .server
    .post(&format!("/game/{}", group_id))
    .form(&[("word_id", "9999"), ("guess", "apple")])
    .await;
  response.assert_status_not_found();
}

#[tokio::test]
async fn test_study_records_shows_achievement_after_first_word() {
  let env = spawn();
  register(&env.server, "admin").await;
  upload_fruits_csv(&env.server).await;
  let group_id = group_id_by_name(&env.pool, "fruits");
  let (word_id, word_text) = word_in_group(&env.pool, group_id);

  env
    .server
    .post(&format!("/game/{}", group_id))
    .form(&[("word_id", word_id.to_string()), ("guess", word_text)])
    .await
    .assert_status_ok();

  let response = env.server.get("/study-records").await;
  response.assert_status_ok();
  response.assert_text_contains("A Journey Begins");
  response.assert_text_contains("1 words studied");
}

#[tokio::test]
async fn test_delete_word_group_cascades() {
  let env = spawn();
  register(&env.server, "admin").await;
  upload_fruits_csv(&env.server).await;
  let group_id = group_id_by_name(&env.pool, "fruits");

  let response = env
    .server
    .post(&format!("/delete_word_group/{}", group_id))
    .await;
  response.assert_status(StatusCode::SEE_OTHER);

  let response = env.server.get("/display_words").await;
  response.assert_status_ok();
  assert!(!response.text().contains("apple"));

  // Deleting it again is a 404
  let response = env
    .server
    .post(&format!("/delete_word_group/{}", group_id))
    .await;
  response.assert_status_not_found();
}

#[tokio::test]
async fn test_logout_clears_session() {
  let env = spawn();
  register(&env.server, "alice").await;

  env.server.get("/study-records").await.assert_status_ok();

  env.server.post("/logout").await.assert_status(StatusCode::SEE_OTHER);

  let response = env.server.get("/study-records").await;
  response.assert_status(StatusCode::SEE_OTHER);
}
