use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lexiq::{config, db, paths, routes, state::AppState};

#[tokio::main]
async fn main() {
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "lexiq=debug,tower_http=debug".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  let db_path = config::load_database_path();
  let pool = db::init_db(&db_path).expect("Failed to initialize database");

  let tts_dir = std::path::PathBuf::from(paths::tts_dir());
  std::fs::create_dir_all(&tts_dir).expect("Failed to create tts directory");

  let app = routes::app(AppState::new(pool, tts_dir));

  let bind_addr = config::server_bind_addr();
  let listener = tokio::net::TcpListener::bind(&bind_addr)
    .await
    .unwrap_or_else(|_| panic!("Failed to bind to {}", bind_addr));

  tracing::info!("Server running on http://localhost:{}", config::SERVER_PORT);

  axum::serve(listener, app)
    .await
    .expect("Server error");
}
