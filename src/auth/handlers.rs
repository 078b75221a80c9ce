//! Authentication handlers for login, register, and logout.

use askama::Template;
use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect},
    Form,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::Deserialize;

use super::db as auth_db;
use super::db::generate_session_id;
use super::middleware::SESSION_COOKIE_NAME;
use super::password;
use crate::config;
use crate::state::AppState;

/// Where a fresh login lands when no ?next= destination was preserved
const DEFAULT_AFTER_LOGIN: &str = "/start_game";

#[derive(Template)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
    pub next: String,
}

#[derive(Template)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub error: Option<String>,
}

#[derive(Deserialize)]
pub struct NextQuery {
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub next: String,
}

#[derive(Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub password: String,
}

/// Only same-site absolute paths survive the redirect round-trip
fn safe_next(next: &str) -> &str {
    if next.starts_with('/') && !next.starts_with("//") {
        next
    } else {
        DEFAULT_AFTER_LOGIN
    }
}

fn login_error(jar: CookieJar, next: &str, message: &str) -> axum::response::Response {
    let template = LoginTemplate {
        error: Some(message.to_string()),
        next: next.to_string(),
    };
    (jar, Html(template.render().unwrap_or_default())).into_response()
}

fn register_error(jar: CookieJar, message: &str) -> axum::response::Response {
    let template = RegisterTemplate {
        error: Some(message.to_string()),
    };
    (jar, Html(template.render().unwrap_or_default())).into_response()
}

fn session_cookie(session_id: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, session_id))
        .path("/")
        .http_only(true)
        .secure(false) // Set to true in production with HTTPS
        .max_age(time::Duration::hours(config::SESSION_DURATION_HOURS))
        .build()
}

/// GET /login - Show login page
pub async fn login_page(Query(query): Query<NextQuery>) -> Html<String> {
    let template = LoginTemplate {
        error: None,
        next: query.next.unwrap_or_default(),
    };
    Html(template.render().unwrap_or_default())
}

/// POST /login - Process login
pub async fn login_submit(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> impl IntoResponse {
    if form.username.is_empty() || form.password.is_empty() {
        return login_error(jar, &form.next, "Username and password are required");
    }

    let conn = match state.db.lock() {
        Ok(conn) => conn,
        Err(_) => return login_error(jar, &form.next, "Database error"),
    };

    let (user_id, password_hash) = match auth_db::get_user_by_username(&conn, &form.username) {
        Ok(Some(user)) => user,
        Ok(None) => return login_error(jar, &form.next, "Invalid username or password"),
        Err(_) => return login_error(jar, &form.next, "Database error"),
    };

    if !password::verify_password(&form.password, &password_hash) {
        return login_error(jar, &form.next, "Invalid username or password");
    }

    // Update last login time (log but don't fail on error)
    if let Err(e) = auth_db::update_last_login(&conn, user_id) {
        tracing::warn!("Failed to update last login for user {}: {}", user_id, e);
    }

    // Expired sessions pile up otherwise; login is a convenient sweep point
    if let Err(e) = auth_db::cleanup_expired_sessions(&conn) {
        tracing::warn!("Failed to clean up expired sessions: {}", e);
    }

    let session_id = generate_session_id();
    if auth_db::create_session(&conn, user_id, &session_id, config::SESSION_DURATION_HOURS)
        .is_err()
    {
        return login_error(jar, &form.next, "Failed to create session");
    }
    drop(conn);

    tracing::info!(user_id, username = %form.username, "user logged in");

    let destination = safe_next(&form.next).to_string();
    (
        jar.add(session_cookie(session_id)),
        Redirect::to(&destination),
    )
        .into_response()
}

/// GET /register - Show registration page
pub async fn register_page() -> Html<String> {
    let template = RegisterTemplate { error: None };
    Html(template.render().unwrap_or_default())
}

/// POST /register - Process registration
pub async fn register_submit(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<RegisterForm>,
) -> impl IntoResponse {
    if !is_valid_username(&form.username) {
        return register_error(
            jar,
            "Username must be 3-32 alphanumeric characters or underscores",
        );
    }
    if form.password.len() < 8 {
        return register_error(jar, "Password must be at least 8 characters");
    }

    let password_hash = match password::hash_password(&form.password) {
        Ok(hash) => hash,
        Err(_) => return register_error(jar, "Failed to process password"),
    };

    let conn = match state.db.lock() {
        Ok(conn) => conn,
        Err(_) => return register_error(jar, "Database error"),
    };

    match auth_db::username_exists(&conn, &form.username) {
        Ok(true) => return register_error(jar, "Username already exists"),
        Err(_) => return register_error(jar, "Database error"),
        Ok(false) => {}
    }

    let user_id = match auth_db::create_user(&conn, &form.username, &password_hash) {
        Ok(id) => id,
        Err(_) => return register_error(jar, "Failed to create account"),
    };

    // Auto-login after registration
    let session_id = generate_session_id();
    if let Err(e) =
        auth_db::create_session(&conn, user_id, &session_id, config::SESSION_DURATION_HOURS)
    {
        tracing::error!("Failed to create session after registration: {}", e);
        return register_error(jar, "Account created but session failed. Please log in.");
    }
    drop(conn);

    tracing::info!(user_id, username = %form.username, "user registered");

    (
        jar.add(session_cookie(session_id)),
        Redirect::to(DEFAULT_AFTER_LOGIN),
    )
        .into_response()
}

/// POST /logout - Log out and clear session
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    if let Some(cookie) = jar.get(SESSION_COOKIE_NAME) {
        let session_id = cookie.value();
        if let Ok(conn) = state.db.lock() {
            if let Err(e) = auth_db::delete_session(&conn, session_id) {
                tracing::warn!("Failed to delete session during logout: {}", e);
            }
        }
    }

    let expired = Cookie::build((SESSION_COOKIE_NAME, ""))
        .path("/")
        .max_age(time::Duration::seconds(0))
        .build();

    (jar.remove(expired), Redirect::to("/login"))
}

/// Validate username: 3-32 chars, alphanumeric + underscore
fn is_valid_username(username: &str) -> bool {
    let len = username.chars().count();
    (3..=32).contains(&len)
        && username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}
