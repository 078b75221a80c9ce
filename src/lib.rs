pub mod achievements;
pub mod auth;
pub mod config;
pub mod db;
pub mod domain;
pub mod feedback;
pub mod handlers;
pub mod paths;
pub mod routes;
pub mod selector;
pub mod state;
pub mod tts;

#[cfg(test)]
pub mod testing;
