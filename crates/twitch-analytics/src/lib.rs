// Library entry point for the binary and integration tests

pub mod auth;
pub mod config;
pub mod server;
pub mod time;
pub mod twitch;
