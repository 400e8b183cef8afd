//! HTTP route handlers

pub mod account;
pub mod auth;
pub mod progress;
pub mod settings;
pub mod streak;
