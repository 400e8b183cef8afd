//! Core learning-progress engine for the kanji tracker.
//!
//! This crate is pure logic with no storage or HTTP concerns:
//!
//! - Canonical progress, streak, and settings types
//! - Normalization of sparse client snapshots into complete records
//! - The daily streak continuity calculator
//! - Settings resolution over a fixed default table

pub mod error;
pub mod progress;
pub mod settings;
pub mod streak;
pub mod types;

pub use error::{Result, ValidationError};
pub use streak::{advance, StreakDecision};
pub use types::{
    ItemProgress, Language, ProgressUpdate, QuestionMode, Settings, SettingsPatch, StreakState,
};
