//! Core types shared across the tracking engine.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Default ease factor for an item that has never reported one.
pub const DEFAULT_EASE: f64 = 2.5;

/// Canonical learning state for one kanji, as stored and as returned to
/// clients. Every record is complete: normalization fills in defaults for
/// whatever the client left out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemProgress {
    pub learned: bool,
    pub in_review: bool,
    /// Current spacing interval in days, always at least 1.
    pub interval: u32,
    /// Ease factor, always at least 1.0.
    pub ease: f64,
    pub consecutive_correct: u32,
    pub total_reviews: u32,
    pub correct_reviews: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_reviewed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_review_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Default for ItemProgress {
    fn default() -> Self {
        Self {
            learned: false,
            in_review: false,
            interval: 1,
            ease: DEFAULT_EASE,
            consecutive_correct: 0,
            total_reviews: 0,
            correct_reviews: 0,
            last_reviewed_at: None,
            next_review_at: None,
            note: None,
        }
    }
}

/// Sparse progress snapshot as submitted by a client. The client is the
/// source of truth for scheduling, so fields arrive wide and get checked
/// during normalization rather than rejected by the deserializer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub learned: Option<bool>,
    pub in_review: Option<bool>,
    pub interval: Option<i64>,
    pub ease: Option<f64>,
    pub consecutive_correct: Option<i64>,
    pub total_reviews: Option<i64>,
    pub correct_reviews: Option<i64>,
    pub last_reviewed_at: Option<DateTime<Utc>>,
    pub next_review_at: Option<DateTime<Utc>>,
    pub note: Option<String>,
}

/// Daily streak state for one user. Absent entirely until the first
/// recorded review; once present, `daily_streak` is at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakState {
    pub daily_streak: u32,
    /// UTC calendar date of the most recent recorded review.
    pub last_review_date: NaiveDate,
}

/// Which side of a card the study client should prompt with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionMode {
    Meaning,
    Reading,
    #[default]
    Both,
}

impl QuestionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionMode::Meaning => "meaning",
            QuestionMode::Reading => "reading",
            QuestionMode::Both => "both",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "meaning" => Some(QuestionMode::Meaning),
            "reading" => Some(QuestionMode::Reading),
            "both" => Some(QuestionMode::Both),
            _ => None,
        }
    }
}

/// Interface language for study clients.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ja,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ja => "ja",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "en" => Some(Language::En),
            "ja" => Some(Language::Ja),
            _ => None,
        }
    }
}

/// Fully resolved user settings: every field populated, either from a
/// stored override or from the default table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub display_name: String,
    pub max_level: u32,
    pub level_filter: u32,
    pub max_interval: u32,
    pub show_readings: bool,
    pub show_meanings: bool,
    pub show_stroke_order: bool,
    pub autoplay_audio: bool,
    pub question_mode: QuestionMode,
    pub language: Language,
}

impl Settings {
    /// Fully defaulted settings for an account with the given display name.
    pub fn default_for(display_name: &str) -> Self {
        Self {
            display_name: display_name.to_string(),
            max_level: 60,
            level_filter: 0,
            max_interval: 365,
            show_readings: true,
            show_meanings: true,
            show_stroke_order: false,
            autoplay_audio: false,
            question_mode: QuestionMode::default(),
            language: Language::default(),
        }
    }
}

/// Sparse settings overrides, both on the wire and at rest. A field that is
/// `None` has never been set by the user and resolves to its default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettingsPatch {
    pub display_name: Option<String>,
    pub max_level: Option<i64>,
    pub level_filter: Option<i64>,
    pub max_interval: Option<i64>,
    pub show_readings: Option<bool>,
    pub show_meanings: Option<bool>,
    pub show_stroke_order: Option<bool>,
    pub autoplay_audio: Option<bool>,
    pub question_mode: Option<String>,
    pub language: Option<String>,
}
