//! Settings validation and resolution.
//!
//! Stored settings are sparse: a field the user never touched stays unset.
//! Reads resolve the sparse record against a fixed default table so clients
//! always see a complete object, and writes merge field-by-field so setting
//! one value never clobbers another.

use crate::error::{Result, ValidationError};
use crate::types::{Language, QuestionMode, Settings, SettingsPatch};

/// Check a submitted patch before it is persisted. Absent fields are fine;
/// present ones must parse and sit inside their range.
pub fn validate(patch: &SettingsPatch) -> Result<()> {
    if let Some(lang) = patch.language.as_deref() {
        if Language::from_str(lang).is_none() {
            return Err(ValidationError::UnsupportedLanguage(lang.to_string()));
        }
    }

    if let Some(mode) = patch.question_mode.as_deref() {
        if QuestionMode::from_str(mode).is_none() {
            return Err(ValidationError::UnknownQuestionMode(mode.to_string()));
        }
    }

    check_min("max_level", patch.max_level, 1)?;
    check_min("level_filter", patch.level_filter, 0)?;
    check_min("max_interval", patch.max_interval, 1)?;

    Ok(())
}

/// Resolve stored sparse settings against the defaults.
///
/// `display_name_fallback` fills the display name when none was ever set,
/// typically the account's username.
pub fn resolve(stored: Option<&SettingsPatch>, display_name_fallback: &str) -> Settings {
    let defaults = Settings::default_for(display_name_fallback);
    let Some(patch) = stored else {
        return defaults;
    };

    Settings {
        display_name: patch.display_name.clone().unwrap_or(defaults.display_name),
        max_level: level_or(patch.max_level, defaults.max_level),
        level_filter: level_or(patch.level_filter, defaults.level_filter),
        max_interval: level_or(patch.max_interval, defaults.max_interval),
        show_readings: patch.show_readings.unwrap_or(defaults.show_readings),
        show_meanings: patch.show_meanings.unwrap_or(defaults.show_meanings),
        show_stroke_order: patch.show_stroke_order.unwrap_or(defaults.show_stroke_order),
        autoplay_audio: patch.autoplay_audio.unwrap_or(defaults.autoplay_audio),
        question_mode: patch
            .question_mode
            .as_deref()
            .and_then(QuestionMode::from_str)
            .unwrap_or(defaults.question_mode),
        language: patch
            .language
            .as_deref()
            .and_then(Language::from_str)
            .unwrap_or(defaults.language),
    }
}

fn check_min(field: &'static str, value: Option<i64>, min: i64) -> Result<()> {
    match value {
        Some(v) if v < min => Err(ValidationError::SettingOutOfRange { field, min, value: v }),
        _ => Ok(()),
    }
}

// Stored values were range-checked on the way in; anything that still does
// not fit falls back to the default rather than wrapping.
fn level_or(value: Option<i64>, default: u32) -> u32 {
    value
        .and_then(|v| u32::try_from(v).ok())
        .unwrap_or(default)
}
