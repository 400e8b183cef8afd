//! Normalization of client-submitted progress snapshots.
//!
//! A snapshot is sparse: the client sends only the fields it knows about.
//! An upsert always replaces the whole record, so normalization produces a
//! complete [`ItemProgress`] with documented defaults for whatever was left
//! out. There is no field-by-field merge with the stored record; the last
//! full write wins.

use crate::error::{Result, ValidationError};
use crate::types::{ItemProgress, ProgressUpdate, DEFAULT_EASE};

/// Validate an item identifier. Identifiers are opaque to the engine but
/// must carry at least one non-whitespace character.
pub fn validate_item_id(item_id: &str) -> Result<()> {
    if item_id.trim().is_empty() {
        return Err(ValidationError::EmptyItemId);
    }
    Ok(())
}

/// Build the canonical record for one submitted snapshot.
///
/// Defaults for unspecified fields: `interval = 1`, `ease = 2.5`, every
/// counter 0, flags false, optional timestamps and note null.
pub fn normalize(update: &ProgressUpdate) -> Result<ItemProgress> {
    let interval = match update.interval {
        None => 1,
        Some(v) => checked_interval(v)?,
    };

    let ease = match update.ease {
        None => DEFAULT_EASE,
        Some(v) if v.is_finite() && v >= 1.0 => v,
        Some(v) => return Err(ValidationError::InvalidEase(v)),
    };

    let consecutive_correct = checked_count("consecutive_correct", update.consecutive_correct)?;
    let total_reviews = checked_count("total_reviews", update.total_reviews)?;
    let correct_reviews = checked_count("correct_reviews", update.correct_reviews)?;

    if correct_reviews > total_reviews {
        return Err(ValidationError::CorrectExceedsTotal {
            correct: correct_reviews as i64,
            total: total_reviews as i64,
        });
    }

    Ok(ItemProgress {
        learned: update.learned.unwrap_or(false),
        in_review: update.in_review.unwrap_or(false),
        interval,
        ease,
        consecutive_correct,
        total_reviews,
        correct_reviews,
        last_reviewed_at: update.last_reviewed_at,
        next_review_at: update.next_review_at,
        note: update.note.clone(),
    })
}

// Counts and intervals end up in INTEGER columns, so the accepted range is
// bounded by i32 even though the wire type is wider.
fn checked_interval(value: i64) -> Result<u32> {
    if (1..=i32::MAX as i64).contains(&value) {
        Ok(value as u32)
    } else {
        Err(ValidationError::InvalidInterval(value))
    }
}

fn checked_count(field: &'static str, value: Option<i64>) -> Result<u32> {
    match value {
        None => Ok(0),
        Some(v) if (0..=i32::MAX as i64).contains(&v) => Ok(v as u32),
        Some(v) => Err(ValidationError::InvalidCount { field, value: v }),
    }
}
