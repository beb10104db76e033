//! Filename heuristics: infer a capture time and a category for each upload.
//!
//! This is a priority-ordered rule list, not a structured parse. Ambiguous
//! names resolve by rule order: a screenshot marker beats a date pattern,
//! a full date+time beats a bare time fragment.

use std::sync::OnceLock;

use chrono::{Local, NaiveDateTime, NaiveTime};
use regex::Regex;

/// Markers that identify a workout-detail screenshot.
const WORKOUT_SNAPSHOT_MARKERS: [&str; 3] = ["ReactNative", "Screenshot", "屏幕截图"];

/// Marker for Samsung Health summary exports.
const S_HEALTH_MARKER: &str = "SHealth";

/// Times above this are impossible (HHMMSS), so a matching fragment is noise.
const MAX_TIME_FRAGMENT: u32 = 240_000;

static EPOCH_NAME_RE: OnceLock<Regex> = OnceLock::new();
static FULL_DATETIME_RE: OnceLock<Regex> = OnceLock::new();
static TIME_FRAGMENT_RE: OnceLock<Regex> = OnceLock::new();

/// Category assigned to an uploaded image by filename inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileCategory {
    /// A food photo, possibly with a capture time parsed from the name.
    Food,
    /// Per-exercise workout detail screenshot.
    WorkoutSnapshot,
    /// Samsung Health daily summary screenshot or export.
    SHealth,
}

/// Classify a filename into (optional capture time, category).
///
/// Rules are evaluated in order; the first match wins. Date and time
/// fragments that fail to parse fall through to later rules rather than
/// erroring — filenames are user-controlled and frequently junk.
pub fn classify_filename(filename: &str) -> (Option<NaiveDateTime>, FileCategory) {
    classify_with_today(filename, Local::now().date_naive())
}

/// Same as [`classify_filename`] but with an injectable "today", so the
/// bare-time rule is testable without depending on the wall clock.
pub(crate) fn classify_with_today(
    filename: &str,
    today: chrono::NaiveDate,
) -> (Option<NaiveDateTime>, FileCategory) {
    // Rule 1: workout-detail screenshot markers.
    if WORKOUT_SNAPSHOT_MARKERS.iter().any(|m| filename.contains(m)) {
        return (None, FileCategory::WorkoutSnapshot);
    }

    // Rule 2: Samsung Health export marker.
    if filename.contains(S_HEALTH_MARKER) {
        return (None, FileCategory::SHealth);
    }

    // Rule 3: millisecond-epoch style names like "1769760746481.jpg".
    let epoch_re = EPOCH_NAME_RE.get_or_init(|| Regex::new(r"^\d{13}\.").unwrap());
    if epoch_re.is_match(filename) {
        return (None, FileCategory::SHealth);
    }

    // Rule 4: full date+time, e.g. "20240503_183012".
    let full_re = FULL_DATETIME_RE
        .get_or_init(|| Regex::new(r"(20\d{2})(\d{2})(\d{2})_(\d{6})").unwrap());
    if let Some(caps) = full_re.captures(filename) {
        let stamp = format!("{}{}{}{}", &caps[1], &caps[2], &caps[3], &caps[4]);
        if let Ok(dt) = NaiveDateTime::parse_from_str(&stamp, "%Y%m%d%H%M%S") {
            return (Some(dt), FileCategory::Food);
        }
        // Impossible month/day: fall through.
    }

    // Rule 5: bare time fragment, e.g. "_183012", combined with today.
    let time_re = TIME_FRAGMENT_RE.get_or_init(|| Regex::new(r"_(\d{6})").unwrap());
    if let Some(caps) = time_re.captures(filename) {
        let fragment = &caps[1];
        if let Ok(value) = fragment.parse::<u32>() {
            if value < MAX_TIME_FRAGMENT {
                if let Ok(time) = NaiveTime::parse_from_str(fragment, "%H%M%S") {
                    return (Some(NaiveDateTime::new(today, time)), FileCategory::Food);
                }
            }
        }
    }

    (None, FileCategory::Food)
}
