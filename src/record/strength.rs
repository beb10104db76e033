//! Per-set and total training volume.
//!
//! The model is told not to multiply by set index and not to merge sets,
//! but its arithmetic is still untrusted: the total is always recomputed
//! locally and overwrites whatever the model supplied.

use serde_json::Number;
use tracing::debug;

use super::{coerce_f64, DailyRecord};

/// Compute per-set volume (weight × reps) and the session total.
///
/// A set whose weight or reps cannot be read as a number contributes zero
/// and is kept; the failure is per-entry, never fatal. Returns the total.
pub fn aggregate_strength(record: &mut DailyRecord) -> f64 {
    let mut total = 0.0;

    if let Some(sets) = record.strength.sets.as_mut() {
        for entry in sets.iter_mut() {
            let volume = match (coerce_f64(&entry.weight), coerce_f64(&entry.reps)) {
                (Some(weight), Some(reps)) => weight * reps,
                _ => {
                    debug!(
                        "unreadable set entry for '{}': weight={}, reps={}",
                        entry.name.as_deref().unwrap_or("?"),
                        entry.weight,
                        entry.reps
                    );
                    0.0
                }
            };
            entry.volume = Some(volume);
            total += volume;
        }
    }

    record.strength.total_volume = Number::from_f64(total).or(Some(Number::from(0)));
    total
}
