use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Utc};

const LETTERS: i64 = 26;

/// Short correlation codes for error responses: `MMddHHmmss` (UTC) followed
/// by a letter `A`..`Z`.
///
/// Each code occupies a slot `epoch_seconds * 26 + letter`; slots only move
/// forward, so a burst of more than 26 codes in one second borrows letters
/// from the following second. The stamp carries no year: codes are unique
/// within a process for a year of uptime, then the same stamps come around.
#[derive(Debug, Default)]
pub struct ErrorCodeGenerator {
    last_slot: AtomicI64,
}

impl ErrorCodeGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generate(&self) -> String {
        self.generate_at(Utc::now().timestamp())
    }

    pub fn generate_at(&self, now_secs: i64) -> String {
        let floor = now_secs.saturating_mul(LETTERS);
        let next = |current: i64| current.saturating_add(1).max(floor);

        let slot = match self
            .last_slot
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                Some(next(current))
            }) {
            Ok(previous) | Err(previous) => next(previous),
        };

        format_slot(slot)
    }
}

fn format_slot(slot: i64) -> String {
    let secs = slot.div_euclid(LETTERS);
    let letter = char::from(b'A' + slot.rem_euclid(LETTERS) as u8);
    let stamp = DateTime::<Utc>::from_timestamp(secs, 0)
        .map_or_else(|| "0000000000".to_owned(), |t| t.format("%m%d%H%M%S").to_string());

    format!("{stamp}{letter}")
}
