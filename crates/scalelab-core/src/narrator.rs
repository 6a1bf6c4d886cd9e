#![forbid(unsafe_code)]

//! Conflict narrator: floating phrases emitted while the scale is out of
//! balance.
//!
//! The narrator itself is clock-free. Whoever owns the schedule calls
//! [`ConflictNarrator::narrate`] once per interval and
//! [`ConflictNarrator::settle`] after every state change. The random source
//! is always passed in, so a seeded generator gives a reproducible stream.

use std::collections::VecDeque;
use std::time::Duration;

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::Serialize;

use crate::status::Status;

/// Interval between two phrases while in conflict.
pub const CONFLICT_INTERVAL: Duration = Duration::from_millis(1500);

/// Number of phrases kept for display.
pub const CONFLICT_BUFFER_CAPACITY: usize = 4;

/// Shouted when forces outweigh relations.
pub const FORCES_OVERWEIGHT_PHRASES: [&str; 4] =
    ["Chảy máu chất xám!", "Nhảy việc!", "Hệ thống lạc hậu!", "Bất mãn!"];

/// Shouted when relations outweigh forces.
pub const RELATIONS_OVERWEIGHT_PHRASES: [&str; 4] =
    ["Lãng phí!", "Cồng kềnh!", "Ảo tưởng!", "Bệnh hình thức!"];

/// Phrase pool for a status; empty when balanced.
#[must_use]
pub fn phrase_pool(status: Status) -> &'static [&'static str] {
    match status {
        Status::Balanced => &[],
        Status::RelationsLagging => &FORCES_OVERWEIGHT_PHRASES,
        Status::RelationsFormalistic => &RELATIONS_OVERWEIGHT_PHRASES,
    }
}

/// Pick one phrase uniformly from the pool for `status`.
pub fn pick_phrase<R: Rng + ?Sized>(status: Status, rng: &mut R) -> Option<&'static str> {
    phrase_pool(status).choose(rng).copied()
}

/// Most recent phrases, newest first, bounded to [`CONFLICT_BUFFER_CAPACITY`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ConflictBuffer {
    phrases: VecDeque<&'static str>,
}

impl ConflictBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, phrase: &'static str) {
        self.phrases.push_front(phrase);
        self.phrases.truncate(CONFLICT_BUFFER_CAPACITY);
    }

    pub fn clear(&mut self) {
        self.phrases.clear();
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    #[must_use]
    pub fn latest(&self) -> Option<&'static str> {
        self.phrases.front().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.phrases.iter().copied()
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<&'static str> {
        self.phrases.iter().copied().collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConflictNarrator {
    buffer: ConflictBuffer,
}

impl ConflictNarrator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit one phrase for the current status and record it.
    ///
    /// Returns `None` (and records nothing) when balanced.
    pub fn narrate<R: Rng + ?Sized>(&mut self, status: Status, rng: &mut R) -> Option<&'static str> {
        let phrase = pick_phrase(status, rng)?;
        self.buffer.push(phrase);
        tracing::trace!(target: "scalelab.narrator", phrase, ?status, "conflict phrase");
        Some(phrase)
    }

    /// Drop all phrases once the scale is balanced again.
    pub fn settle(&mut self, status: Status) {
        if status.is_balanced() && !self.buffer.is_empty() {
            tracing::debug!(
                target: "scalelab.narrator",
                dropped = self.buffer.len(),
                "balance restored, conflict phrases cleared"
            );
            self.buffer.clear();
        }
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    #[inline]
    #[must_use]
    pub fn buffer(&self) -> &ConflictBuffer {
        &self.buffer
    }
}
