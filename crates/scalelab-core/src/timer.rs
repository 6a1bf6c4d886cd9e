#![forbid(unsafe_code)]

//! Inactivity countdown.
//!
//! `Running(n)` counts down once per [`TICK_INTERVAL`]. Any user action
//! calls [`InactivityTimer::reset`], which restarts at [`COUNTDOWN_START`]
//! and bumps the generation. Reaching zero moves to `Expired`, reported
//! exactly once; further ticks are ignored until the next reset.
//!
//! The generation is what the scheduler keys the tick sequence on: a new
//! generation means a new sequence, and the old one must be cancelled.

use std::time::Duration;

use serde::Serialize;

pub const COUNTDOWN_START: u32 = 20;
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "remaining", rename_all = "snake_case")]
pub enum TimerState {
    Running(u32),
    Expired,
}

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// Counted down; the payload is the new remaining value.
    Ticked(u32),
    /// Reached zero on this tick.
    Expired,
    /// Already expired; nothing changed.
    Idle,
}

#[derive(Debug, Clone)]
pub struct InactivityTimer {
    state: TimerState,
    generation: u64,
}

impl Default for InactivityTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl InactivityTimer {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: TimerState::Running(COUNTDOWN_START),
            generation: 0,
        }
    }

    /// Restart the countdown at [`COUNTDOWN_START`].
    pub fn reset(&mut self) {
        self.state = TimerState::Running(COUNTDOWN_START);
        self.generation = self.generation.wrapping_add(1);
        tracing::trace!(
            target: "scalelab.timer",
            generation = self.generation,
            "inactivity countdown restarted"
        );
    }

    pub fn tick(&mut self) -> TimerEvent {
        match self.state {
            TimerState::Running(remaining) => {
                let next = remaining.saturating_sub(1);
                if next == 0 {
                    self.state = TimerState::Expired;
                    tracing::debug!(
                        target: "scalelab.timer",
                        generation = self.generation,
                        "inactivity countdown expired"
                    );
                    TimerEvent::Expired
                } else {
                    self.state = TimerState::Running(next);
                    TimerEvent::Ticked(next)
                }
            }
            TimerState::Expired => TimerEvent::Idle,
        }
    }

    #[inline]
    #[must_use]
    pub const fn state(&self) -> TimerState {
        self.state
    }

    /// Seconds left; zero once expired.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        match self.state {
            TimerState::Running(remaining) => remaining,
            TimerState::Expired => 0,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_expired(&self) -> bool {
        matches!(self.state, TimerState::Expired)
    }

    #[inline]
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }
}
