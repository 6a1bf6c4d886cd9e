#![forbid(unsafe_code)]

//! Core: the factor catalog and the balance state machine.
//!
//! # Role in Scale Lab
//! `scalelab-core` is the pure domain layer. It knows which factors exist,
//! how they are placed on the two pans, how the imbalance is classified, and
//! what verdict a given state earns. It owns no clock and spawns nothing;
//! the runtime (`scalelab-runtime`) decides *when* ticks happen and the
//! facade (`scalelab`) wires ticks to these state machines.
//!
//! # Primary responsibilities
//! - **Catalog**: the two static factor lists and the informational facts.
//! - **BalanceEngine**: left/right pans, aggregate weights, difference, tilt.
//! - **Status**: discrete classification of the difference.
//! - **ConflictNarrator**: side-specific phrase pools and the rolling buffer.
//! - **InactivityTimer**: the countdown state machine.
//! - **Verdict**: the four canned result records.

pub mod balance;
pub mod catalog;
pub mod narrator;
pub mod pan;
pub mod status;
pub mod timer;
pub mod verdict;

pub use balance::{BalanceEngine, Placement};
pub use catalog::{
    Category, Fact, Factor, facts, find_factor, forces_factors, relations_factors,
};
pub use narrator::{
    CONFLICT_BUFFER_CAPACITY, CONFLICT_INTERVAL, ConflictBuffer, ConflictNarrator,
    FORCES_OVERWEIGHT_PHRASES, RELATIONS_OVERWEIGHT_PHRASES, phrase_pool, pick_phrase,
};
pub use pan::{InstanceId, Pan, ParseSideError, PlacedFactor, Side};
pub use status::{IMBALANCE_THRESHOLD, Status};
pub use timer::{COUNTDOWN_START, InactivityTimer, TICK_INTERVAL, TimerEvent, TimerState};
pub use verdict::{Verdict, VerdictKind, synthesize};
