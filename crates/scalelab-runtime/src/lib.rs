#![forbid(unsafe_code)]

//! Scale Lab Runtime
//!
//! A small Elm-style runtime: a [`Model`] owns all state, [`Model::update`]
//! is the only place state changes, and side effects come back out as
//! [`Cmd`] values. Periodic work is declared, not spawned: after every
//! update the runtime asks [`Model::subscriptions`] which [`Every`]
//! intervals should be live and reconciles the running set by id.
//!
//! # Key Components
//!
//! - [`Model`] - Trait for application state and behavior
//! - [`Cmd`] - Commands for side effects
//! - [`Every`] - Fixed-interval subscription
//! - [`ProgramSimulator`] - Deterministic driver on a virtual clock
//! - [`Program`] - Wall-clock driver fed from a channel
//! - [`CancellationSource`] - Cooperative stop signal for [`Program`]
//!
//! # Single-threaded by construction
//! Every message, whether it comes from the user or from a due
//! subscription, is applied to the model one at a time and all follow-up
//! commands run before the next message is looked at. A subscription that
//! is no longer declared is stopped before any replacement starts, so two
//! tick sequences for the same purpose never overlap.

pub mod cancellation;
pub mod program;
pub mod simulator;
pub mod subscription;

pub use cancellation::{CancellationSource, CancellationToken};
pub use program::{Cmd, Model, Program};
pub use simulator::ProgramSimulator;
pub use subscription::{Every, SubId, SubscriptionManager};
