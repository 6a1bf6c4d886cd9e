#![forbid(unsafe_code)]

//! Elm-style model/update runtime.
//!
//! The program runtime separates state (Model) from its drivers and
//! provides a command pattern for side effects. A model never schedules
//! timers itself; it declares them through [`Model::subscriptions`] and the
//! runtime starts and stops them.
//!
//! # Example
//!
//! ```ignore
//! use scalelab_runtime::{Cmd, Every, Model};
//! use std::time::Duration;
//!
//! struct Countdown {
//!     left: u32,
//! }
//!
//! enum Msg {
//!     Tick,
//!     Restart,
//! }
//!
//! impl Model for Countdown {
//!     type Message = Msg;
//!
//!     fn update(&mut self, msg: Self::Message) -> Cmd<Self::Message> {
//!         match msg {
//!             Msg::Tick => { self.left = self.left.saturating_sub(1); Cmd::none() }
//!             Msg::Restart => { self.left = 10; Cmd::none() }
//!         }
//!     }
//!
//!     fn subscriptions(&self) -> Vec<Every<Self::Message>> {
//!         if self.left > 0 {
//!             vec![Every::new(Duration::from_secs(1), || Msg::Tick)]
//!         } else {
//!             vec![]
//!         }
//!     }
//! }
//! ```

use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Duration;

use web_time::Instant;

use crate::cancellation::CancellationToken;
use crate::simulator::ProgramSimulator;
use crate::subscription::Every;

/// The Model trait defines application state and behavior.
pub trait Model: Sized {
    /// The message type for this model.
    ///
    /// Messages represent actions that update the model state, whether
    /// they come from the user or from a subscription tick.
    type Message: Send + 'static;

    /// Initialize the model with startup commands.
    ///
    /// Called once when the program starts.
    fn init(&mut self) -> Cmd<Self::Message> {
        Cmd::none()
    }

    /// Update the model in response to a message.
    ///
    /// This is the core state transition function. Returns commands
    /// for any side effects that should be executed.
    fn update(&mut self, msg: Self::Message) -> Cmd<Self::Message>;

    /// Periodic sources that should be live in the current state.
    ///
    /// Called after every update. Ids that stay the same keep running;
    /// ids that disappear are stopped.
    fn subscriptions(&self) -> Vec<Every<Self::Message>> {
        Vec::new()
    }
}

/// Commands represent side effects to be executed by the runtime.
#[derive(Debug)]
pub enum Cmd<M> {
    /// No operation.
    None,
    /// Stop the program.
    Quit,
    /// Execute multiple commands in order; stops early on `Quit`.
    Batch(Vec<Cmd<M>>),
    /// Execute commands sequentially.
    Sequence(Vec<Cmd<M>>),
    /// Send a message to the model.
    Msg(M),
    /// Record a line in the program log.
    Log(String),
}

impl<M> Cmd<M> {
    /// Create a no-op command.
    #[inline]
    pub fn none() -> Self {
        Self::None
    }

    /// Create a quit command.
    #[inline]
    pub fn quit() -> Self {
        Self::Quit
    }

    /// Create a message command.
    #[inline]
    pub fn msg(m: M) -> Self {
        Self::Msg(m)
    }

    /// Create a log command.
    #[inline]
    pub fn log(msg: impl Into<String>) -> Self {
        Self::Log(msg.into())
    }

    /// Create a batch of commands.
    pub fn batch(cmds: Vec<Self>) -> Self {
        Self::collapse(cmds, Self::Batch)
    }

    /// Create a sequence of commands.
    pub fn sequence(cmds: Vec<Self>) -> Self {
        Self::collapse(cmds, Self::Sequence)
    }

    fn collapse(mut cmds: Vec<Self>, wrap: fn(Vec<Self>) -> Self) -> Self {
        cmds.retain(|c| !matches!(c, Self::None));
        match cmds.len() {
            0 => Self::None,
            1 => cmds.pop().unwrap_or(Self::None),
            _ => wrap(cmds),
        }
    }

    #[inline]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

impl<M> Default for Cmd<M> {
    fn default() -> Self {
        Self::None
    }
}

/// Upper bound on how long the wall-clock loop blocks waiting for input.
const POLL_CEILING: Duration = Duration::from_millis(250);

/// Wall-clock driver.
///
/// Feeds messages from a channel into a [`ProgramSimulator`] whose virtual
/// clock is pinned to real elapsed time, so subscriptions fire on schedule.
/// The loop ends when the channel disconnects, the token is cancelled, or
/// the model quits; subscriptions are disposed on the way out.
pub struct Program<M: Model> {
    sim: ProgramSimulator<M>,
    started: Instant,
}

impl<M: Model> Program<M> {
    pub fn new(model: M) -> Self {
        Self {
            sim: ProgramSimulator::new(model),
            started: Instant::now(),
        }
    }

    /// Run until the inbox closes, `cancel` fires, or the model quits.
    ///
    /// `on_change` is called with the model after every message or batch of
    /// ticks that was applied. Returns the final model.
    pub fn run<F>(mut self, inbox: Receiver<M::Message>, cancel: CancellationToken, mut on_change: F) -> M
    where
        F: FnMut(&M),
    {
        self.started = Instant::now();
        self.sim.init();
        on_change(self.sim.model());

        while self.sim.is_running() && !cancel.is_cancelled() {
            let elapsed = self.started.elapsed();
            if self.sim.advance_to(elapsed) > 0 {
                on_change(self.sim.model());
            }

            let wait = self
                .sim
                .next_due()
                .map_or(POLL_CEILING, |due| due.saturating_sub(elapsed))
                .min(POLL_CEILING);

            match inbox.recv_timeout(wait) {
                Ok(msg) => {
                    self.sim.advance_to(self.started.elapsed());
                    self.sim.send(msg);
                    on_change(self.sim.model());
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    tracing::debug!(target: "scalelab.runtime", "inbox closed");
                    break;
                }
            }
        }

        if cancel.is_cancelled() {
            tracing::debug!(target: "scalelab.runtime", "program cancelled");
        }
        self.sim.dispose();
        self.sim.into_model()
    }
}
