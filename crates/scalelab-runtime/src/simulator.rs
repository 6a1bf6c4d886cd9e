#![forbid(unsafe_code)]

//! Deterministic program driver on a virtual clock.
//!
//! `ProgramSimulator` runs a [`Model`] exactly as the wall-clock
//! [`Program`](crate::Program) would, except that time only moves when the
//! caller says so. Tests use it to step through countdowns and intervals
//! without sleeping.
//!
//! Ordering rules:
//! - `send` applies the message and every follow-up command before returning,
//!   then reconciles subscriptions once.
//! - `advance` fires due ticks strictly in due-time order; each tick is a
//!   full update followed by a reconcile, so a tick can stop or replace
//!   subscriptions that would otherwise have fired later in the same step.

use std::time::Duration;

use crate::program::{Cmd, Model};
use crate::subscription::{SubId, SubscriptionManager};

pub struct ProgramSimulator<M: Model> {
    model: M,
    subscriptions: SubscriptionManager<M::Message>,
    now: Duration,
    running: bool,
    logs: Vec<String>,
    processed: u64,
}

impl<M: Model> ProgramSimulator<M> {
    pub fn new(model: M) -> Self {
        Self {
            model,
            subscriptions: SubscriptionManager::new(),
            now: Duration::ZERO,
            running: true,
            logs: Vec::new(),
            processed: 0,
        }
    }

    /// Run `Model::init` and start the initial subscriptions.
    pub fn init(&mut self) {
        let cmd = self.model.init();
        self.execute(cmd);
        self.reconcile();
    }

    /// Apply one message. Ignored once the program has stopped.
    pub fn send(&mut self, msg: M::Message) {
        if !self.running {
            return;
        }
        self.dispatch(msg);
        self.reconcile();
    }

    pub fn send_all(&mut self, msgs: impl IntoIterator<Item = M::Message>) {
        for msg in msgs {
            self.send(msg);
        }
    }

    /// Move the clock forward by `dt`, firing due ticks. Returns how many fired.
    pub fn advance(&mut self, dt: Duration) -> usize {
        let target = self.now.saturating_add(dt);
        self.advance_to(target)
    }

    /// Move the clock to `target` (never backwards). Returns how many ticks fired.
    pub fn advance_to(&mut self, target: Duration) -> usize {
        let mut fired = 0;
        while self.running {
            let Some((due, msg)) = self.subscriptions.pop_due(target) else {
                break;
            };
            self.now = self.now.max(due);
            self.dispatch(msg);
            self.reconcile();
            fired += 1;
        }
        self.now = self.now.max(target);
        fired
    }

    /// Stop every subscription and the program. Nothing ticks afterwards.
    pub fn dispose(&mut self) {
        if self.running || !self.subscriptions.is_empty() {
            tracing::debug!(
                target: "scalelab.runtime",
                active = self.subscriptions.len(),
                processed = self.processed,
                "disposing program"
            );
        }
        self.subscriptions.stop_all();
        self.running = false;
    }

    #[inline]
    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn into_model(self) -> M {
        self.model
    }

    #[inline]
    pub fn now(&self) -> Duration {
        self.now
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn next_due(&self) -> Option<Duration> {
        self.subscriptions.next_due()
    }

    pub fn active_subscriptions(&self) -> Vec<SubId> {
        self.subscriptions.active_ids()
    }

    /// Lifetime count of subscriptions started.
    pub fn subscriptions_started(&self) -> u64 {
        self.subscriptions.started_total()
    }

    /// Lines emitted through `Cmd::Log`.
    pub fn logs(&self) -> &[String] {
        &self.logs
    }

    /// Messages applied so far, user and tick alike.
    pub fn processed(&self) -> u64 {
        self.processed
    }

    fn dispatch(&mut self, msg: M::Message) -> bool {
        self.processed += 1;
        let cmd = self.model.update(msg);
        self.execute(cmd)
    }

    /// Returns `false` once a `Quit` has been executed.
    fn execute(&mut self, cmd: Cmd<M::Message>) -> bool {
        match cmd {
            Cmd::None => true,
            Cmd::Quit => {
                tracing::debug!(target: "scalelab.runtime", "quit requested");
                self.running = false;
                false
            }
            Cmd::Msg(msg) => self.dispatch(msg),
            Cmd::Batch(cmds) | Cmd::Sequence(cmds) => {
                for cmd in cmds {
                    if !self.execute(cmd) {
                        return false;
                    }
                }
                true
            }
            Cmd::Log(line) => {
                tracing::info!(target: "scalelab.runtime", %line, "program log");
                self.logs.push(line);
                true
            }
        }
    }

    fn reconcile(&mut self) {
        if self.running {
            let declared = self.model.subscriptions();
            self.subscriptions.reconcile(declared, self.now);
        } else {
            self.subscriptions.stop_all();
        }
    }
}
