#![forbid(unsafe_code)]

//! The Lab: one balance-scale session as a runtime [`Model`].
//!
//! `Lab` ties the core state machines together. User messages mutate the
//! [`BalanceEngine`] and restart the inactivity countdown; the two periodic
//! behaviours (conflict phrases and the countdown) are *declared* from
//! state in [`Model::subscriptions`] and driven by whatever runtime owns the
//! Lab.
//!
//! # Subscription keys
//!
//! | Purpose    | Declared while        | Id                              |
//! |------------|-----------------------|---------------------------------|
//! | narrator   | status not balanced   | [`NARRATOR_SUB_ID`] (fixed)     |
//! | countdown  | timer running         | [`timer_sub_id`]`(generation)`  |
//!
//! The narrator id does not encode the overweight side, so flipping from
//! one side to the other keeps the interval phase. The countdown id changes
//! on every reset, so the runtime stops the old tick sequence before the
//! new one starts.

use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::Deserialize;

use scalelab_core::{
    BalanceEngine, CONFLICT_INTERVAL, ConflictBuffer, ConflictNarrator, Factor, InactivityTimer,
    InstanceId, Pan, PlacedFactor, Placement, Side, Status, TICK_INTERVAL, TimerEvent, Verdict,
    find_factor, synthesize,
};
use scalelab_runtime::{Cmd, Every, Model, SubId};

use crate::config::LabConfig;
use crate::msg::{Msg, Popup};
use crate::snapshot::LabSnapshot;

/// Subscription id of the conflict narrator interval.
pub const NARRATOR_SUB_ID: SubId = 0x4E41_5252;

const TIMER_SUB_TAG: SubId = 1 << 63;

/// Subscription id of the countdown for a given timer generation.
///
/// Always has the top bit set, so it never collides with [`NARRATOR_SUB_ID`].
#[must_use]
pub const fn timer_sub_id(generation: u64) -> SubId {
    TIMER_SUB_TAG | (generation & !TIMER_SUB_TAG)
}

/// Shape of a drag payload. Only the catalog id is trusted.
#[derive(Deserialize)]
struct DragPayload {
    id: String,
}

#[derive(Debug)]
pub struct Lab {
    engine: BalanceEngine,
    narrator: ConflictNarrator,
    timer: InactivityTimer,
    result_visible: bool,
    forces_info_open: bool,
    relations_info_open: bool,
    expirations: u32,
    rng: SmallRng,
}

impl Default for Lab {
    fn default() -> Self {
        Self::new()
    }
}

impl Lab {
    /// A fresh session with an OS-seeded phrase RNG.
    #[must_use]
    pub fn new() -> Self {
        Self::with_rng(SmallRng::from_os_rng())
    }

    /// A fresh session whose conflict phrases are reproducible.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(SmallRng::seed_from_u64(seed))
    }

    #[must_use]
    pub fn from_config(config: &LabConfig) -> Self {
        match config.seed {
            Some(seed) => Self::with_seed(seed),
            None => Self::new(),
        }
    }

    #[must_use]
    pub fn with_rng(rng: SmallRng) -> Self {
        Self {
            engine: BalanceEngine::new(),
            narrator: ConflictNarrator::new(),
            timer: InactivityTimer::new(),
            result_visible: false,
            forces_info_open: false,
            relations_info_open: false,
            expirations: 0,
            rng,
        }
    }

    // --- Commands ----------------------------------------------------------

    /// Drop `factor` onto `side`. Counts as activity even when rejected.
    pub fn place_factor(&mut self, factor: &'static Factor, side: Side) -> Placement {
        self.timer.reset();
        let placement = self.engine.place(factor, side);
        self.settle();
        placement
    }

    /// Take one placed instance off `side`. Counts as activity even when absent.
    pub fn remove_factor(&mut self, instance: InstanceId, side: Side) -> Option<PlacedFactor> {
        self.timer.reset();
        let removed = self.engine.remove(instance, side);
        self.settle();
        removed
    }

    /// Empty both pans, clear the conflict phrases and restart the countdown.
    ///
    /// Dialog flags are left alone; the result dialog only closes on
    /// [`Msg::CloseResult`].
    pub fn reset_all(&mut self) {
        self.engine.reset();
        self.narrator.clear();
        self.timer.reset();
        tracing::debug!(target: "scalelab.engine", "lab reset");
    }

    fn drop_by_id(&mut self, side: Side, factor_id: &str) -> Option<Placement> {
        match find_factor(factor_id) {
            Some(factor) => Some(self.place_factor(factor, side)),
            None => {
                self.timer.reset();
                tracing::debug!(
                    target: "scalelab.engine",
                    factor_id,
                    %side,
                    "drop ignored: unknown factor id"
                );
                None
            }
        }
    }

    fn drop_payload(&mut self, side: Side, payload: &str) -> Option<Placement> {
        match serde_json::from_str::<DragPayload>(payload) {
            Ok(decoded) => self.drop_by_id(side, &decoded.id),
            Err(err) => {
                self.timer.reset();
                tracing::debug!(
                    target: "scalelab.engine",
                    %side,
                    error = %err,
                    "drop ignored: malformed payload"
                );
                None
            }
        }
    }

    fn set_popup(&mut self, popup: Popup, open: bool) {
        match popup {
            Popup::ForcesInfo => self.forces_info_open = open,
            Popup::RelationsInfo => self.relations_info_open = open,
        }
        self.timer.reset();
    }

    fn on_inactivity_tick(&mut self) -> Cmd<Msg> {
        match self.timer.tick() {
            TimerEvent::Expired => {
                self.result_visible = true;
                self.expirations += 1;
                let verdict = self.verdict();
                Cmd::log(format!("inactivity timeout, showing result: {}", verdict.title))
            }
            TimerEvent::Ticked(_) | TimerEvent::Idle => Cmd::none(),
        }
    }

    fn settle(&mut self) {
        self.narrator.settle(self.engine.status());
    }

    // --- Reads -------------------------------------------------------------

    #[inline]
    pub fn engine(&self) -> &BalanceEngine {
        &self.engine
    }

    pub fn pan(&self, side: Side) -> &Pan {
        self.engine.pan(side)
    }

    pub fn difference(&self) -> i32 {
        self.engine.difference()
    }

    pub fn status(&self) -> Status {
        self.engine.status()
    }

    pub fn tilt_degrees(&self) -> f32 {
        self.engine.tilt_degrees()
    }

    /// Recent conflict phrases, newest first.
    pub fn conflicts(&self) -> &ConflictBuffer {
        self.narrator.buffer()
    }

    pub fn timer(&self) -> &InactivityTimer {
        &self.timer
    }

    /// Seconds until the result dialog opens on its own; zero once it has.
    pub fn remaining(&self) -> u32 {
        self.timer.remaining()
    }

    pub fn is_result_visible(&self) -> bool {
        self.result_visible
    }

    /// Times the countdown has run out in this session.
    pub fn expirations(&self) -> u32 {
        self.expirations
    }

    pub fn is_open(&self, popup: Popup) -> bool {
        match popup {
            Popup::ForcesInfo => self.forces_info_open,
            Popup::RelationsInfo => self.relations_info_open,
        }
    }

    pub fn open_popups(&self) -> Vec<Popup> {
        Popup::ALL.into_iter().filter(|p| self.is_open(*p)).collect()
    }

    /// Verdict for the current pans. Always computable, shown or not.
    pub fn verdict(&self) -> &'static Verdict {
        synthesize(
            self.engine.left().len(),
            self.engine.right().len(),
            self.engine.difference(),
        )
    }

    pub fn snapshot(&self) -> LabSnapshot {
        LabSnapshot::capture(self)
    }
}

impl Model for Lab {
    type Message = Msg;

    fn init(&mut self) -> Cmd<Msg> {
        tracing::debug!(target: "scalelab.engine", "lab session started");
        Cmd::none()
    }

    fn update(&mut self, msg: Msg) -> Cmd<Msg> {
        let before = self.engine.status();
        let cmd = match msg {
            Msg::Drop { side, factor_id } => {
                self.drop_by_id(side, &factor_id);
                Cmd::none()
            }
            Msg::DropPayload { side, payload } => {
                self.drop_payload(side, &payload);
                Cmd::none()
            }
            Msg::Remove { side, instance } => {
                self.remove_factor(instance, side);
                Cmd::none()
            }
            Msg::Reset => {
                self.reset_all();
                Cmd::none()
            }
            Msg::OpenInfo(popup) => {
                self.set_popup(popup, true);
                Cmd::none()
            }
            Msg::CloseInfo(popup) => {
                self.set_popup(popup, false);
                Cmd::none()
            }
            Msg::CloseResult => {
                self.result_visible = false;
                self.timer.reset();
                Cmd::none()
            }
            Msg::InactivityTick => self.on_inactivity_tick(),
            Msg::ConflictTick => {
                self.narrator.narrate(self.engine.status(), &mut self.rng);
                Cmd::none()
            }
        };

        let after = self.engine.status();
        if before != after {
            tracing::debug!(
                target: "scalelab.engine",
                from = ?before,
                to = ?after,
                difference = self.engine.difference(),
                "status changed"
            );
        }
        self.settle();
        cmd
    }

    fn subscriptions(&self) -> Vec<Every<Msg>> {
        let mut subs = Vec::with_capacity(2);
        if !self.engine.status().is_balanced() {
            subs.push(Every::with_id(NARRATOR_SUB_ID, CONFLICT_INTERVAL, || {
                Msg::ConflictTick
            }));
        }
        if !self.timer.is_expired() {
            subs.push(Every::with_id(
                timer_sub_id(self.timer.generation()),
                TICK_INTERVAL,
                || Msg::InactivityTick,
            ));
        }
        subs
    }
}
