#![forbid(unsafe_code)]

//! Scale Lab public facade crate.
//!
//! A virtual balance scale for the production-forces / production-relations
//! lesson. Factors are dropped onto two pans, the beam tilts, conflict
//! phrases float up while the imbalance is too large, and after twenty idle
//! seconds a verdict dialog opens on its own.
//!
//! This crate re-exports the domain types from `scalelab-core` and the
//! runtime from `scalelab-runtime`, and adds the [`Lab`] state container
//! that joins them.
//!
//! ```
//! use scalelab::prelude::*;
//! use std::time::Duration;
//!
//! let mut sim = ProgramSimulator::new(Lab::with_seed(7));
//! sim.init();
//! sim.send(Msg::drop_factor(Side::Left, "l-2"));
//! assert_eq!(sim.model().status(), Status::RelationsLagging);
//!
//! sim.advance(Duration::from_secs(20));
//! assert!(sim.model().is_result_visible());
//! assert_eq!(sim.model().verdict().kind, VerdictKind::RelationsObsolete);
//! ```

use std::fmt;

pub mod config;
pub mod lab;
pub mod logging;
pub mod msg;
pub mod snapshot;

// --- Core re-exports -------------------------------------------------------

pub use scalelab_core::{
    BalanceEngine, Category, ConflictBuffer, Fact, Factor, IMBALANCE_THRESHOLD, InactivityTimer,
    InstanceId, Pan, PlacedFactor, Placement, Side, Status, TimerState, Verdict, VerdictKind,
    facts, find_factor, forces_factors, relations_factors, synthesize,
};

// --- Runtime re-exports ----------------------------------------------------

pub use scalelab_runtime::{
    CancellationSource, CancellationToken, Cmd, Every, Model, Program, ProgramSimulator,
};

// --- Facade types ------------------------------------------------------------

pub use config::{ConfigError, LabConfig, LogFormat, LoggingConfig};
pub use lab::{Lab, NARRATOR_SUB_ID, timer_sub_id};
pub use logging::LoggingError;
pub use msg::{Msg, Popup};
pub use snapshot::LabSnapshot;

// --- Errors ---------------------------------------------------------------

/// Top-level error type for Scale Lab hosts.
#[derive(Debug)]
pub enum Error {
    Config(ConfigError),
    Logging(LoggingError),
    /// Snapshot encoding failed.
    Json(serde_json::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::Logging(err) => write!(f, "{err}"),
            Self::Json(err) => write!(f, "snapshot encoding failed: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Logging(err) => Some(err),
            Self::Json(err) => Some(err),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<LoggingError> for Error {
    fn from(err: LoggingError) -> Self {
        Self::Logging(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

/// Standard result type for Scale Lab APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Cmd, Error, Lab, LabConfig, LabSnapshot, Model, Msg, Placement, Popup, Program,
        ProgramSimulator, Result, Side, Status, VerdictKind,
    };

    pub use crate::{core, runtime};
}

pub use scalelab_core as core;
pub use scalelab_runtime as runtime;
