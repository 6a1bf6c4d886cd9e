#![forbid(unsafe_code)]

//! Messages accepted by [`Lab`](crate::Lab).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use scalelab_core::{InstanceId, Side};

/// Informational dialogs, one per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Popup {
    ForcesInfo,
    RelationsInfo,
}

impl Popup {
    pub const ALL: [Popup; 2] = [Popup::ForcesInfo, Popup::RelationsInfo];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ForcesInfo => "forces",
            Self::RelationsInfo => "relations",
        }
    }
}

impl fmt::Display for Popup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Popup {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "forces" | "llsx" | "left" => Ok(Self::ForcesInfo),
            "relations" | "qhsx" | "right" => Ok(Self::RelationsInfo),
            other => Err(format!("unknown popup {other:?} (expected forces or relations)")),
        }
    }
}

/// Everything that can change a [`Lab`](crate::Lab).
///
/// The first group comes from the user; `InactivityTick` and `ConflictTick`
/// are produced by the Lab's own subscriptions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Drop a catalog factor by id.
    Drop { side: Side, factor_id: String },
    /// Drop with the raw drag payload (`{"id": "l-2", ...}`).
    DropPayload { side: Side, payload: String },
    Remove { side: Side, instance: InstanceId },
    Reset,
    OpenInfo(Popup),
    CloseInfo(Popup),
    CloseResult,
    InactivityTick,
    ConflictTick,
}

impl Msg {
    pub fn drop_factor(side: Side, factor_id: impl Into<String>) -> Self {
        Self::Drop {
            side,
            factor_id: factor_id.into(),
        }
    }

    /// True for messages that count as user activity.
    pub const fn is_user_action(&self) -> bool {
        !matches!(self, Self::InactivityTick | Self::ConflictTick)
    }
}
