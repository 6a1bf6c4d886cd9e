#![forbid(unsafe_code)]

//! Serializable read model for rendering surfaces.

use serde::Serialize;

use scalelab_core::{PlacedFactor, Status, TimerState, Verdict};

use crate::lab::Lab;
use crate::msg::Popup;

/// Everything a renderer needs to draw one frame of the scale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabSnapshot {
    pub left: Vec<PlacedFactor>,
    pub right: Vec<PlacedFactor>,
    pub left_weight: i32,
    pub right_weight: i32,
    pub difference: i32,
    pub status: Status,
    pub status_label: &'static str,
    /// Beam rotation; positive tilts down on the left.
    pub tilt_degrees: f32,
    /// Newest first.
    pub conflicts: Vec<&'static str>,
    pub timer: TimerState,
    pub remaining: u32,
    pub result_visible: bool,
    pub verdict: &'static Verdict,
    pub open_popups: Vec<Popup>,
}

impl LabSnapshot {
    pub fn capture(lab: &Lab) -> Self {
        let engine = lab.engine();
        let status = engine.status();
        Self {
            left: engine.left().as_slice().to_vec(),
            right: engine.right().as_slice().to_vec(),
            left_weight: engine.left_weight(),
            right_weight: engine.right_weight(),
            difference: engine.difference(),
            status,
            status_label: status.label(),
            tilt_degrees: engine.tilt_degrees(),
            conflicts: lab.conflicts().to_vec(),
            timer: lab.timer().state(),
            remaining: lab.remaining(),
            result_visible: lab.is_result_visible(),
            verdict: lab.verdict(),
            open_popups: lab.open_popups(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::msg::Msg;
    use scalelab_core::Side;
    use scalelab_runtime::Model;

    #[test]
    fn empty_lab_serializes() {
        let json: serde_json::Value =
            serde_json::from_str(&Lab::with_seed(0).snapshot().to_json().unwrap()).unwrap();
        assert_eq!(json["status"], "balanced");
        assert_eq!(json["verdict"]["kind"], "absolute_stagnation");
        assert_eq!(json["timer"]["state"], "running");
        assert_eq!(json["timer"]["remaining"], 20);
        assert_eq!(json["left"].as_array().map(Vec::len), Some(0));
    }

    #[test]
    fn placed_factors_carry_instance_and_catalog_fields() {
        let mut lab = Lab::with_seed(0);
        lab.update(Msg::drop_factor(Side::Left, "l-2"));
        let snap = lab.snapshot();
        assert_eq!(snap.difference, 40);
        assert_eq!(snap.status, Status::RelationsLagging);
        assert!(snap.tilt_degrees > 0.0);

        let json: serde_json::Value = serde_json::from_str(&snap.to_json().unwrap()).unwrap();
        assert_eq!(json["left"][0]["factor"]["id"], "l-2");
        assert_eq!(json["left"][0]["factor"]["weight"], 40);
        assert!(json["left"][0]["instance"].is_u64());
    }
}
