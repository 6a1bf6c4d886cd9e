#![forbid(unsafe_code)]

//! Plain-text rendering shared by the commands.

use std::fmt::Write as _;

use scalelab::{Factor, Lab, Pan, Side, Verdict};

pub fn factor_row(factor: &Factor) -> String {
    format!(
        "  {:<4} {:>+4}  {} {}  ({})",
        factor.id, factor.weight, factor.icon, factor.name, factor.description
    )
}

fn pan_ids(pan: &Pan) -> String {
    let ids: Vec<String> = pan
        .iter()
        .map(|p| format!("{}{}", p.factor.id, p.instance))
        .collect();
    format!("[{}]", ids.join(" "))
}

/// One line describing the scale, without the countdown.
pub fn status_line(lab: &Lab) -> String {
    let engine = lab.engine();
    let mut line = format!(
        "left={} ({:+}) right={} ({:+}) difference={:+} tilt={:+.1}° status={}",
        pan_ids(engine.pan(Side::Left)),
        engine.left_weight(),
        pan_ids(engine.pan(Side::Right)),
        engine.right_weight(),
        engine.difference(),
        engine.tilt_degrees(),
        lab.status().label(),
    );
    if let Some(phrase) = lab.conflicts().latest() {
        let _ = write!(line, " conflict=\"{phrase}\"");
    }
    line
}

pub fn verdict_block(verdict: &Verdict) -> String {
    format!(
        "{}\n  {}\n  => {}",
        verdict.title, verdict.description, verdict.advice
    )
}
