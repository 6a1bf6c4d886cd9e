#![forbid(unsafe_code)]

//! Line-oriented session scripts.
//!
//! One command per line; blank lines and `#` comments are skipped.
//!
//! ```text
//! drop left l-2            # catalog id onto a pan
//! payload right {"id":"q-4"}
//! remove left 1            # instance id, `#1` also accepted
//! open forces              # or: close relations
//! close-result
//! reset
//! wait 1500ms              # or 20s, 1.5s, or bare seconds
//! tick inactivity          # deliver a tick by hand
//! snapshot                 # print the current state as JSON
//! ```

use std::fmt;
use std::time::Duration;

use scalelab::{InstanceId, Msg, Popup, Side};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Send(Msg),
    Wait(Duration),
    Snapshot,
}

/// A parsed step and the 1-based line it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptLine {
    pub line: usize,
    pub step: Step,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("line {line}: {message}")]
pub struct ScriptError {
    pub line: usize,
    pub message: String,
}

pub fn parse(text: &str) -> Result<Vec<ScriptLine>, ScriptError> {
    let mut out = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        match parse_line(raw) {
            Ok(Some(step)) => out.push(ScriptLine { line, step }),
            Ok(None) => {}
            Err(message) => return Err(ScriptError { line, message }),
        }
    }
    Ok(out)
}

/// Parse one line. `Ok(None)` for blanks and comments.
pub fn parse_line(raw: &str) -> Result<Option<Step>, String> {
    let line = strip_comment(raw).trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (verb, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(v, r)| (v, r.trim()));

    let step = match verb.to_ascii_lowercase().as_str() {
        "drop" => {
            let (side, id) = two_args(rest, "drop <side> <factor-id>")?;
            Step::Send(Msg::drop_factor(parse_side(side)?, id))
        }
        "payload" => {
            let (side, json) = rest
                .split_once(char::is_whitespace)
                .ok_or("usage: payload <side> <json>")?;
            Step::Send(Msg::DropPayload {
                side: parse_side(side)?,
                payload: json.trim().to_string(),
            })
        }
        "remove" => {
            let (side, instance) = two_args(rest, "remove <side> <instance>")?;
            Step::Send(Msg::Remove {
                side: parse_side(side)?,
                instance: parse_instance(instance)?,
            })
        }
        "reset" => no_args(rest, "reset", Step::Send(Msg::Reset))?,
        "open" => Step::Send(Msg::OpenInfo(parse_popup(rest)?)),
        "close" => Step::Send(Msg::CloseInfo(parse_popup(rest)?)),
        "close-result" => no_args(rest, "close-result", Step::Send(Msg::CloseResult))?,
        "wait" => Step::Wait(parse_duration(rest)?),
        "tick" => match rest {
            "inactivity" => Step::Send(Msg::InactivityTick),
            "conflict" => Step::Send(Msg::ConflictTick),
            other => return Err(format!("unknown tick {other:?} (inactivity|conflict)")),
        },
        "snapshot" => no_args(rest, "snapshot", Step::Snapshot)?,
        other => return Err(format!("unknown command {other:?}")),
    };
    Ok(Some(step))
}

fn strip_comment(raw: &str) -> &str {
    // Payload JSON may legitimately contain '#', so only a '#' that starts
    // a token opens a comment.
    let is_remove = raw
        .split_whitespace()
        .next()
        .is_some_and(|verb| verb.eq_ignore_ascii_case("remove"));
    let bytes = raw.as_bytes();
    let mut token = 0;
    for (i, b) in bytes.iter().enumerate() {
        let starts_token = i == 0 || bytes[i - 1].is_ascii_whitespace();
        if !starts_token || b.is_ascii_whitespace() {
            continue;
        }
        if *b == b'#' {
            // `remove <side> #3` names an instance.
            let instance =
                is_remove && token == 2 && bytes.get(i + 1).is_some_and(u8::is_ascii_digit);
            if !instance {
                return &raw[..i];
            }
        }
        token += 1;
    }
    raw
}

fn two_args<'a>(rest: &'a str, usage: &str) -> Result<(&'a str, &'a str), String> {
    let mut parts = rest.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(a), Some(b), None) => Ok((a, b)),
        _ => Err(format!("usage: {usage}")),
    }
}

fn no_args(rest: &str, verb: &str, step: Step) -> Result<Step, String> {
    if rest.is_empty() {
        Ok(step)
    } else {
        Err(format!("{verb} takes no arguments"))
    }
}

fn parse_side(s: &str) -> Result<Side, String> {
    s.parse::<Side>().map_err(|err| err.to_string())
}

fn parse_popup(s: &str) -> Result<Popup, String> {
    s.parse::<Popup>()
}

fn parse_instance(s: &str) -> Result<InstanceId, String> {
    s.trim_start_matches('#')
        .parse::<u64>()
        .map(InstanceId::from_raw)
        .map_err(|_| format!("invalid instance id {s:?}"))
}

/// Longest single `wait` a script may ask for.
pub const MAX_WAIT: Duration = Duration::from_secs(24 * 60 * 60);

pub fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    let invalid = || format!("invalid duration {s:?} (e.g. 1500ms, 20s)");
    let duration = if let Some(ms) = s.strip_suffix("ms") {
        ms.trim().parse::<u64>().map(Duration::from_millis).map_err(|_| invalid())?
    } else {
        let secs = s.strip_suffix('s').unwrap_or(s).trim();
        let value = secs.parse::<f64>().map_err(|_| invalid())?;
        Duration::try_from_secs_f64(value).map_err(|_| invalid())?
    };
    if duration > MAX_WAIT {
        return Err(format!("wait {s:?} exceeds the {}s limit", MAX_WAIT.as_secs()));
    }
    Ok(duration)
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Send(msg) => match msg {
                Msg::Drop { side, factor_id } => write!(f, "drop {side} {factor_id}"),
                Msg::DropPayload { side, payload } => write!(f, "payload {side} {payload}"),
                Msg::Remove { side, instance } => write!(f, "remove {side} {}", instance.get()),
                Msg::Reset => f.write_str("reset"),
                Msg::OpenInfo(popup) => write!(f, "open {popup}"),
                Msg::CloseInfo(popup) => write!(f, "close {popup}"),
                Msg::CloseResult => f.write_str("close-result"),
                Msg::InactivityTick => f.write_str("tick inactivity"),
                Msg::ConflictTick => f.write_str("tick conflict"),
            },
            Self::Wait(d) => write!(f, "wait {}ms", d.as_millis()),
            Self::Snapshot => f.write_str("snapshot"),
        }
    }
}
