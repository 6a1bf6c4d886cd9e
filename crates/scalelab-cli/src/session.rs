#![forbid(unsafe_code)]

//! `run`: replay a session script on the virtual clock.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use scalelab::{Lab, LabConfig, ProgramSimulator, Status, TimerState, Verdict};

use crate::error::{CliError, Result};
use crate::render::verdict_block;
use crate::script::{self, ScriptLine, Step};

#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    /// Script file, one command per line.
    pub script: PathBuf,
    /// Print the final summary as JSON.
    #[arg(long)]
    pub json: bool,
}

/// End-of-script state.
#[derive(Debug, Serialize)]
pub struct Summary {
    pub elapsed_ms: u64,
    pub left: Vec<&'static str>,
    pub right: Vec<&'static str>,
    pub difference: i32,
    pub status: Status,
    pub timer: TimerState,
    pub result_visible: bool,
    pub verdict: &'static Verdict,
    pub conflicts: Vec<&'static str>,
    /// Runtime log lines, in order.
    pub events: Vec<String>,
}

impl Summary {
    fn capture(sim: &ProgramSimulator<Lab>) -> Self {
        let lab = sim.model();
        let ids = |pan: &scalelab::Pan| -> Vec<&'static str> { pan.iter().map(|p| p.factor.id).collect() };
        Self {
            elapsed_ms: u64::try_from(sim.now().as_millis()).unwrap_or(u64::MAX),
            left: ids(lab.engine().left()),
            right: ids(lab.engine().right()),
            difference: lab.difference(),
            status: lab.status(),
            timer: lab.timer().state(),
            result_visible: lab.is_result_visible(),
            verdict: lab.verdict(),
            conflicts: lab.conflicts().to_vec(),
            events: sim.logs().to_vec(),
        }
    }
}

pub fn run_script_file(args: &RunArgs, config: &LabConfig, out: &mut dyn Write) -> Result<()> {
    let path = args.script.display().to_string();
    let text = std::fs::read_to_string(&args.script).map_err(|source| CliError::Read {
        path: path.clone(),
        source,
    })?;
    let script = script::parse(&text).map_err(|source| CliError::Script { path, source })?;
    let summary = execute(&script, config, out)?;
    write_summary(&summary, args.json, out)
}

/// Run parsed steps against a fresh Lab, writing `snapshot` output as it goes.
pub fn execute(script: &[ScriptLine], config: &LabConfig, out: &mut dyn Write) -> Result<Summary> {
    let mut sim = ProgramSimulator::new(Lab::from_config(config));
    sim.init();

    for ScriptLine { line, step } in script {
        tracing::debug!(target: "scalelab.cli", line, %step, "script step");
        match step {
            Step::Send(msg) => sim.send(msg.clone()),
            Step::Wait(dt) => {
                let fired = sim.advance(*dt);
                tracing::trace!(target: "scalelab.cli", line, fired, "clock advanced");
            }
            Step::Snapshot => {
                writeln!(out, "{}", sim.model().snapshot().to_json()?)?;
            }
        }
    }

    let summary = Summary::capture(&sim);
    sim.dispose();
    Ok(summary)
}

fn write_summary(summary: &Summary, json: bool, out: &mut dyn Write) -> Result<()> {
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(summary)?)?;
        return Ok(());
    }
    for event in &summary.events {
        writeln!(out, "event: {event}")?;
    }
    let timer = match summary.timer {
        TimerState::Running(left) => format!("{left}s left"),
        TimerState::Expired => "expired".to_string(),
    };
    writeln!(
        out,
        "t={:.3}s  difference={:+}  status={}  timer={timer}",
        summary.elapsed_ms as f64 / 1000.0,
        summary.difference,
        summary.status.label(),
    )?;
    if !summary.conflicts.is_empty() {
        writeln!(out, "conflicts: {}", summary.conflicts.join(" | "))?;
    }
    let shown = if summary.result_visible { "shown" } else { "not shown" };
    writeln!(out, "verdict ({shown}): {}", verdict_block(summary.verdict))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use scalelab::VerdictKind;

    fn run(text: &str) -> (Summary, String) {
        let script = script::parse(text).unwrap();
        let mut out = Vec::new();
        let config = LabConfig {
            seed: Some(11),
            ..LabConfig::default()
        };
        let summary = execute(&script, &config, &mut out).unwrap();
        (summary, String::from_utf8(out).unwrap())
    }

    #[test]
    fn idle_script_opens_result() {
        let (summary, _) = run("drop left l-2\nwait 20s\n");
        assert_eq!(summary.elapsed_ms, 20_000);
        assert!(summary.result_visible);
        assert_eq!(summary.timer, TimerState::Expired);
        assert_eq!(summary.verdict.kind, VerdictKind::RelationsObsolete);
        assert_eq!(summary.events.len(), 1);
        assert_eq!(summary.conflicts.len(), 4);
    }

    #[test]
    fn back_to_back_maximal_waits_complete() {
        let (summary, _) = run("wait 86400s\nwait 86400s\n");
        assert_eq!(summary.elapsed_ms, 2 * 86_400_000);
        assert!(summary.result_visible);
    }

    #[test]
    fn snapshot_lines_are_json() {
        let (_, out) = run("drop left l-6\nsnapshot\ndrop right q-4\nsnapshot\n");
        let docs: Vec<serde_json::Value> = out
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0]["difference"], 20);
        assert_eq!(docs[1]["difference"], -5);
        assert_eq!(docs[1]["status"], "balanced");
    }

    #[test]
    fn text_summary_mentions_verdict() {
        let (summary, _) = run("drop right q-2\n");
        let mut out = Vec::new();
        write_summary(&summary, false, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("difference=-45"), "{text}");
        assert!(text.contains("verdict (not shown)"), "{text}");
    }
}
