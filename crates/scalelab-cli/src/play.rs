#![forbid(unsafe_code)]

//! `play`: an interactive session on the wall clock.
//!
//! A reader thread turns stdin lines into [`Msg`]s and feeds them to a
//! [`Program`] on the main thread. The session ends on `quit`, on end of
//! input, or when the reader cancels.

use std::io::{BufRead, Write};
use std::sync::mpsc::{self, Sender};
use std::thread;

use clap::Args;

use scalelab::{CancellationSource, Lab, LabConfig, Msg, Program};

use crate::error::{CliError, Result};
use crate::render::{status_line, verdict_block};
use crate::script::{Step, parse_line};

#[derive(Debug, Clone, Default, Args)]
pub struct PlayArgs {
    /// Print a JSON snapshot on every change instead of a status line.
    #[arg(long)]
    pub json: bool,
}

/// What the reader does with one input line.
#[derive(Debug, PartialEq, Eq)]
enum Input {
    Forward(Msg),
    Skip,
    Reject(String),
    Quit,
}

fn classify(line: &str) -> Input {
    if matches!(line.trim(), "quit" | "exit" | "q") {
        return Input::Quit;
    }
    match parse_line(line) {
        Ok(Some(Step::Send(msg))) => Input::Forward(msg),
        Ok(Some(Step::Wait(_))) => {
            Input::Reject("wait is only meaningful in scripts; time runs by itself here".into())
        }
        Ok(Some(Step::Snapshot)) => {
            Input::Reject("use --json to print snapshots on every change".into())
        }
        Ok(None) => Input::Skip,
        Err(message) => Input::Reject(message),
    }
}

/// Forward parsed lines until `quit`, end of input, or a closed inbox.
///
/// Returns the number of messages forwarded. Rejections are written to
/// `errors`.
fn pump<R: BufRead, E: Write>(
    input: R,
    tx: Sender<Msg>,
    source: CancellationSource,
    mut errors: E,
) -> usize {
    let mut forwarded = 0;
    for line in input.lines() {
        let Ok(line) = line else {
            break;
        };
        match classify(&line) {
            Input::Quit => {
                source.cancel();
                break;
            }
            Input::Forward(msg) => {
                if tx.send(msg).is_err() {
                    break;
                }
                forwarded += 1;
            }
            Input::Reject(message) => {
                let _ = writeln!(errors, "? {message}");
            }
            Input::Skip => {}
        }
    }
    tracing::debug!(target: "scalelab.cli", forwarded, "input closed");
    forwarded
}

pub fn run_play(args: &PlayArgs, config: &LabConfig, out: &mut dyn Write) -> Result<()> {
    let (tx, rx) = mpsc::channel();
    let source = CancellationSource::new();
    let token = source.token();

    writeln!(
        out,
        "scale lab: drop <side> <id> | remove <side> <n> | reset | open/close <forces|relations> | close-result | quit"
    )?;

    let reader = thread::spawn(move || {
        let stdin = std::io::stdin();
        pump(stdin.lock(), tx, source, std::io::stderr())
    });

    let mut last_line = String::new();
    let mut result_shown = false;
    let mut write_error = None;
    let json = args.json;

    let lab = Program::new(Lab::from_config(config)).run(rx, token, |lab: &Lab| {
        if write_error.is_some() {
            return;
        }
        let written = if json {
            lab.snapshot()
                .to_json()
                .map_err(CliError::from)
                .and_then(|doc| writeln!(out, "{doc}").map_err(CliError::from))
        } else {
            render_change(lab, &mut last_line, &mut result_shown, out)
        };
        if let Err(err) = written {
            write_error = Some(err);
        }
    });

    if reader.join().is_err() {
        tracing::warn!(target: "scalelab.cli", "stdin reader panicked");
    }
    if let Some(err) = write_error {
        return Err(err);
    }
    writeln!(out, "final verdict: {}", verdict_block(lab.verdict()))?;
    Ok(())
}

fn render_change(
    lab: &Lab,
    last_line: &mut String,
    result_shown: &mut bool,
    out: &mut dyn Write,
) -> Result<()> {
    let line = status_line(lab);
    if line != *last_line {
        writeln!(out, "{line}")?;
        *last_line = line;
    }
    let visible = lab.is_result_visible();
    if visible && !*result_shown {
        writeln!(out, "-- no activity for 20s --\n{}", verdict_block(lab.verdict()))?;
    }
    *result_shown = visible;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use scalelab::Side;
    use std::io::Cursor;

    #[test]
    fn pump_forwards_until_quit() {
        let input = Cursor::new("drop left l-2\nbogus\n\nwait 2s\nquit\ndrop left l-1\n");
        let (tx, rx) = mpsc::channel();
        let source = CancellationSource::new();
        let token = source.token();
        let mut errors = Vec::new();

        let forwarded = pump(input, tx, source, &mut errors);

        assert_eq!(forwarded, 1);
        assert!(token.is_cancelled());
        let got: Vec<Msg> = rx.try_iter().collect();
        assert_eq!(got, vec![Msg::drop_factor(Side::Left, "l-2")]);
        let errors = String::from_utf8(errors).unwrap();
        assert_eq!(errors.lines().count(), 2, "{errors}");
    }

    #[test]
    fn pump_stops_at_end_of_input_without_cancel() {
        let (tx, rx) = mpsc::channel();
        let source = CancellationSource::new();
        let token = source.token();
        let forwarded = pump(Cursor::new("reset\nopen forces\n"), tx, source, std::io::sink());
        assert_eq!(forwarded, 2);
        assert!(!token.is_cancelled());
        assert_eq!(rx.try_iter().count(), 2);
    }

    #[test]
    fn render_change_prints_result_once() {
        let mut lab = Lab::with_seed(0);
        let mut last = String::new();
        let mut shown = false;
        let mut out = Vec::new();

        render_change(&lab, &mut last, &mut shown, &mut out).unwrap();
        render_change(&lab, &mut last, &mut shown, &mut out).unwrap();
        for _ in 0..20 {
            scalelab::Model::update(&mut lab, Msg::InactivityTick);
        }
        render_change(&lab, &mut last, &mut shown, &mut out).unwrap();
        render_change(&lab, &mut last, &mut shown, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches("left=").count(), 1, "{text}");
        assert_eq!(text.matches("no activity").count(), 1, "{text}");
    }
}
