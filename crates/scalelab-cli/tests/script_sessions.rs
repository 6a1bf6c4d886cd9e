//! Script files run through the command dispatcher.

use std::path::Path;

use scalelab::LabConfig;
use scalelab_cli::session::RunArgs;
use scalelab_cli::{CliError, Commands, run};

fn run_file(path: &Path, json: bool) -> Result<String, CliError> {
    let mut out = Vec::new();
    let config = LabConfig {
        seed: Some(42),
        ..LabConfig::default()
    };
    run(
        Commands::Run(RunArgs {
            script: path.to_path_buf(),
            json,
        }),
        &config,
        &mut out,
    )?;
    Ok(String::from_utf8(out).expect("utf-8 output"))
}

fn write_script(dir: &tempfile::TempDir, body: &str) -> std::path::PathBuf {
    let path = dir.path().join("session.scale");
    std::fs::write(&path, body).expect("write script");
    path
}

#[test]
fn classroom_session_summary() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_script(
        &dir,
        "# a senior architect paid like an intern\n\
         drop left l-2\n\
         drop right q-1\n\
         wait 3s\n\
         open relations\n\
         close relations\n\
         wait 20s\n",
    );

    let summary: serde_json::Value = serde_json::from_str(&run_file(&path, true).unwrap()).unwrap();
    assert_eq!(summary["difference"], 35);
    assert_eq!(summary["status"], "relations_lagging");
    assert_eq!(summary["result_visible"], true);
    assert_eq!(summary["verdict"]["kind"], "relations_obsolete");
    assert_eq!(summary["elapsed_ms"], 23_000);
    assert_eq!(summary["left"], serde_json::json!(["l-2"]));
    assert_eq!(summary["conflicts"].as_array().unwrap().len(), 4);
}

#[test]
fn removing_by_instance_and_rebalancing() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_script(
        &dir,
        "drop left l-3\n\
         drop left l-1\n\
         drop right q-6\n\
         remove left #2\n\
         snapshot\n",
    );
    let out = run_file(&path, false).unwrap();
    let snapshot: serde_json::Value =
        serde_json::from_str(out.lines().next().unwrap()).unwrap();
    assert_eq!(snapshot["difference"], 5);
    assert_eq!(snapshot["status"], "balanced");
    assert!(out.contains("verdict (not shown)"), "{out}");
    assert!(out.contains("ĐIỂM CÂN BẰNG LÝ TƯỞNG"), "{out}");
}

#[test]
fn bad_line_reports_file_and_line() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_script(&dir, "drop left l-2\nteleport left\n");
    let err = run_file(&path, false).unwrap_err();
    assert_eq!(err.exit_code(), scalelab_cli::error::EXIT_SCRIPT);
    let message = err.to_string();
    assert!(message.contains("session.scale"), "{message}");
    assert!(message.contains("line 2"), "{message}");
}
