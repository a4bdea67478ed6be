//! Drives the built binaries end to end

use pretty_assertions::assert_eq;
use std::io::Write;
use std::process::{Command, Output};
use tempfile::NamedTempFile;

const KITCHENSINK: &str = env!("CARGO_BIN_EXE_kitchensink");
const EXCEPTION: &str = env!("CARGO_BIN_EXE_exception");

fn fast_config_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "poll_interval_ms = 1\ntick_interval_ms = 1\nnon_terminating_ticks = 2"
    )
    .unwrap();
    file
}

fn kitchensink(args: &[&str]) -> Output {
    let config = fast_config_file();
    Command::new(KITCHENSINK)
        .args(args)
        .env("KITCHENSINK_CONFIG", config.path())
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn stdout_lines(output: &Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn test_no_flags_prints_banner_and_goodbye() {
    let output = kitchensink(&[]);

    assert!(output.status.success());
    let lines = stdout_lines(&output);
    assert!(lines[0].starts_with("KitchenSink for Business! (rustc/"));
    assert_eq!(
        lines[1..].to_vec(),
        vec![
            "[Arguments] Running feature Arguments.".to_string(),
            "[Arguments] Parsing Arguments.".to_string(),
            "[Arguments] Finished feature Arguments.".to_string(),
            "Goodbye.".to_string(),
        ]
    );
}

#[test]
fn test_enabled_features_log_in_order() {
    let output = kitchensink(&["-fException", "-fCalling", "-fUnknown"]);

    assert!(output.status.success());
    let lines = stdout_lines(&output);
    let calling = lines.iter().position(|l| l == "[Calling] Recursion depth: 30").unwrap();
    let handled = lines.iter().position(|l| l == "[Exception] Handled result: 201").unwrap();
    assert!(calling < handled);
    assert!(lines.contains(&"[Arguments] Arg 3: -fUnknown".to_string()));
    assert_eq!(lines.last().map(String::as_str), Some("Goodbye."));
}

#[test]
fn test_double_dash_is_echoed_verbatim() {
    let output = kitchensink(&["--", "-fCalling"]);

    assert!(output.status.success());
    let lines = stdout_lines(&output);
    assert!(lines.contains(&"[Arguments] Count: 2".to_string()));
    assert!(lines.contains(&"[Arguments] Arg 1: --".to_string()));
    assert!(lines.contains(&"[Arguments] Arg 2: -fCalling".to_string()));
    assert!(lines.contains(&"[Calling] Recursion depth: 30".to_string()));
}

#[test]
fn test_threading_rendezvous_completes() {
    let output = kitchensink(&["-fThreading"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("[Threading] All threads running!"));
    assert!(stdout.contains("[Threading] All threads stopped. Peak running: 4."));
    for label in ["A-Blue", "B-Green", "C-Orange", "D-Red"] {
        assert!(stdout.contains(&format!("Ending thread {label}.")));
    }
}

#[test]
fn test_bounded_non_terminating_returns() {
    let output = kitchensink(&["-fNonTerminating"]);

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Loop bounded after 2 ticks."));
}

#[test]
fn test_unhandled_fault_exits_non_zero() {
    let output = kitchensink(&["-fUnhandledException", "-fCalling"]);

    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("[Calling] Recursion depth: 30"));
    assert!(stdout.contains("[UnhandledException] Raising unhandled fault."));
    assert!(!stdout.contains("Goodbye."));
}

#[test]
fn test_invalid_config_is_reported() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "poll_interval_ms = 0").unwrap();

    let output = Command::new(KITCHENSINK)
        .env("KITCHENSINK_CONFIG", file.path())
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("KITCHENSINK_CONFIG"));
}

#[test]
fn test_exception_handled_and_rethrow_finish() {
    let output = Command::new(EXCEPTION)
        .args(["-CallRaisedHandledException", "-CallRaisedReThrowException"])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(
        stdout_lines(&output),
        vec!["Start testing".to_string(), "Finish testing".to_string()]
    );
}

#[test]
fn test_exception_unhandled_never_finishes() {
    let output = Command::new(EXCEPTION)
        .arg("-CallRaisedUnhandledException")
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Start testing"));
    assert!(!stdout.contains("Finish testing"));
}
