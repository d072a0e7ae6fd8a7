//! Runs the `chat-probe` binary and checks what lands on stdout and stderr.

use std::process::{Command, Output};

const EXPECTED_REPORT: &str = "status 200\n\
                               json: {\"reply\":\"You said: hello from debug\"}\n\
                               \n\
                               --- Response text ---\n\
                               {\"reply\":\"You said: hello from debug\"}\n";

fn run_chat_probe(rust_log: Option<&str>) -> Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_chat-probe"));
    command.env("NO_COLOR", "1");
    match rust_log {
        Some(filter) => command.env("RUST_LOG", filter),
        None => command.env_remove("RUST_LOG"),
    };
    command.output().expect("failed to run chat-probe")
}

#[test]
fn test_stdout_is_only_the_report() {
    let output = run_chat_probe(Some("debug"));

    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout).unwrap(), EXPECTED_REPORT);

    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Registered route: POST /chat"));
    assert!(stderr.contains("Probe response: status 200"));
}

#[test]
fn test_log_filter_does_not_change_stdout() {
    let quiet = run_chat_probe(None);
    let verbose = run_chat_probe(Some("trace"));

    assert!(quiet.status.success());
    assert!(verbose.status.success());
    assert_eq!(quiet.stdout, verbose.stdout);
    assert!(quiet.stderr.is_empty());
    assert!(!verbose.stderr.is_empty());
}
