use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

fn demos_root() -> PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("demos")
}

fn run_agent(args: &[&str]) -> std::process::Output {
    let bin = env!("CARGO_BIN_EXE_dg-cli");
    Command::new(bin)
        .arg("agent")
        .args(args)
        .output()
        .expect("agent command should run")
}

fn parse_state_out(stdout: &str) -> Option<String> {
    stdout
        .lines()
        .find_map(|line| line.strip_prefix("STATE_OUT:").map(|v| v.to_string()))
        .filter(|value| value != "NONE")
}

fn temp_state(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("dg-cli-smoke-{}-{}.json", name, std::process::id()))
}

#[test]
fn agent_start_works_for_every_demo() {
    let mut demos = fs::read_dir(demos_root())
        .expect("demos dir should exist")
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect::<Vec<_>>();
    demos.sort();
    assert!(!demos.is_empty());

    for demo in demos {
        let name = demo
            .file_name()
            .expect("demo should have a name")
            .to_string_lossy()
            .to_string();
        let state = temp_state(&format!("start-{}", name));
        let output = run_agent(&[
            "start",
            "--scripts-dir",
            demo.to_str().expect("path should be utf-8"),
            "--state-out",
            state.to_str().expect("path should be utf-8"),
        ]);
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(output.status.success(), "start failed for {}: {}", name, stdout);
        assert!(stdout.contains("RESULT:OK"));
        assert!(stdout.contains("EVENT:LINE"), "{}: {}", name, stdout);
        assert!(stdout.contains(r#"NOTIFY_JSON:{"kind":"dialogueStarted""#));
        assert!(parse_state_out(&stdout).is_some());
    }
}

#[test]
fn agent_branching_flow_reaches_end() {
    let scenario = demos_root().join("02-branching-interrogation");
    let mut state = temp_state("branch-0");

    let start = run_agent(&[
        "start",
        "--scripts-dir",
        scenario.to_str().expect("path should be utf-8"),
        "--state-out",
        state.to_str().expect("path should be utf-8"),
    ]);
    assert!(start.status.success(), "start failed");
    assert!(String::from_utf8_lossy(&start.stdout).contains(r#"SPEAKER_JSON:"Inspector Hale""#));

    let steps: [(&[&str], &str); 7] = [
        (&["continue"], "EVENT:LINE"),
        (&["continue"], "EVENT:OPTIONS"),
        (&["select", "--side", "bottom"], r#"SPEAKER_JSON:"Maid""#),
        (&["continue"], r#"NOTIFY_JSON:{"kind":"dialogueStarted","name":"verdict"}"#),
        (&["flag", "--name", "suspect", "--value", "2"], "FLAG:suspect|2"),
        (&["continue"], r#"SPEAKER_JSON:"You""#),
        (&["continue"], "EVENT:END"),
    ];

    for (index, (command, expected)) in steps.iter().enumerate() {
        let next = temp_state(&format!("branch-{}", index + 1));
        let mut args = vec![command[0], "--state-in", state.to_str().expect("utf-8")];
        args.extend_from_slice(&command[1..]);
        args.extend_from_slice(&["--state-out", next.to_str().expect("utf-8")]);

        let output = run_agent(&args);
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(output.status.success(), "step {} failed: {}", index, stdout);
        assert!(stdout.contains(expected), "step {}: {}", index, stdout);
        state = next;
    }
}

#[test]
fn agent_select_without_options_reports_error_block() {
    let scenario = demos_root().join("01-linear-intro");
    let state = temp_state("select-error");
    let start = run_agent(&[
        "start",
        "--scripts-dir",
        scenario.to_str().expect("path should be utf-8"),
        "--state-out",
        state.to_str().expect("path should be utf-8"),
    ]);
    assert!(start.status.success());

    let output = run_agent(&[
        "select",
        "--state-in",
        state.to_str().expect("path should be utf-8"),
        "--side",
        "top",
        "--state-out",
        temp_state("select-error-out")
            .to_str()
            .expect("path should be utf-8"),
    ]);
    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("RESULT:ERROR"));
    assert!(stdout.contains("ERROR_CODE:CLI_OPTION_NOT_AVAILABLE"));
}

#[test]
fn tui_falls_back_to_line_mode_with_piped_stdin() {
    let scenario = demos_root().join("01-linear-intro");
    let state = temp_state("tui-line");
    let mut child = Command::new(env!("CARGO_BIN_EXE_dg-cli"))
        .args([
            "tui",
            "--scripts-dir",
            scenario.to_str().expect("path should be utf-8"),
            "--state-file",
            state.to_str().expect("path should be utf-8"),
        ])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("tui should spawn");

    child
        .stdin
        .take()
        .expect("stdin should be piped")
        .write_all(b"\n:save\n\n\n")
        .expect("input should be written");
    let output = child.wait_with_output().expect("tui should exit");
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "tui failed: {}", stdout);
    assert!(stdout.contains("Inspector Hale"));
    assert!(stdout.contains("saved: "));
    assert!(stdout.contains("[END]"));
    assert!(state.exists());
}
