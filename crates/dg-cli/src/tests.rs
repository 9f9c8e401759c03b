use super::*;
use crate::cli_test_support::*;
use dg_core::OptionSide;

fn start_args(demo: &str, state_out: &str) -> StartArgs {
    StartArgs {
        scripts_dir: demo_dir(demo),
        sequence: None,
        state_out: state_out.to_string(),
        overrides: OverrideArgs::default(),
    }
}

fn state_args(state_in: &str, state_out: &str) -> StateArgs {
    StateArgs {
        state_in: state_in.to_string(),
        state_out: state_out.to_string(),
    }
}

fn path_string(name: &str) -> String {
    temp_path(name).to_string_lossy().to_string()
}

#[test]
fn agent_commands_walk_branching_demo_through_saved_states() {
    let s1 = path_string("agent-branch-1.json");
    let s2 = path_string("agent-branch-2.json");
    let s3 = path_string("agent-branch-3.json");
    let s4 = path_string("agent-branch-4.json");
    let s5 = path_string("agent-branch-5.json");

    let code = run(Cli {
        command: Mode::Agent(AgentArgs {
            command: AgentCommand::Start(start_args("02-branching-interrogation", &s1)),
        }),
    })
    .expect("agent start should pass");
    assert_eq!(code, 0);

    agent::run_continue(state_args(&s1, &s2)).expect("continue to butler");
    agent::run_continue(state_args(&s2, &s3)).expect("continue to options");
    let options = load_player_state(std::path::Path::new(&s3)).expect("options state");
    let dialogue = options.snapshot.dialogue.expect("dialogue should be active");
    assert_eq!(dialogue.script_name, "interrogation");
    assert_eq!(dialogue.entry_index, 1);

    let error = agent::run_select(SelectArgs {
        state_in: s1.clone(),
        side: OptionSide::Top,
        state_out: s5.clone(),
    })
    .expect_err("selecting on a plain line should fail");
    assert_eq!(error.code, "CLI_OPTION_NOT_AVAILABLE");

    agent::run_select(SelectArgs {
        state_in: s3.clone(),
        side: OptionSide::Bottom,
        state_out: s4.clone(),
    })
    .expect("select bottom");
    agent::run_flag(FlagArgs {
        state_in: s4.clone(),
        name: "suspect".to_string(),
        value: -2,
        state_out: s5.clone(),
    })
    .expect("flag should pass");

    let flagged = load_player_state(std::path::Path::new(&s5)).expect("flag state");
    assert_eq!(flagged.snapshot.story_flags.get("suspect"), Some(&-2));
    assert_eq!(
        flagged.snapshot.dialogue.map(|dialogue| dialogue.entry_index),
        Some(3)
    );
}

#[test]
fn agent_skip_and_jump_cover_popups_and_range_errors() {
    let s1 = path_string("agent-briefing-1.json");
    let s2 = path_string("agent-briefing-2.json");
    let s3 = path_string("agent-briefing-3.json");

    agent::run_start(start_args("03-case-briefing", &s1)).expect("start briefing");

    let error = agent::run_jump(JumpArgs {
        state_in: s1.clone(),
        index: 9,
        state_out: s2.clone(),
    })
    .expect_err("jump past the end should fail");
    assert_eq!(error.code, "CLI_JUMP_OUT_OF_RANGE");

    agent::run_jump(JumpArgs {
        state_in: s1.clone(),
        index: 1,
        state_out: s2.clone(),
    })
    .expect("jump to evidence");
    let jumped = load_player_state(std::path::Path::new(&s2)).expect("jump state");
    assert_eq!(jumped.snapshot.cursor, 2);
    assert_eq!(
        jumped
            .snapshot
            .dialogue
            .map(|dialogue| dialogue.script_name),
        Some("evidence".to_string())
    );

    agent::run_skip(state_args(&s2, &s3)).expect("skip to popups");
    let popup_state = load_player_state(std::path::Path::new(&s3)).expect("popup state");
    assert!(popup_state.snapshot.all_scripts_complete);
    assert_eq!(popup_state.snapshot.popup.map(|popup| popup.index), Some(0));

    let end_state = path_string("agent-briefing-end.json");
    agent::run_skip(state_args(&s3, &end_state)).expect("skip popups");
    assert!(!std::path::Path::new(&end_state).exists());
}

#[test]
fn agent_continue_starts_next_dialogue_when_idle() {
    let s1 = path_string("agent-idle-1.json");
    let mut previous = s1.clone();
    agent::run_start(start_args("03-case-briefing", &s1)).expect("start briefing");

    for step in 0..4 {
        let next = path_string(&format!("agent-idle-step-{}.json", step));
        agent::run_continue(state_args(&previous, &next)).expect("continue should pass");
        previous = next;
    }

    let state = load_player_state(std::path::Path::new(&previous)).expect("state");
    assert_eq!(
        state.snapshot.dialogue.map(|dialogue| dialogue.script_name),
        Some("evidence".to_string())
    );
}

#[test]
fn start_overrides_are_persisted_with_the_state() {
    let s1 = path_string("agent-overrides.json");
    let mut args = start_args("01-linear-intro", &s1);
    args.overrides = OverrideArgs {
        typing_interval_ms: Some(0),
        no_auto_advance: true,
        no_popups: false,
    };
    agent::run_start(args).expect("start should pass");

    let state = load_player_state(std::path::Path::new(&s1)).expect("state");
    assert_eq!(state.overrides.typing_interval_ms, Some(0));
    assert_eq!(state.overrides.auto_advance, Some(false));
    assert_eq!(state.overrides.popups_after_dialogue, None);
}

#[test]
fn unknown_sequence_and_missing_state_surface_engine_codes() {
    let s1 = path_string("agent-unknown-sequence.json");
    let mut args = start_args("02-branching-interrogation", &s1);
    args.sequence = Some("epilogue".to_string());
    let error = agent::run_start(args).expect_err("unknown sequence should fail");
    assert_eq!(error.code, "API_SEQUENCE_NOT_FOUND");

    let error = agent::run_continue(state_args(&path_string("agent-missing.json"), &s1))
        .expect_err("missing state should fail");
    assert_eq!(error.code, "CLI_STATE_NOT_FOUND");
}

#[test]
fn run_cli_from_args_reports_parse_and_runtime_failures() {
    assert_ne!(run_cli_from_args(["dg-cli", "agent", "unknown"]), 0);
    assert_eq!(
        run_cli_from_args([
            "dg-cli",
            "agent",
            "continue",
            "--state-in",
            "/nonexistent/dg-cli-state.json",
            "--state-out",
            "/nonexistent/dg-cli-out.json",
        ]),
        1
    );

    let s1 = path_string("cli-from-args.json");
    let demo = demo_dir("01-linear-intro");
    assert_eq!(
        run_cli_from_args([
            "dg-cli",
            "agent",
            "start",
            "--scripts-dir",
            demo.as_str(),
            "--state-out",
            s1.as_str(),
        ]),
        0
    );
    assert!(std::path::Path::new(&s1).exists());
}
