use clap::{Args, Parser, Subcommand};
use dg_core::OptionSide;

use crate::RunOverrides;

#[derive(Debug, Parser)]
#[command(name = "dg-cli")]
#[command(about = "Casefile dialogue player")]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Mode,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Mode {
    Agent(AgentArgs),
    Tui(TuiArgs),
}

#[derive(Debug, Args)]
pub(crate) struct AgentArgs {
    #[command(subcommand)]
    pub(crate) command: AgentCommand,
}

#[derive(Debug, Subcommand)]
pub(crate) enum AgentCommand {
    Start(StartArgs),
    Continue(StateArgs),
    Select(SelectArgs),
    Skip(StateArgs),
    Jump(JumpArgs),
    Flag(FlagArgs),
}

#[derive(Debug, Clone, Copy, Default, Args)]
pub(crate) struct OverrideArgs {
    #[arg(long = "typing-interval-ms")]
    pub(crate) typing_interval_ms: Option<u64>,
    #[arg(long = "no-auto-advance")]
    pub(crate) no_auto_advance: bool,
    #[arg(long = "no-popups")]
    pub(crate) no_popups: bool,
}

impl OverrideArgs {
    pub(crate) fn to_overrides(self) -> RunOverrides {
        RunOverrides {
            typing_interval_ms: self.typing_interval_ms,
            auto_advance: self.no_auto_advance.then_some(false),
            popups_after_dialogue: self.no_popups.then_some(false),
        }
    }
}

#[derive(Debug, Args)]
pub(crate) struct StartArgs {
    #[arg(long = "scripts-dir")]
    pub(crate) scripts_dir: String,
    #[arg(long = "sequence")]
    pub(crate) sequence: Option<String>,
    #[arg(long = "state-out")]
    pub(crate) state_out: String,
    #[command(flatten)]
    pub(crate) overrides: OverrideArgs,
}

#[derive(Debug, Args)]
pub(crate) struct StateArgs {
    #[arg(long = "state-in")]
    pub(crate) state_in: String,
    #[arg(long = "state-out")]
    pub(crate) state_out: String,
}

#[derive(Debug, Args)]
pub(crate) struct SelectArgs {
    #[arg(long = "state-in")]
    pub(crate) state_in: String,
    #[arg(long = "side", value_parser = parse_side)]
    pub(crate) side: OptionSide,
    #[arg(long = "state-out")]
    pub(crate) state_out: String,
}

#[derive(Debug, Args)]
pub(crate) struct JumpArgs {
    #[arg(long = "state-in")]
    pub(crate) state_in: String,
    #[arg(long = "index")]
    pub(crate) index: usize,
    #[arg(long = "state-out")]
    pub(crate) state_out: String,
}

#[derive(Debug, Args)]
pub(crate) struct FlagArgs {
    #[arg(long = "state-in")]
    pub(crate) state_in: String,
    #[arg(long = "name")]
    pub(crate) name: String,
    #[arg(long = "value", allow_hyphen_values = true)]
    pub(crate) value: i32,
    #[arg(long = "state-out")]
    pub(crate) state_out: String,
}

#[derive(Debug, Args)]
pub(crate) struct TuiArgs {
    #[arg(long = "scripts-dir")]
    pub(crate) scripts_dir: String,
    #[arg(long = "sequence")]
    pub(crate) sequence: Option<String>,
    #[arg(long = "state-file")]
    pub(crate) state_file: Option<String>,
    #[command(flatten)]
    pub(crate) overrides: OverrideArgs,
}

fn parse_side(raw: &str) -> Result<OptionSide, String> {
    OptionSide::parse(raw).ok_or_else(|| format!("expected top or bottom, got \"{}\"", raw))
}

#[cfg(test)]
mod cli_args_tests {
    use super::*;

    #[test]
    fn override_flags_map_to_run_overrides() {
        let cli = Cli::try_parse_from([
            "dg-cli",
            "agent",
            "start",
            "--scripts-dir",
            "demos/01-linear-intro",
            "--state-out",
            "/tmp/state.json",
            "--typing-interval-ms",
            "0",
            "--no-popups",
        ])
        .expect("args should parse");
        let Mode::Agent(AgentArgs {
            command: AgentCommand::Start(args),
        }) = cli.command
        else {
            panic!("expected agent start");
        };
        assert_eq!(
            args.overrides.to_overrides(),
            RunOverrides {
                typing_interval_ms: Some(0),
                auto_advance: None,
                popups_after_dialogue: Some(false),
            }
        );
    }

    #[test]
    fn select_side_accepts_names_and_rejects_others() {
        let cli = Cli::try_parse_from([
            "dg-cli", "agent", "select", "--state-in", "a", "--side", "Bottom", "--state-out", "b",
        ])
        .expect("args should parse");
        assert!(matches!(
            cli.command,
            Mode::Agent(AgentArgs {
                command: AgentCommand::Select(SelectArgs {
                    side: OptionSide::Bottom,
                    ..
                })
            })
        ));

        let error = Cli::try_parse_from([
            "dg-cli", "agent", "select", "--state-in", "a", "--side", "left", "--state-out", "b",
        ])
        .expect_err("unknown side should fail");
        assert!(error.to_string().contains("top or bottom"));
    }

    #[test]
    fn flag_value_accepts_negative_numbers() {
        let cli = Cli::try_parse_from([
            "dg-cli", "agent", "flag", "--state-in", "a", "--name", "trust", "--value", "-3",
            "--state-out", "b",
        ])
        .expect("args should parse");
        assert!(matches!(
            cli.command,
            Mode::Agent(AgentArgs {
                command: AgentCommand::Flag(FlagArgs { value: -3, .. })
            })
        ));
    }
}
