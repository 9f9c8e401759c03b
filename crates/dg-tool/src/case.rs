use std::collections::BTreeMap;

use dg_core::{DialogueEvent, OptionSide};
use serde::{Deserialize, Serialize};

pub const TESTCASE_SCHEMA_V1: &str = "dg-tool-case.v1";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    pub schema_version: String,
    #[serde(default)]
    pub sequence: Option<String>,
    #[serde(default)]
    pub actions: Vec<TestAction>,
    #[serde(default)]
    pub expected_events: Vec<DialogueEvent>,
    #[serde(default)]
    pub expected_flags: Option<BTreeMap<String, i32>>,
    #[serde(default)]
    pub expected_all_scripts_complete: Option<bool>,
}

/// One scripted player or host input, applied in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TestAction {
    Continue,
    SelectOption { side: OptionSide },
    Tick { ms: u64 },
    Settle,
    CompleteTyping,
    StartNext,
    SkipRemaining,
    SkipPopups,
    JumpTo { index: usize },
    JumpToEntry { target: i32 },
    SetSpecialAction { enabled: bool },
    SetFlag { name: String, value: i32 },
}

impl TestAction {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Continue => "continue",
            Self::SelectOption { .. } => "selectOption",
            Self::Tick { .. } => "tick",
            Self::Settle => "settle",
            Self::CompleteTyping => "completeTyping",
            Self::StartNext => "startNext",
            Self::SkipRemaining => "skipRemaining",
            Self::SkipPopups => "skipPopups",
            Self::JumpTo { .. } => "jumpTo",
            Self::JumpToEntry { .. } => "jumpToEntry",
            Self::SetSpecialAction { .. } => "setSpecialAction",
            Self::SetFlag { .. } => "setFlag",
        }
    }
}
