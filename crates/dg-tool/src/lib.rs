mod case;
mod runner;
mod source;

pub use case::{TestAction, TestCase, TESTCASE_SCHEMA_V1};
pub use runner::{assert_case, run_case, RunReport};
pub use source::{read_dialogue_sources_from_dir, read_test_case};

use std::collections::BTreeMap;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DgToolError {
    #[error("Failed to read file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse testcase {path}: {source}")]
    ParseCase {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Invalid testcase schema version \"{found}\", expected \"{expected}\".")]
    InvalidSchemaVersion { expected: String, found: String },
    #[error("No .dialogue.xml/.dialogue.json/.sequence.xml files under {path}.")]
    SourceEmpty { path: PathBuf },
    #[error("Engine error: {0}")]
    Engine(#[from] dg_core::DialogueError),
    #[error("Action {action_index} ({kind}) was rejected by the sequencer.")]
    ActionRejected { action_index: usize, kind: String },
    #[error("Expected event count {expected}, actual {actual}. observed={observed}")]
    EventCountMismatch {
        expected: usize,
        actual: usize,
        observed: String,
    },
    #[error("Event mismatch at index {index}. expected={expected} actual={actual}")]
    EventMismatch {
        index: usize,
        expected: String,
        actual: String,
    },
    #[error("Story flags mismatch. expected={expected:?} actual={actual:?}")]
    FlagsMismatch {
        expected: BTreeMap<String, i32>,
        actual: BTreeMap<String, i32>,
    },
    #[error("Expected all_scripts_complete={expected}, actual {actual}.")]
    CompletionMismatch { expected: bool, actual: bool },
    #[error("Failed to serialize event for diff: {0}")]
    EventSerialize(serde_json::Error),
}
