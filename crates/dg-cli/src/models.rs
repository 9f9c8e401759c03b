use std::collections::BTreeMap;
use std::path::PathBuf;

use dg_api::ConfigOverrides;
use dg_core::{DialogueEvent, PopupSpec, SequencerSnapshot};
use serde::{Deserialize, Serialize};

pub(crate) const PLAYER_STATE_SCHEMA: &str = "dg-player-state.v1";
pub(crate) const SCRIPTS_DIR_REF_PREFIX: &str = "scripts-dir:";

#[derive(Debug, Clone)]
pub(crate) struct LoadedScenario {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) root: PathBuf,
    pub(crate) sources: BTreeMap<String, String>,
}

/// Command-line config overrides, persisted with the player state so a
/// resumed session keeps the same pacing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RunOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) typing_interval_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) auto_advance: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) popups_after_dialogue: Option<bool>,
}

impl RunOverrides {
    pub(crate) fn to_config_overrides(self) -> ConfigOverrides {
        ConfigOverrides {
            typing_interval_ms: self.typing_interval_ms,
            auto_advance: self.auto_advance,
            popups_after_dialogue: self.popups_after_dialogue,
            ..ConfigOverrides::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PlayerState {
    pub(crate) schema_version: String,
    pub(crate) scenario_id: String,
    #[serde(default)]
    pub(crate) overrides: RunOverrides,
    pub(crate) snapshot: SequencerSnapshot,
}

/// What the player is looking at once every reveal and fade has settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BoundaryEvent {
    Line,
    Options,
    Popup,
    Idle,
    End,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct BoundaryResult {
    pub(crate) event: BoundaryEvent,
    pub(crate) notifications: Vec<DialogueEvent>,
    pub(crate) speaker: Option<String>,
    pub(crate) portrait: Option<String>,
    pub(crate) text: Option<String>,
    pub(crate) options: Option<(String, String)>,
    pub(crate) popup: Option<PopupSpec>,
    pub(crate) flags: BTreeMap<String, i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TuiCommandAction {
    NotHandled,
    Continue,
    RefreshBoundary,
    Quit,
}

pub(crate) struct TuiCommandContext<'a> {
    pub(crate) state_file: &'a str,
    pub(crate) scenario: &'a LoadedScenario,
    pub(crate) sequence: Option<&'a str>,
    pub(crate) overrides: RunOverrides,
}
