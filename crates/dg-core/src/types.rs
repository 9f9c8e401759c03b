use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::DialogueConfig;

/// Next-index sentinel that always terminates the dialogue.
pub const END_OF_SCRIPT: i32 = -1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSpan {
    pub start: SourceLocation,
    pub end: SourceLocation,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeakerKind {
    #[default]
    Narrator,
    Npc,
    Player,
}

impl SpeakerKind {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "narrator" => Some(Self::Narrator),
            "npc" => Some(Self::Npc),
            "player" => Some(Self::Player),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Narrator => "narrator",
            Self::Npc => "npc",
            Self::Player => "player",
        }
    }
}

/// Entry text: a single line, or the older multi-fragment form where each
/// fragment is revealed on its own "continue".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntryContent {
    Line(String),
    Fragments(Vec<String>),
}

impl EntryContent {
    pub fn fragment_count(&self) -> usize {
        match self {
            Self::Line(_) => 1,
            Self::Fragments(fragments) => fragments.len().max(1),
        }
    }

    pub fn fragment(&self, index: usize) -> &str {
        match self {
            Self::Line(text) => text.as_str(),
            Self::Fragments(fragments) => fragments.get(index).map(String::as_str).unwrap_or(""),
        }
    }
}

impl Default for EntryContent {
    fn default() -> Self {
        Self::Line(String::new())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionSide {
    Top,
    Bottom,
}

impl OptionSide {
    /// Wire index carried by the option-selected notification.
    pub fn index(&self) -> u8 {
        match self {
            Self::Top => 0,
            Self::Bottom => 1,
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "top" | "0" => Some(Self::Top),
            "bottom" | "1" => Some(Self::Bottom),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogueOption {
    pub text: String,
    pub next_entry_index: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionPair {
    pub top: DialogueOption,
    pub bottom: DialogueOption,
}

impl OptionPair {
    pub fn get(&self, side: OptionSide) -> &DialogueOption {
        match side {
            OptionSide::Top => &self.top,
            OptionSide::Bottom => &self.bottom,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogueEntry {
    pub speaker: String,
    #[serde(default)]
    pub speaker_kind: SpeakerKind,
    pub content: EntryContent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<OptionPair>,
    pub next_entry_index: i32,
}

impl DialogueEntry {
    pub fn has_options(&self) -> bool {
        self.options.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueScript {
    pub name: String,
    pub entries: Vec<DialogueEntry>,
}

impl DialogueScript {
    pub fn entry(&self, index: usize) -> Option<&DialogueEntry> {
        self.entries.get(index)
    }

    /// Maps a stored next-index to an entry position. Negative values and
    /// anything past the last entry mean "end of script".
    pub fn resolve_target(&self, target: i32) -> Option<usize> {
        if target < 0 {
            return None;
        }
        let index = target as usize;
        (index < self.entries.len()).then_some(index)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopupSpec {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SequenceManifest {
    pub name: String,
    pub scripts: Vec<String>,
    #[serde(default)]
    pub popups: Vec<PopupSpec>,
    #[serde(default)]
    pub config: DialogueConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SnapshotPhase {
    WaitingForInput,
    ShowingOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogueSnapshot {
    pub script_name: String,
    pub entry_index: usize,
    pub fragment_index: usize,
    pub phase: SnapshotPhase,
    pub special_action: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopupSnapshot {
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SequencerSnapshot {
    pub schema_version: String,
    pub sequence_name: String,
    pub cursor: usize,
    pub all_scripts_complete: bool,
    pub story_flags: BTreeMap<String, i32>,
    pub dialogue: Option<DialogueSnapshot>,
    pub popup: Option<PopupSnapshot>,
}
