use dg_core::{
    DialogueEntry, DialogueError, DialogueScript, EntryContent, OptionPair, SpeakerKind,
};
use serde::Deserialize;

use crate::dialogue_xml::implicit_next;
use crate::xml_utils::is_valid_name;

/// On-disk shape of a `*.dialogue.json` script; `nextEntryIndex` may be
/// omitted and then follows the same default as XML sources.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawDialogue {
    pub name: String,
    #[serde(default)]
    pub entries: Vec<RawEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawEntry {
    #[serde(default)]
    pub speaker: String,
    #[serde(default, alias = "kind")]
    pub speaker_kind: SpeakerKind,
    #[serde(alias = "text", alias = "lines", default)]
    pub content: EntryContent,
    #[serde(default)]
    pub options: Option<OptionPair>,
    #[serde(default, alias = "next")]
    pub next_entry_index: Option<i32>,
}

pub(crate) fn compile_dialogue(
    file_path: &str,
    raw: RawDialogue,
) -> Result<DialogueScript, DialogueError> {
    let name = raw.name.trim().to_string();
    if !is_valid_name(&name) {
        return Err(DialogueError::new(
            "COMPILE_NAME_INVALID",
            format!(
                "Dialogue name \"{}\" in \"{}\" is not a valid identifier.",
                raw.name, file_path
            ),
        ));
    }
    if raw.entries.is_empty() {
        return Err(DialogueError::new(
            "COMPILE_SCRIPT_EMPTY",
            format!("Dialogue \"{}\" in \"{}\" has no entries.", name, file_path),
        ));
    }

    let count = raw.entries.len();
    let entries = raw
        .entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| DialogueEntry {
            speaker: entry.speaker,
            speaker_kind: entry.speaker_kind,
            content: entry.content,
            options: entry.options,
            next_entry_index: entry
                .next_entry_index
                .unwrap_or(implicit_next(index, count)),
        })
        .collect();

    Ok(DialogueScript { name, entries })
}
