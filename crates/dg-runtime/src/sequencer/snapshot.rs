use dg_core::{DialogueError, PopupSnapshot, SequencerSnapshot, StoryFlags};

use super::DialogueSequencer;

pub const SEQUENCER_SNAPSHOT_SCHEMA: &str = "sequencer.v1";

impl DialogueSequencer {
    /// Captures progress while the sequencer is waiting for input. Running
    /// reveals and fades must be finished first.
    pub fn snapshot(&self) -> Result<SequencerSnapshot, DialogueError> {
        if self.popup.is_fading() {
            return Err(DialogueError::new(
                "SNAPSHOT_NOT_ALLOWED",
                "snapshot() is not allowed while a popup is fading.",
            ));
        }
        let dialogue = self.machine.snapshot()?;
        let popup = self.popup.is_active().then(|| PopupSnapshot {
            index: self.popup.index(),
        });

        Ok(SequencerSnapshot {
            schema_version: SEQUENCER_SNAPSHOT_SCHEMA.to_string(),
            sequence_name: self.name.clone(),
            cursor: self.cursor,
            all_scripts_complete: self.all_scripts_complete,
            story_flags: self.story_flags.as_map().clone(),
            dialogue,
            popup,
        })
    }

    /// Restores a snapshot taken from a sequencer built with the same
    /// scripts. Nothing is published while restoring.
    pub fn resume(&mut self, snapshot: &SequencerSnapshot) -> Result<(), DialogueError> {
        if snapshot.schema_version != SEQUENCER_SNAPSHOT_SCHEMA {
            return Err(DialogueError::new(
                "SNAPSHOT_SCHEMA",
                format!(
                    "Unsupported snapshot schema \"{}\", expected \"{}\".",
                    snapshot.schema_version, SEQUENCER_SNAPSHOT_SCHEMA
                ),
            ));
        }
        if snapshot.sequence_name != self.name {
            return Err(DialogueError::new(
                "SNAPSHOT_SEQUENCE_MISMATCH",
                format!(
                    "Snapshot belongs to sequence \"{}\", not \"{}\".",
                    snapshot.sequence_name, self.name
                ),
            ));
        }
        if snapshot.cursor > self.scripts.len() {
            return Err(DialogueError::new(
                "SNAPSHOT_CURSOR_INVALID",
                format!(
                    "Cursor {} is past the {} scripts of sequence \"{}\".",
                    snapshot.cursor,
                    self.scripts.len(),
                    self.name
                ),
            ));
        }
        if let Some(popup) = &snapshot.popup {
            if popup.index >= self.popups.len() {
                return Err(DialogueError::new(
                    "SNAPSHOT_POPUP_INVALID",
                    format!("Popup {} does not exist in \"{}\".", popup.index, self.name),
                ));
            }
        }

        if let Some(dialogue) = &snapshot.dialogue {
            let Some(script) = self
                .scripts
                .iter()
                .find(|script| script.name == dialogue.script_name)
                .cloned()
            else {
                return Err(DialogueError::new(
                    "SNAPSHOT_SCRIPT_UNKNOWN",
                    format!(
                        "Dialogue \"{}\" is not part of sequence \"{}\".",
                        dialogue.script_name, self.name
                    ),
                ));
            };
            self.machine.restore(script, dialogue)?;
        } else {
            self.machine.reset();
        }

        self.cursor = snapshot.cursor;
        self.all_scripts_complete = snapshot.all_scripts_complete;
        self.story_flags = StoryFlags::from(snapshot.story_flags.clone());
        match &snapshot.popup {
            Some(popup) => {
                self.popup.restore_visible(self.popups.clone(), popup.index);
            }
            None => self.popup.reset(),
        }
        tracing::debug!(sequence = %self.name, cursor = self.cursor, "resumed sequencer");
        Ok(())
    }
}
