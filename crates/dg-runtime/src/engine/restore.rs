use dg_core::{DialogueSnapshot, SnapshotPhase};

use super::*;

impl DialogueMachine {
    /// Snapshot of a conversation paused on input. `None` while nothing is
    /// active; an error while a reveal is still running.
    pub fn snapshot(&self) -> Result<Option<DialogueSnapshot>, DialogueError> {
        let phase = match self.phase {
            DialoguePhase::WaitingForInput => SnapshotPhase::WaitingForInput,
            DialoguePhase::ShowingOptions => SnapshotPhase::ShowingOptions,
            DialoguePhase::Typing => {
                return Err(DialogueError::new(
                    "SNAPSHOT_NOT_ALLOWED",
                    "snapshot() is not allowed while text is being revealed.",
                ));
            }
            DialoguePhase::NotStarted | DialoguePhase::Ended => return Ok(None),
        };

        Ok(Some(DialogueSnapshot {
            script_name: self.script_name(),
            entry_index: self.entry_index,
            fragment_index: self.fragment_index,
            phase,
            special_action: self.special_action,
        }))
    }

    /// Puts the machine back at a paused position without replaying the
    /// reveal, callbacks or notifications.
    pub fn restore(
        &mut self,
        script: Arc<DialogueScript>,
        snapshot: &DialogueSnapshot,
    ) -> Result<(), DialogueError> {
        let Some(entry) = script.entry(snapshot.entry_index).cloned() else {
            return Err(DialogueError::new(
                "SNAPSHOT_ENTRY_INVALID",
                format!(
                    "Entry {} is out of range for dialogue \"{}\".",
                    snapshot.entry_index, script.name
                ),
            ));
        };
        if snapshot.fragment_index >= entry.content.fragment_count() {
            return Err(DialogueError::new(
                "SNAPSHOT_ENTRY_INVALID",
                format!(
                    "Fragment {} is out of range for entry {} of dialogue \"{}\".",
                    snapshot.fragment_index, snapshot.entry_index, script.name
                ),
            ));
        }
        if snapshot.phase == SnapshotPhase::ShowingOptions && !entry.has_options() {
            return Err(DialogueError::new(
                "SNAPSHOT_ENTRY_INVALID",
                format!(
                    "Entry {} of dialogue \"{}\" has no options to show.",
                    snapshot.entry_index, script.name
                ),
            ));
        }

        self.script = Some(script);
        self.entry_index = snapshot.entry_index;
        self.fragment_index = snapshot.fragment_index;
        self.special_action = snapshot.special_action;

        let text = entry.content.fragment(snapshot.fragment_index).to_string();
        self.typewriter.show_complete(&text);
        self.surface.show_panel(true);
        self.surface.set_speaker_name(&entry.speaker);
        self.update_portrait(&entry);
        self.surface.set_content(&text);
        self.surface.hide_options();
        self.phase = DialoguePhase::WaitingForInput;
        if snapshot.phase == SnapshotPhase::ShowingOptions {
            self.show_options(&entry);
        }
        Ok(())
    }

    /// Clears the screen back to the not-started state. Unlike
    /// `end_current` nothing is published.
    pub fn reset(&mut self) {
        self.typewriter.cancel();
        self.surface.hide_options();
        self.surface.show_portrait(None);
        self.surface.show_panel(false);
        self.phase = DialoguePhase::NotStarted;
        self.entry_index = 0;
        self.fragment_index = 0;
        self.special_action = false;
        self.outbox.clear();
    }
}
