use super::*;

impl DialogueMachine {
    pub fn set_script(&mut self, script: Arc<DialogueScript>) {
        self.script = Some(script);
    }

    pub fn start_with(&mut self, script: Arc<DialogueScript>) -> Result<(), DialogueError> {
        self.check_playable(&script)?;
        self.script = Some(script);
        self.start()
    }

    /// Rejects scripts that `start_with` would refuse, leaving the machine
    /// untouched.
    pub fn check_playable(&self, script: &DialogueScript) -> Result<(), DialogueError> {
        if script.entries.is_empty() {
            return Err(self.reject_start(DialogueError::new(
                "DIALOGUE_SCRIPT_EMPTY",
                format!("Dialogue \"{}\" has no entries.", script.name),
            )));
        }
        Ok(())
    }

    /// Starts the assigned script from its first entry. Any conversation in
    /// progress is replaced without an end notification.
    pub fn start(&mut self) -> Result<(), DialogueError> {
        let Some(script) = self.script.clone() else {
            return Err(self.reject_start(DialogueError::new(
                "DIALOGUE_SCRIPT_MISSING",
                "No dialogue script has been assigned.",
            )));
        };
        self.check_playable(&script)?;

        tracing::info!(dialogue = %script.name, entries = script.entries.len(), "start dialogue");
        self.typewriter.cancel();
        self.special_action = false;
        self.phase = DialoguePhase::Typing;
        self.surface.show_panel(true);
        self.outbox.push(DialogueEvent::DialogueStarted {
            name: script.name.clone(),
        });
        self.display_entry(0);
        Ok(())
    }

    /// Ends the conversation from outside, exactly like reaching the end.
    pub fn end_current(&mut self) {
        self.end();
    }

    pub(super) fn end(&mut self) {
        if !self.is_in_dialogue() {
            tracing::trace!(phase = ?self.phase, "end ignored outside a dialogue");
            return;
        }

        let name = self.script_name();
        tracing::info!(dialogue = %name, entry = self.entry_index, "end dialogue");
        self.phase = DialoguePhase::Ended;
        self.typewriter.cancel();
        self.surface.hide_options();
        self.surface.show_portrait(None);
        self.surface.show_panel(false);
        self.outbox.push(DialogueEvent::DialogueEnded { name });
    }

    fn reject_start(&self, error: DialogueError) -> DialogueError {
        tracing::error!(code = %error.code, "{}", error.message);
        error
    }
}
