use super::*;

impl DialogueMachine {
    /// Click/space handling: finishes a reveal, shows pending options or
    /// moves on to the next entry.
    pub fn handle_continue(&mut self) {
        if !self.is_in_dialogue() || self.special_action {
            tracing::trace!(
                phase = ?self.phase,
                special_action = self.special_action,
                "continue ignored"
            );
            return;
        }

        match self.phase {
            DialoguePhase::Typing => self.complete_typing(),
            DialoguePhase::WaitingForInput => self.advance(),
            _ => tracing::trace!(phase = ?self.phase, "continue ignored"),
        }
    }

    /// Returns whether the selection was accepted.
    pub fn select_option(&mut self, side: OptionSide) -> bool {
        if self.phase != DialoguePhase::ShowingOptions {
            tracing::trace!(phase = ?self.phase, side = side.as_str(), "select ignored");
            return false;
        }
        let Some(target) = self
            .current_entry()
            .and_then(|entry| entry.options.as_ref())
            .map(|options| options.get(side).next_entry_index)
        else {
            return false;
        };

        self.outbox.push(DialogueEvent::OptionSelected { side });
        self.surface.hide_options();
        self.go_to(target);
        true
    }

    /// Moves to `target` as if an option pointing there had been chosen.
    pub fn jump_to_entry(&mut self, target: i32) -> bool {
        if !self.is_in_dialogue() {
            tracing::trace!(target, "jump ignored outside a dialogue");
            return false;
        }
        self.surface.hide_options();
        self.go_to(target);
        true
    }

    /// Finishes the running reveal. The cursor does not move and options,
    /// if any, wait for the next continue.
    pub fn complete_typing(&mut self) {
        if self.phase != DialoguePhase::Typing {
            return;
        }
        let step = self.typewriter.skip();
        self.apply_step(step);
        self.phase = DialoguePhase::WaitingForInput;
    }

    pub fn tick(&mut self, delta: Duration) {
        if self.phase != DialoguePhase::Typing {
            return;
        }
        let step = self.typewriter.tick(delta);
        self.apply_step(step);
    }

    fn advance(&mut self) {
        let Some(entry) = self.current_entry().cloned() else {
            self.end();
            return;
        };

        if self.fragment_index + 1 < entry.content.fragment_count() {
            self.fragment_index += 1;
            self.begin_typing(entry.content.fragment(self.fragment_index));
            return;
        }

        if entry.has_options() {
            self.show_options(&entry);
            return;
        }

        self.go_to(entry.next_entry_index);
    }
}
