use super::*;

impl DialogueMachine {
    /// Resolves a stored target: a valid index displays that entry, anything
    /// else ends the conversation.
    pub(super) fn go_to(&mut self, target: i32) {
        let resolved = self
            .script
            .as_ref()
            .and_then(|script| script.resolve_target(target));
        match resolved {
            Some(index) => self.display_entry(index),
            None => self.end(),
        }
    }

    pub(super) fn display_entry(&mut self, index: usize) {
        let Some(entry) = self
            .script
            .as_ref()
            .and_then(|script| script.entry(index))
            .cloned()
        else {
            self.end();
            return;
        };

        self.entry_index = index;
        self.fragment_index = 0;
        self.surface.set_speaker_name(&entry.speaker);
        self.update_portrait(&entry);
        self.surface.hide_options();
        self.begin_typing(entry.content.fragment(0));
        self.callbacks.invoke(index);
    }

    pub(super) fn begin_typing(&mut self, text: &str) {
        self.phase = DialoguePhase::Typing;
        self.surface.set_content("");
        let step = self.typewriter.start(text);
        self.apply_step(step);
    }

    pub(super) fn show_options(&mut self, entry: &DialogueEntry) {
        let Some(options) = &entry.options else {
            return;
        };
        self.surface
            .show_options(&options.top.text, &options.bottom.text);
        self.phase = DialoguePhase::ShowingOptions;
    }

    pub(super) fn update_portrait(&mut self, entry: &DialogueEntry) {
        if entry.speaker_kind != SpeakerKind::Npc {
            self.surface.show_portrait(None);
            return;
        }

        match self.portraits.resolve(&entry.speaker) {
            Some(portrait) => self.surface.show_portrait(Some(&portrait)),
            None => {
                tracing::warn!(speaker = %entry.speaker, "portrait not found");
                self.surface.show_portrait(None);
            }
        }
    }
}
