use std::sync::Arc;
use std::time::Duration;

use dg_core::{
    DialogueConfig, DialogueError, DialogueEvent, DialogueScript, EventKind, OptionSide,
    PopupSpec, StoryFlags,
};

use crate::callbacks::CallbackPolicy;
use crate::engine::{DialogueMachine, DialogueMachineOptions};
use crate::event_bus::{EventBus, SubscriptionId};
use crate::popup::PopupSequencer;
use crate::surface::{DialogueSurface, PopupSurface, PortraitResolver};
use crate::typewriter::TypingSound;

mod snapshot;

pub use snapshot::SEQUENCER_SNAPSHOT_SCHEMA;

#[derive(Debug, Clone)]
pub struct SequencerOptions {
    pub name: String,
    pub scripts: Vec<Arc<DialogueScript>>,
    pub popups: Vec<PopupSpec>,
    pub config: DialogueConfig,
    pub callback_policy: CallbackPolicy,
}

/// Plays an ordered list of dialogue scripts and hands off to the popup
/// sequence once every script has finished.
pub struct DialogueSequencer {
    name: String,
    scripts: Vec<Arc<DialogueScript>>,
    popups: Vec<PopupSpec>,
    config: DialogueConfig,
    cursor: usize,
    all_scripts_complete: bool,
    story_flags: StoryFlags,
    machine: DialogueMachine,
    popup: PopupSequencer,
    bus: EventBus,
    event_log: Vec<DialogueEvent>,
}

impl std::fmt::Debug for DialogueSequencer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DialogueSequencer")
            .field("name", &self.name)
            .field("scripts", &self.scripts.len())
            .field("cursor", &self.cursor)
            .field("all_scripts_complete", &self.all_scripts_complete)
            .field("machine", &self.machine)
            .field("popup", &self.popup)
            .finish()
    }
}

impl DialogueSequencer {
    pub fn new(
        options: SequencerOptions,
        surface: Box<dyn DialogueSurface>,
        popup_surface: Box<dyn PopupSurface>,
    ) -> Self {
        let machine = DialogueMachine::new(
            surface,
            DialogueMachineOptions {
                typing_interval: options.config.typing_interval(),
                callback_policy: options.callback_policy,
            },
        );
        let popup = PopupSequencer::new(
            popup_surface,
            options.config.fade_in(),
            options.config.fade_out(),
        );
        Self {
            name: options.name,
            scripts: options.scripts,
            popups: options.popups,
            config: options.config,
            cursor: 0,
            all_scripts_complete: false,
            story_flags: StoryFlags::new(),
            machine,
            popup,
            bus: EventBus::new(),
            event_log: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &DialogueConfig {
        &self.config
    }

    pub fn scripts(&self) -> &[Arc<DialogueScript>] {
        &self.scripts
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn all_scripts_complete(&self) -> bool {
        self.all_scripts_complete
    }

    pub fn machine(&self) -> &DialogueMachine {
        &self.machine
    }

    pub fn popup(&self) -> &PopupSequencer {
        &self.popup
    }

    pub fn set_portrait_resolver(&mut self, portraits: Box<dyn PortraitResolver>) {
        self.machine.set_portrait_resolver(portraits);
    }

    pub fn set_typing_sound(&mut self, sound: Box<dyn TypingSound>) {
        self.machine.set_typing_sound(sound);
    }

    pub fn register_callback(&mut self, entry_index: usize, callback: impl FnMut() + 'static) {
        self.machine.register_callback(entry_index, callback);
    }

    pub fn remove_callback(&mut self, entry_index: usize) -> bool {
        self.machine.remove_callback(entry_index)
    }

    pub fn clear_callbacks(&mut self) {
        self.machine.clear_callbacks();
    }

    pub fn subscribe(
        &mut self,
        kind: EventKind,
        handler: impl FnMut(&DialogueEvent) + 'static,
    ) -> SubscriptionId {
        self.bus.subscribe(kind, handler)
    }

    pub fn subscribe_all(&mut self, handler: impl FnMut(&DialogueEvent) + 'static) -> SubscriptionId {
        self.bus.subscribe_all(handler)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(id)
    }

    /// Every event published since the last call, in order.
    pub fn drain_event_log(&mut self) -> Vec<DialogueEvent> {
        std::mem::take(&mut self.event_log)
    }

    pub fn set_story_flag(&mut self, name: impl Into<String>, value: i32) {
        self.story_flags.set(name, value);
    }

    pub fn story_flag(&self, name: &str, default_value: i32) -> i32 {
        self.story_flags.get(name, default_value)
    }

    pub fn story_flags(&self) -> &StoryFlags {
        &self.story_flags
    }

    /// Starts the script under the cursor, ending whatever is on screen
    /// first. Past the last script this completes the sequence.
    pub fn start_next(&mut self) -> Result<(), DialogueError> {
        let result = self.start_next_inner();
        self.pump();
        result
    }

    pub fn skip_remaining(&mut self) {
        tracing::info!(sequence = %self.name, cursor = self.cursor, "skip remaining dialogues");
        self.cursor = self.scripts.len();
        self.end_without_chaining();
        self.complete_all();
        self.pump();
    }

    /// Restarts the sequence from `index`. Out-of-range indices are ignored.
    pub fn jump_to(&mut self, index: usize) -> Result<bool, DialogueError> {
        if index >= self.scripts.len() {
            tracing::trace!(index, count = self.scripts.len(), "jump ignored");
            return Ok(false);
        }
        self.cursor = index;
        self.all_scripts_complete = false;
        self.popup.reset();
        self.start_next()?;
        Ok(true)
    }

    /// Continue input goes to the popup while one is on screen.
    pub fn handle_continue(&mut self) {
        if self.popup.is_active() {
            self.popup.handle_continue();
        } else {
            self.machine.handle_continue();
        }
        self.pump();
    }

    pub fn select_option(&mut self, side: OptionSide) -> bool {
        let accepted = self.machine.select_option(side);
        self.pump();
        accepted
    }

    pub fn jump_to_entry(&mut self, target: i32) -> bool {
        let accepted = self.machine.jump_to_entry(target);
        self.pump();
        accepted
    }

    pub fn complete_typing(&mut self) {
        self.machine.complete_typing();
        self.pump();
    }

    pub fn end_current(&mut self) {
        self.machine.end_current();
        self.pump();
    }

    pub fn set_special_action(&mut self, enabled: bool) {
        self.machine.set_special_action(enabled);
    }

    pub fn skip_popups(&mut self) {
        if !self.popup.is_active() {
            return;
        }
        self.popup.skip_all();
        self.pump();
    }

    pub fn tick(&mut self, delta: Duration) {
        self.machine.tick(delta);
        self.popup.tick(delta);
        self.pump();
    }

    /// Finishes every running reveal and fade so the sequencer rests on a
    /// point that waits for input.
    pub fn settle(&mut self) {
        loop {
            if self.machine.is_typing() {
                self.machine.complete_typing();
            } else if self.popup.is_fading() {
                self.popup.finish_fade();
            } else {
                break;
            }
            self.pump();
        }
    }

    fn start_next_inner(&mut self) -> Result<(), DialogueError> {
        let Some(script) = self.scripts.get(self.cursor).cloned() else {
            self.complete_all();
            return Ok(());
        };

        self.machine.check_playable(&script)?;
        self.end_without_chaining();
        self.machine.start_with(script)?;
        self.cursor += 1;
        Ok(())
    }

    fn end_without_chaining(&mut self) {
        if !self.machine.is_in_dialogue() {
            return;
        }
        self.machine.end_current();
        for event in self.machine.drain_events() {
            self.publish(event);
        }
    }

    fn complete_all(&mut self) {
        if self.all_scripts_complete {
            tracing::trace!(sequence = %self.name, "all scripts already complete");
            return;
        }
        self.all_scripts_complete = true;
        tracing::info!(sequence = %self.name, "all dialogues complete");
        self.publish(DialogueEvent::AllScriptsComplete);
        if self.config.popups_after_dialogue {
            self.popup.show_sequence(self.popups.clone());
        }
    }

    fn on_dialogue_ended(&mut self) {
        if self.cursor >= self.scripts.len() {
            self.complete_all();
        } else if self.config.auto_advance {
            if let Err(error) = self.start_next_inner() {
                tracing::error!(code = %error.code, "{}", error.message);
            }
        }
    }

    fn pump(&mut self) {
        loop {
            let mut events = self.machine.drain_events();
            events.extend(self.popup.drain_events());
            if events.is_empty() {
                break;
            }
            for event in events {
                let ended = event.kind() == EventKind::DialogueEnded;
                self.publish(event);
                if ended {
                    self.on_dialogue_ended();
                }
            }
        }
    }

    fn publish(&mut self, event: DialogueEvent) {
        self.bus.publish(&event);
        self.event_log.push(event);
    }
}
