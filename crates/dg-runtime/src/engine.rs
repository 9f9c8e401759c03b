use std::sync::Arc;
use std::time::Duration;

use dg_core::{
    DialogueConfig, DialogueEntry, DialogueError, DialogueEvent, DialogueScript, OptionSide,
    SpeakerKind,
};

use crate::callbacks::{CallbackPolicy, CallbackRegistry};
use crate::surface::{DialogueSurface, NoPortraits, PortraitResolver};
use crate::typewriter::{Typewriter, TypewriterStep, TypingSound};

mod display;
mod input;
mod lifecycle;
mod restore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialoguePhase {
    NotStarted,
    Typing,
    WaitingForInput,
    ShowingOptions,
    Ended,
}

/// Flag view of the active conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialogueState {
    pub current_entry_index: usize,
    pub current_fragment_index: usize,
    pub is_in_dialogue: bool,
    pub is_typing: bool,
    pub waiting_for_input: bool,
    pub is_special_action: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialogueMachineOptions {
    pub typing_interval: Duration,
    pub callback_policy: CallbackPolicy,
}

impl Default for DialogueMachineOptions {
    fn default() -> Self {
        Self {
            typing_interval: DialogueConfig::default().typing_interval(),
            callback_policy: CallbackPolicy::default(),
        }
    }
}

/// Playback state machine for a single conversation at a time.
///
/// Notifications are queued and handed out by [`DialogueMachine::drain_events`]
/// so that whoever owns the machine decides how to react to them.
pub struct DialogueMachine {
    script: Option<Arc<DialogueScript>>,
    phase: DialoguePhase,
    entry_index: usize,
    fragment_index: usize,
    special_action: bool,
    typewriter: Typewriter,
    surface: Box<dyn DialogueSurface>,
    portraits: Box<dyn PortraitResolver>,
    callbacks: CallbackRegistry,
    outbox: Vec<DialogueEvent>,
}

impl std::fmt::Debug for DialogueMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DialogueMachine")
            .field(
                "script",
                &self.script.as_ref().map(|script| script.name.as_str()),
            )
            .field("phase", &self.phase)
            .field("entry_index", &self.entry_index)
            .field("fragment_index", &self.fragment_index)
            .field("special_action", &self.special_action)
            .finish()
    }
}

impl DialogueMachine {
    pub fn new(surface: Box<dyn DialogueSurface>, options: DialogueMachineOptions) -> Self {
        Self {
            script: None,
            phase: DialoguePhase::NotStarted,
            entry_index: 0,
            fragment_index: 0,
            special_action: false,
            typewriter: Typewriter::new(options.typing_interval),
            surface,
            portraits: Box::new(NoPortraits),
            callbacks: CallbackRegistry::new(options.callback_policy),
            outbox: Vec::new(),
        }
    }

    pub fn set_portrait_resolver(&mut self, portraits: Box<dyn PortraitResolver>) {
        self.portraits = portraits;
    }

    pub fn set_typing_sound(&mut self, sound: Box<dyn TypingSound>) {
        self.typewriter.set_sound(sound);
    }

    pub fn set_typing_interval(&mut self, interval: Duration) {
        self.typewriter.set_interval(interval);
    }

    pub fn register_callback(&mut self, entry_index: usize, callback: impl FnMut() + 'static) {
        self.callbacks.register(entry_index, callback);
    }

    pub fn remove_callback(&mut self, entry_index: usize) -> bool {
        self.callbacks.remove(entry_index)
    }

    pub fn clear_callbacks(&mut self) {
        self.callbacks.clear();
    }

    pub fn script(&self) -> Option<&Arc<DialogueScript>> {
        self.script.as_ref()
    }

    pub fn phase(&self) -> DialoguePhase {
        self.phase
    }

    pub fn is_in_dialogue(&self) -> bool {
        matches!(
            self.phase,
            DialoguePhase::Typing | DialoguePhase::WaitingForInput | DialoguePhase::ShowingOptions
        )
    }

    pub fn is_typing(&self) -> bool {
        self.phase == DialoguePhase::Typing
    }

    pub fn is_waiting_for_input(&self) -> bool {
        self.phase == DialoguePhase::WaitingForInput
    }

    pub fn is_special_action(&self) -> bool {
        self.special_action
    }

    /// While set, continue input is ignored and an external controller
    /// drives the conversation through `select_option` or `jump_to_entry`.
    pub fn set_special_action(&mut self, enabled: bool) {
        self.special_action = enabled;
    }

    pub fn current_entry_index(&self) -> usize {
        self.entry_index
    }

    pub fn current_fragment_index(&self) -> usize {
        self.fragment_index
    }

    pub fn current_entry(&self) -> Option<&DialogueEntry> {
        if !self.is_in_dialogue() {
            return None;
        }
        self.script
            .as_ref()
            .and_then(|script| script.entry(self.entry_index))
    }

    pub fn visible_text(&self) -> String {
        self.typewriter.visible_text()
    }

    pub fn state(&self) -> DialogueState {
        DialogueState {
            current_entry_index: self.entry_index,
            current_fragment_index: self.fragment_index,
            is_in_dialogue: self.is_in_dialogue(),
            is_typing: self.is_typing(),
            waiting_for_input: self.is_waiting_for_input(),
            is_special_action: self.special_action,
        }
    }

    pub fn drain_events(&mut self) -> Vec<DialogueEvent> {
        std::mem::take(&mut self.outbox)
    }

    fn script_name(&self) -> String {
        self.script
            .as_ref()
            .map(|script| script.name.clone())
            .unwrap_or_default()
    }

    fn apply_step(&mut self, step: TypewriterStep) {
        if !step.appended.is_empty() {
            self.surface.append_content(&step.appended);
        }
        if step.completed && self.phase == DialoguePhase::Typing {
            self.phase = DialoguePhase::WaitingForInput;
        }
    }
}

#[cfg(test)]
pub(crate) mod runtime_test_support;
