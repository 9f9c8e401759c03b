use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use dg_compiler::compile_project_from_source_map;
use dg_core::{DialogueEntry, DialogueScript, EntryContent, SpeakerKind};

use super::{DialogueMachine, DialogueMachineOptions};
use crate::surface::BufferSurface;

pub(crate) const TYPING_INTERVAL: Duration = Duration::from_millis(50);

pub(crate) fn map(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
    entries
        .iter()
        .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
        .collect()
}

pub(crate) fn script_from_xml(source: &str) -> Arc<DialogueScript> {
    let project = compile_project_from_source_map(&map(&[("test.dialogue.xml", source)]))
        .expect("compile should pass");
    project
        .scripts
        .into_values()
        .next()
        .expect("one script should compile")
}

pub(crate) fn line(speaker: &str, text: &str, next: i32) -> DialogueEntry {
    DialogueEntry {
        speaker: speaker.to_string(),
        speaker_kind: SpeakerKind::Npc,
        content: EntryContent::Line(text.to_string()),
        options: None,
        next_entry_index: next,
    }
}

pub(crate) fn script(name: &str, entries: Vec<DialogueEntry>) -> Arc<DialogueScript> {
    Arc::new(DialogueScript {
        name: name.to_string(),
        entries,
    })
}

/// Two-entry script: A says "Hi", B says "Bye" and the dialogue ends.
pub(crate) fn hi_bye() -> Arc<DialogueScript> {
    script("hi_bye", vec![line("A", "Hi", 1), line("B", "Bye", -1)])
}

pub(crate) fn options() -> DialogueMachineOptions {
    DialogueMachineOptions {
        typing_interval: TYPING_INTERVAL,
        ..DialogueMachineOptions::default()
    }
}

pub(crate) fn machine() -> (DialogueMachine, Rc<RefCell<BufferSurface>>) {
    machine_with(options())
}

pub(crate) fn machine_with(
    options: DialogueMachineOptions,
) -> (DialogueMachine, Rc<RefCell<BufferSurface>>) {
    let surface = Rc::new(RefCell::new(BufferSurface::default()));
    let machine = DialogueMachine::new(Box::new(surface.clone()), options);
    (machine, surface)
}

pub(crate) fn finish_typing(machine: &mut DialogueMachine) {
    machine.tick(Duration::from_secs(60));
}
