pub mod callbacks;
pub mod engine;
pub mod event_bus;
pub mod popup;
pub mod sequencer;
pub mod surface;
pub mod typewriter;

pub use callbacks::{CallbackPolicy, CallbackRegistry, DialogueCallback};
pub use engine::{DialogueMachine, DialogueMachineOptions, DialoguePhase, DialogueState};
pub use event_bus::{EventBus, EventHandler, SubscriptionId};
pub use popup::{PopupPhase, PopupSequencer};
pub use sequencer::{DialogueSequencer, SequencerOptions, SEQUENCER_SNAPSHOT_SCHEMA};
pub use surface::{
    BufferPopupSurface, BufferSurface, DialogueSurface, NoPortraits, PopupSurface,
    PortraitHandle, PortraitResolver,
};
pub use typewriter::{
    NullTypingSound, Typewriter, TypewriterPhase, TypewriterStep, TypingSound,
};
