use serde::{Deserialize, Serialize};

use crate::types::OptionSide;

/// Notifications produced by the dialogue engine for scene/game managers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DialogueEvent {
    DialogueStarted { name: String },
    DialogueEnded { name: String },
    OptionSelected { side: OptionSide },
    AllScriptsComplete,
    PopupShown { index: usize, id: String },
    AllPopupsComplete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKind {
    DialogueStarted,
    DialogueEnded,
    OptionSelected,
    AllScriptsComplete,
    PopupShown,
    AllPopupsComplete,
}

impl DialogueEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::DialogueStarted { .. } => EventKind::DialogueStarted,
            Self::DialogueEnded { .. } => EventKind::DialogueEnded,
            Self::OptionSelected { .. } => EventKind::OptionSelected,
            Self::AllScriptsComplete => EventKind::AllScriptsComplete,
            Self::PopupShown { .. } => EventKind::PopupShown,
            Self::AllPopupsComplete => EventKind::AllPopupsComplete,
        }
    }
}
