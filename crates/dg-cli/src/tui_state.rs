use dg_core::{DialogueEvent, OptionSide};

use crate::describe_notification;

pub(crate) const LOG_CAPACITY: usize = 6;

#[derive(Debug)]
pub(crate) struct TuiUiState {
    pub(crate) selected: OptionSide,
    pub(crate) status: String,
    pub(crate) help_visible: bool,
    pub(crate) log: Vec<String>,
}

impl TuiUiState {
    pub(crate) fn new(status: &str) -> Self {
        Self {
            selected: OptionSide::Top,
            status: status.to_string(),
            help_visible: false,
            log: Vec::new(),
        }
    }

    pub(crate) fn push_log(&mut self, line: String) {
        self.log.push(line);
        if self.log.len() > LOG_CAPACITY {
            let overflow = self.log.len() - LOG_CAPACITY;
            self.log.drain(..overflow);
        }
    }

    pub(crate) fn record_notifications(&mut self, events: &[DialogueEvent]) {
        for event in events {
            if matches!(event, DialogueEvent::OptionSelected { .. }) {
                self.selected = OptionSide::Top;
            }
            self.push_log(describe_notification(event));
        }
    }

    pub(crate) fn toggle_selected(&mut self) {
        self.selected = match self.selected {
            OptionSide::Top => OptionSide::Bottom,
            OptionSide::Bottom => OptionSide::Top,
        };
    }

    pub(crate) fn reset_selection(&mut self) {
        self.selected = OptionSide::Top;
    }
}

#[cfg(test)]
mod tui_state_tests {
    use super::*;

    #[test]
    fn log_keeps_only_recent_notifications() {
        let mut ui = TuiUiState::new("ready");
        let events = (0..LOG_CAPACITY + 2)
            .map(|index| DialogueEvent::PopupShown {
                index,
                id: format!("clue-{}", index),
            })
            .collect::<Vec<_>>();
        ui.record_notifications(&events);

        assert_eq!(ui.log.len(), LOG_CAPACITY);
        assert_eq!(ui.log[0], "popup shown: #2 clue-2");
        assert_eq!(
            ui.log.last().map(String::as_str),
            Some("popup shown: #7 clue-7")
        );
    }

    #[test]
    fn selection_toggles_and_resets_after_a_choice() {
        let mut ui = TuiUiState::new("ready");
        ui.toggle_selected();
        assert_eq!(ui.selected, OptionSide::Bottom);
        ui.record_notifications(&[DialogueEvent::OptionSelected {
            side: OptionSide::Bottom,
        }]);
        assert_eq!(ui.selected, OptionSide::Top);
        ui.toggle_selected();
        ui.reset_selection();
        assert_eq!(ui.selected, OptionSide::Top);
    }
}
