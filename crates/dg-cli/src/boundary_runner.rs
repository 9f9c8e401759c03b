use dg_core::DialogueEvent;
use dg_runtime::DialoguePhase;

use crate::{BoundaryEvent, BoundaryResult, PlayerSession};

/// Settles running reveals and fades, then reports what waits for input.
pub(crate) fn run_to_boundary(session: &mut PlayerSession) -> BoundaryResult {
    session.sequencer.settle();
    let notifications = session.sequencer.drain_event_log();
    let flags = session.sequencer.story_flags().as_map().clone();

    if let Some(popup) = session.sequencer.popup().current().cloned() {
        return BoundaryResult {
            event: BoundaryEvent::Popup,
            notifications,
            speaker: None,
            portrait: None,
            text: None,
            options: None,
            popup: Some(popup),
            flags,
        };
    }

    let event = match session.sequencer.machine().phase() {
        DialoguePhase::WaitingForInput => BoundaryEvent::Line,
        DialoguePhase::ShowingOptions => BoundaryEvent::Options,
        DialoguePhase::NotStarted | DialoguePhase::Typing | DialoguePhase::Ended => {
            if session.sequencer.all_scripts_complete() {
                BoundaryEvent::End
            } else {
                BoundaryEvent::Idle
            }
        }
    };

    let surface = session.surface.borrow();
    let on_screen = matches!(event, BoundaryEvent::Line | BoundaryEvent::Options);
    BoundaryResult {
        event,
        notifications,
        speaker: on_screen.then(|| surface.speaker_name.clone()),
        portrait: surface
            .portrait
            .as_ref()
            .filter(|_| on_screen)
            .map(|portrait| portrait.0.clone()),
        text: on_screen.then(|| surface.content.clone()),
        options: surface
            .options
            .clone()
            .filter(|_| event == BoundaryEvent::Options),
        popup: None,
        flags,
    }
}

pub(crate) fn describe_notification(event: &DialogueEvent) -> String {
    match event {
        DialogueEvent::DialogueStarted { name } => format!("dialogue started: {}", name),
        DialogueEvent::DialogueEnded { name } => format!("dialogue ended: {}", name),
        DialogueEvent::OptionSelected { side } => format!("option selected: {}", side.as_str()),
        DialogueEvent::AllScriptsComplete => "all dialogues complete".to_string(),
        DialogueEvent::PopupShown { index, id } => format!("popup shown: #{} {}", index, id),
        DialogueEvent::AllPopupsComplete => "all popups complete".to_string(),
    }
}

pub(crate) fn emit_boundary(boundary: BoundaryResult, state_out: Option<String>) {
    println!("RESULT:OK");
    match boundary.event {
        BoundaryEvent::Line => println!("EVENT:LINE"),
        BoundaryEvent::Options => println!("EVENT:OPTIONS"),
        BoundaryEvent::Popup => println!("EVENT:POPUP"),
        BoundaryEvent::Idle => println!("EVENT:IDLE"),
        BoundaryEvent::End => println!("EVENT:END"),
    }

    for notification in &boundary.notifications {
        println!(
            "NOTIFY_JSON:{}",
            serde_json::to_string(notification).expect("event json")
        );
    }

    if let Some(speaker) = boundary.speaker {
        println!(
            "SPEAKER_JSON:{}",
            serde_json::to_string(&speaker).expect("string json")
        );
    }

    if let Some(portrait) = boundary.portrait {
        println!(
            "PORTRAIT_JSON:{}",
            serde_json::to_string(&portrait).expect("string json")
        );
    }

    if let Some(text) = boundary.text {
        println!(
            "TEXT_JSON:{}",
            serde_json::to_string(&text).expect("string json")
        );
    }

    if let Some((top, bottom)) = boundary.options {
        println!(
            "OPTION:top|{}",
            serde_json::to_string(&top).expect("string json")
        );
        println!(
            "OPTION:bottom|{}",
            serde_json::to_string(&bottom).expect("string json")
        );
    }

    if let Some(popup) = boundary.popup {
        println!(
            "POPUP_JSON:{}",
            serde_json::to_string(&popup).expect("popup json")
        );
    }

    for (name, value) in boundary.flags {
        println!("FLAG:{}|{}", name, value);
    }

    println!(
        "STATE_OUT:{}",
        state_out.unwrap_or_else(|| "NONE".to_string())
    );
}

#[cfg(test)]
mod boundary_runner_tests {
    use super::*;
    use crate::cli_test_support::*;
    use crate::{create_session_for_scenario, load_source_by_scripts_dir, RunOverrides};
    use dg_core::OptionSide;

    fn session(demo: &str) -> PlayerSession {
        let scenario = load_source_by_scripts_dir(&demo_dir(demo)).expect("scenario should load");
        create_session_for_scenario(&scenario, None, RunOverrides::default())
            .expect("session should build")
    }

    #[test]
    fn run_to_boundary_reports_lines_options_and_end() {
        let mut session = session("02-branching-interrogation");

        let first = run_to_boundary(&mut session);
        assert_eq!(first.event, BoundaryEvent::Line);
        assert_eq!(first.speaker.as_deref(), Some("Inspector Hale"));
        assert_eq!(
            first.text.as_deref(),
            Some("Where were you when the bell rang?")
        );
        assert_eq!(
            first.notifications,
            vec![DialogueEvent::DialogueStarted {
                name: "interrogation".to_string()
            }]
        );

        session.sequencer.handle_continue();
        let butler = run_to_boundary(&mut session);
        assert_eq!(butler.event, BoundaryEvent::Line);
        assert!(butler.options.is_none());
        assert!(butler.notifications.is_empty());

        session.sequencer.handle_continue();
        let options = run_to_boundary(&mut session);
        assert_eq!(options.event, BoundaryEvent::Options);
        assert_eq!(
            options.options,
            Some((
                "Press the butler".to_string(),
                "Question the maid".to_string()
            ))
        );

        session.sequencer.skip_remaining();
        let end = run_to_boundary(&mut session);
        assert_eq!(end.event, BoundaryEvent::End);
        assert!(end.speaker.is_none());
        assert!(end
            .notifications
            .contains(&DialogueEvent::AllScriptsComplete));
    }

    #[test]
    fn run_to_boundary_reports_popups_and_flags() {
        let mut session = session("03-case-briefing");
        session.sequencer.set_story_flag("clues", 2);
        session.sequencer.skip_remaining();

        let boundary = run_to_boundary(&mut session);
        assert_eq!(boundary.event, BoundaryEvent::Popup);
        let popup = boundary.popup.expect("popup should be visible");
        assert_eq!(popup.id, "clue-key");
        assert_eq!(boundary.flags.get("clues"), Some(&2));
        assert!(boundary.notifications.contains(&DialogueEvent::PopupShown {
            index: 0,
            id: "clue-key".to_string()
        }));
    }

    #[test]
    fn describe_notification_is_human_readable() {
        assert_eq!(
            describe_notification(&DialogueEvent::OptionSelected {
                side: OptionSide::Bottom
            }),
            "option selected: bottom"
        );
        assert_eq!(
            describe_notification(&DialogueEvent::PopupShown {
                index: 1,
                id: "clue-ledger".to_string()
            }),
            "popup shown: #1 clue-ledger"
        );
    }
}
