use std::time::Duration;

use dg_core::{DialogueEvent, PopupSpec};

use crate::surface::PopupSurface;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupPhase {
    Idle,
    FadingIn,
    Visible,
    FadingOut,
}

/// Shows popups one after another, fading each in and out.
pub struct PopupSequencer {
    popups: Vec<PopupSpec>,
    index: usize,
    phase: PopupPhase,
    elapsed: Duration,
    fade_in: Duration,
    fade_out: Duration,
    surface: Box<dyn PopupSurface>,
    outbox: Vec<DialogueEvent>,
}

impl std::fmt::Debug for PopupSequencer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PopupSequencer")
            .field("popups", &self.popups.len())
            .field("index", &self.index)
            .field("phase", &self.phase)
            .finish()
    }
}

impl PopupSequencer {
    pub fn new(surface: Box<dyn PopupSurface>, fade_in: Duration, fade_out: Duration) -> Self {
        Self {
            popups: Vec::new(),
            index: 0,
            phase: PopupPhase::Idle,
            elapsed: Duration::ZERO,
            fade_in,
            fade_out,
            surface,
            outbox: Vec::new(),
        }
    }

    pub fn phase(&self) -> PopupPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase != PopupPhase::Idle
    }

    pub fn is_fading(&self) -> bool {
        matches!(self.phase, PopupPhase::FadingIn | PopupPhase::FadingOut)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> Option<&PopupSpec> {
        if !self.is_active() {
            return None;
        }
        self.popups.get(self.index)
    }

    pub fn drain_events(&mut self) -> Vec<DialogueEvent> {
        std::mem::take(&mut self.outbox)
    }

    /// Starts over at the first popup. An empty list completes at once.
    pub fn show_sequence(&mut self, popups: Vec<PopupSpec>) {
        if self.is_active() {
            self.surface.destroy();
        }
        self.popups = popups;
        self.index = 0;
        if self.popups.is_empty() {
            self.phase = PopupPhase::Idle;
            self.outbox.push(DialogueEvent::AllPopupsComplete);
            return;
        }
        self.show_current();
    }

    /// Starts fading out the visible popup. Ignored while fading.
    pub fn handle_continue(&mut self) -> bool {
        if self.phase != PopupPhase::Visible {
            tracing::trace!(phase = ?self.phase, "popup continue ignored");
            return false;
        }
        self.phase = PopupPhase::FadingOut;
        self.elapsed = Duration::ZERO;
        if self.fade_out.is_zero() {
            self.finish_fade_out();
        }
        true
    }

    pub fn skip_all(&mut self) {
        if self.is_active() {
            self.surface.destroy();
        }
        self.phase = PopupPhase::Idle;
        self.elapsed = Duration::ZERO;
        self.outbox.push(DialogueEvent::AllPopupsComplete);
    }

    /// Drops the current popup without any notification.
    pub fn reset(&mut self) {
        if self.is_active() {
            self.surface.destroy();
        }
        self.phase = PopupPhase::Idle;
        self.index = 0;
        self.elapsed = Duration::ZERO;
    }

    pub fn tick(&mut self, delta: Duration) {
        match self.phase {
            PopupPhase::FadingIn => {
                self.elapsed += delta;
                if self.elapsed >= self.fade_in {
                    self.finish_fade_in();
                } else {
                    self.surface.set_alpha(ratio(self.elapsed, self.fade_in));
                }
            }
            PopupPhase::FadingOut => {
                self.elapsed += delta;
                if self.elapsed >= self.fade_out {
                    self.finish_fade_out();
                } else {
                    self.surface
                        .set_alpha(1.0 - ratio(self.elapsed, self.fade_out));
                }
            }
            PopupPhase::Idle | PopupPhase::Visible => {}
        }
    }

    /// Jumps a running fade to its end state.
    pub fn finish_fade(&mut self) {
        match self.phase {
            PopupPhase::FadingIn => self.finish_fade_in(),
            PopupPhase::FadingOut => self.finish_fade_out(),
            PopupPhase::Idle | PopupPhase::Visible => {}
        }
    }

    /// Shows the popup at `index` fully faded in, without notifications.
    pub fn restore_visible(&mut self, popups: Vec<PopupSpec>, index: usize) -> bool {
        if index >= popups.len() {
            return false;
        }
        if self.is_active() {
            self.surface.destroy();
        }
        self.popups = popups;
        self.index = index;
        self.surface.spawn(&self.popups[index]);
        self.surface.set_alpha(1.0);
        self.phase = PopupPhase::Visible;
        self.elapsed = Duration::ZERO;
        true
    }

    fn show_current(&mut self) {
        let popup = &self.popups[self.index];
        tracing::debug!(index = self.index, id = %popup.id, "show popup");
        self.surface.spawn(popup);
        self.surface.set_alpha(0.0);
        self.outbox.push(DialogueEvent::PopupShown {
            index: self.index,
            id: popup.id.clone(),
        });
        self.phase = PopupPhase::FadingIn;
        self.elapsed = Duration::ZERO;
        if self.fade_in.is_zero() {
            self.finish_fade_in();
        }
    }

    fn finish_fade_in(&mut self) {
        self.surface.set_alpha(1.0);
        self.phase = PopupPhase::Visible;
        self.elapsed = Duration::ZERO;
    }

    fn finish_fade_out(&mut self) {
        self.surface.set_alpha(0.0);
        self.surface.destroy();
        self.elapsed = Duration::ZERO;
        self.index += 1;
        if self.index < self.popups.len() {
            self.show_current();
        } else {
            self.phase = PopupPhase::Idle;
            self.outbox.push(DialogueEvent::AllPopupsComplete);
        }
    }
}

fn ratio(elapsed: Duration, total: Duration) -> f32 {
    (elapsed.as_secs_f32() / total.as_secs_f32()).clamp(0.0, 1.0)
}

#[cfg(test)]
mod popup_tests {
    use super::*;
    use crate::surface::BufferPopupSurface;
    use std::cell::RefCell;
    use std::rc::Rc;

    const FADE: Duration = Duration::from_millis(500);

    fn popup(id: &str) -> PopupSpec {
        PopupSpec {
            id: id.to_string(),
            title: format!("{} title", id),
            body: String::new(),
        }
    }

    fn sequencer() -> (PopupSequencer, Rc<RefCell<BufferPopupSurface>>) {
        let surface = Rc::new(RefCell::new(BufferPopupSurface::default()));
        (
            PopupSequencer::new(Box::new(surface.clone()), FADE, FADE),
            surface,
        )
    }

    #[test]
    fn sequence_fades_each_popup_in_and_out() {
        let (mut popups, surface) = sequencer();
        popups.show_sequence(vec![popup("a"), popup("b")]);
        assert_eq!(popups.phase(), PopupPhase::FadingIn);
        assert_eq!(
            popups.drain_events(),
            vec![DialogueEvent::PopupShown {
                index: 0,
                id: "a".to_string()
            }]
        );

        popups.tick(Duration::from_millis(250));
        assert!((surface.borrow().alpha - 0.5).abs() < 1e-4);
        assert!(!popups.handle_continue());

        popups.tick(Duration::from_millis(250));
        assert_eq!(popups.phase(), PopupPhase::Visible);
        assert_eq!(surface.borrow().alpha, 1.0);

        assert!(popups.handle_continue());
        assert_eq!(popups.phase(), PopupPhase::FadingOut);
        assert!(!popups.handle_continue());
        popups.tick(FADE);
        assert_eq!(popups.index(), 1);
        assert_eq!(popups.phase(), PopupPhase::FadingIn);
        assert_eq!(surface.borrow().destroyed, 1);

        popups.finish_fade();
        popups.handle_continue();
        popups.finish_fade();
        assert_eq!(popups.phase(), PopupPhase::Idle);
        assert_eq!(
            popups.drain_events(),
            vec![
                DialogueEvent::PopupShown {
                    index: 1,
                    id: "b".to_string()
                },
                DialogueEvent::AllPopupsComplete,
            ]
        );
        assert_eq!(surface.borrow().destroyed, 2);
    }

    #[test]
    fn empty_sequence_completes_immediately() {
        let (mut popups, _surface) = sequencer();
        popups.show_sequence(Vec::new());
        assert!(!popups.is_active());
        assert_eq!(popups.drain_events(), vec![DialogueEvent::AllPopupsComplete]);
    }

    #[test]
    fn skip_all_destroys_current_without_fading() {
        let (mut popups, surface) = sequencer();
        popups.show_sequence(vec![popup("a"), popup("b")]);
        popups.drain_events();
        popups.skip_all();
        assert_eq!(popups.phase(), PopupPhase::Idle);
        assert!(surface.borrow().current.is_none());
        assert_eq!(popups.drain_events(), vec![DialogueEvent::AllPopupsComplete]);
    }

    #[test]
    fn zero_fades_switch_instantly() {
        let surface = Rc::new(RefCell::new(BufferPopupSurface::default()));
        let mut popups =
            PopupSequencer::new(Box::new(surface.clone()), Duration::ZERO, Duration::ZERO);
        popups.show_sequence(vec![popup("a")]);
        assert_eq!(popups.phase(), PopupPhase::Visible);
        popups.handle_continue();
        assert_eq!(popups.phase(), PopupPhase::Idle);
        assert_eq!(surface.borrow().spawned, vec!["a".to_string()]);
    }

    #[test]
    fn restore_visible_rejects_out_of_range_index() {
        let (mut popups, surface) = sequencer();
        assert!(!popups.restore_visible(vec![popup("a")], 1));
        assert!(popups.restore_visible(vec![popup("a"), popup("b")], 1));
        assert_eq!(popups.phase(), PopupPhase::Visible);
        assert_eq!(popups.current().map(|spec| spec.id.as_str()), Some("b"));
        assert!(popups.drain_events().is_empty());
        assert_eq!(surface.borrow().alpha, 1.0);
    }
}
