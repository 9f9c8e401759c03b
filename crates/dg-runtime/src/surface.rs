use std::cell::RefCell;
use std::rc::Rc;

use dg_core::PopupSpec;

/// Opaque reference to a speaker portrait; the host decides what it points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortraitHandle(pub String);

pub trait PortraitResolver {
    fn resolve(&self, speaker: &str) -> Option<PortraitHandle>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoPortraits;

impl PortraitResolver for NoPortraits {
    fn resolve(&self, _speaker: &str) -> Option<PortraitHandle> {
        None
    }
}

/// Text surfaces the dialogue machine writes to. Only the active machine
/// mutates a surface.
pub trait DialogueSurface {
    fn show_panel(&mut self, visible: bool);
    fn set_speaker_name(&mut self, name: &str);
    fn set_content(&mut self, text: &str);
    fn append_content(&mut self, text: &str);
    fn show_options(&mut self, top: &str, bottom: &str);
    fn hide_options(&mut self);
    /// `None` hides the portrait region.
    fn show_portrait(&mut self, portrait: Option<&PortraitHandle>);
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BufferSurface {
    pub panel_visible: bool,
    pub speaker_name: String,
    pub content: String,
    pub options: Option<(String, String)>,
    pub portrait: Option<PortraitHandle>,
}

impl DialogueSurface for BufferSurface {
    fn show_panel(&mut self, visible: bool) {
        self.panel_visible = visible;
    }

    fn set_speaker_name(&mut self, name: &str) {
        self.speaker_name = name.to_string();
    }

    fn set_content(&mut self, text: &str) {
        self.content = text.to_string();
    }

    fn append_content(&mut self, text: &str) {
        self.content.push_str(text);
    }

    fn show_options(&mut self, top: &str, bottom: &str) {
        self.options = Some((top.to_string(), bottom.to_string()));
    }

    fn hide_options(&mut self) {
        self.options = None;
    }

    fn show_portrait(&mut self, portrait: Option<&PortraitHandle>) {
        self.portrait = portrait.cloned();
    }
}

impl<T: DialogueSurface> DialogueSurface for Rc<RefCell<T>> {
    fn show_panel(&mut self, visible: bool) {
        self.borrow_mut().show_panel(visible);
    }

    fn set_speaker_name(&mut self, name: &str) {
        self.borrow_mut().set_speaker_name(name);
    }

    fn set_content(&mut self, text: &str) {
        self.borrow_mut().set_content(text);
    }

    fn append_content(&mut self, text: &str) {
        self.borrow_mut().append_content(text);
    }

    fn show_options(&mut self, top: &str, bottom: &str) {
        self.borrow_mut().show_options(top, bottom);
    }

    fn hide_options(&mut self) {
        self.borrow_mut().hide_options();
    }

    fn show_portrait(&mut self, portrait: Option<&PortraitHandle>) {
        self.borrow_mut().show_portrait(portrait);
    }
}

pub trait PopupSurface {
    fn spawn(&mut self, popup: &PopupSpec);
    fn set_alpha(&mut self, alpha: f32);
    fn destroy(&mut self);
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BufferPopupSurface {
    pub current: Option<PopupSpec>,
    pub alpha: f32,
    pub spawned: Vec<String>,
    pub destroyed: usize,
}

impl PopupSurface for BufferPopupSurface {
    fn spawn(&mut self, popup: &PopupSpec) {
        self.spawned.push(popup.id.clone());
        self.current = Some(popup.clone());
        self.alpha = 0.0;
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.alpha = alpha;
    }

    fn destroy(&mut self) {
        if self.current.take().is_some() {
            self.destroyed += 1;
        }
        self.alpha = 0.0;
    }
}

impl<T: PopupSurface> PopupSurface for Rc<RefCell<T>> {
    fn spawn(&mut self, popup: &PopupSpec) {
        self.borrow_mut().spawn(popup);
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.borrow_mut().set_alpha(alpha);
    }

    fn destroy(&mut self) {
        self.borrow_mut().destroy();
    }
}
