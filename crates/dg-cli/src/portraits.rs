use std::path::PathBuf;

use dg_runtime::{PortraitHandle, PortraitResolver};

pub(crate) const PORTRAIT_DIR: &str = "portraits";

/// Looks up `portraits/<speaker>.png` under the scenario directory.
#[derive(Debug, Clone)]
pub(crate) struct DirPortraits {
    root: PathBuf,
}

impl DirPortraits {
    pub(crate) fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl PortraitResolver for DirPortraits {
    fn resolve(&self, speaker: &str) -> Option<PortraitHandle> {
        let speaker = speaker.trim();
        if speaker.is_empty() || speaker.contains(['/', '\\']) {
            return None;
        }
        let relative = format!("{}/{}.png", PORTRAIT_DIR, speaker);
        self.root
            .join(&relative)
            .is_file()
            .then(|| PortraitHandle(relative))
    }
}
