pub mod config;
pub mod error;
pub mod events;
pub mod flags;
pub mod types;

pub use config::*;
pub use error::DialogueError;
pub use events::*;
pub use flags::StoryFlags;
pub use types::*;
